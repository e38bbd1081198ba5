//! Numeric helpers shared by the processors.

/// Level reported for silence by [`amplitude_to_db`].
pub const DB_FLOOR: f32 = -96.0;

/// Gains at or below this level are treated as silence.
pub const GAIN_FLOOR_DB: f32 = -100.0;

/// Value substituted for an infinite sample (+24 dBFS).
pub const OUTPUT_LIMIT: f32 = 16.0;

/// Smallest sample rate used for coefficient math.
pub const MIN_COEFF_SAMPLE_RATE: f64 = 1.0;

/// Convert linear amplitude to decibels.
#[inline]
pub fn amplitude_to_db(amp: f32) -> f32 {
    if amp <= 0.0 || amp.is_nan() {
        DB_FLOOR
    } else {
        (20.0 * amp.log10()).max(DB_FLOOR)
    }
}

/// Convert decibels to linear amplitude: `10^(db/20)`.
///
/// Anything at or below [`GAIN_FLOOR_DB`] returns exactly `0.0`.
#[inline]
pub fn db_to_amplitude(db: f32) -> f32 {
    if db <= GAIN_FLOOR_DB || db.is_nan() {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// One-pole smoothing coefficient `exp(-1 / (time * sample_rate))`.
///
/// Zero time means instantaneous (coefficient 0). The sample rate is clamped to
/// [`MIN_COEFF_SAMPLE_RATE`] so a host reporting 0 Hz still yields a finite value.
#[inline]
pub fn time_to_coeff(time_seconds: f32, sample_rate: f64) -> f32 {
    let sample_rate = if sample_rate.is_nan() {
        MIN_COEFF_SAMPLE_RATE
    } else {
        sample_rate.max(MIN_COEFF_SAMPLE_RATE)
    };

    if time_seconds <= 0.0 || time_seconds.is_nan() {
        0.0
    } else {
        (-1.0 / (time_seconds as f64 * sample_rate)).exp() as f32
    }
}

/// Flush subnormals to zero.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        x
    }
}

/// Replace a non-finite sample: NaN becomes silence and infinities become
/// `±OUTPUT_LIMIT`. Finite samples pass through, with denormals flushed.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() {
        flush_denormal(x)
    } else if x.is_nan() {
        0.0
    } else {
        OUTPUT_LIMIT.copysign(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_amplitude_db_conversion() {
        assert!((amplitude_to_db(1.0) - 0.0).abs() < 0.001);
        assert!((amplitude_to_db(0.5) - (-6.02)).abs() < 0.01);
        assert_eq!(amplitude_to_db(0.0), DB_FLOOR);
        assert!((db_to_amplitude(0.0) - 1.0).abs() < 0.001);
        assert!((db_to_amplitude(-6.0) - 0.501).abs() < 0.01);
    }

    #[test]
    fn test_db_floor_is_silence() {
        assert_eq!(db_to_amplitude(GAIN_FLOOR_DB), 0.0);
        assert_eq!(db_to_amplitude(-300.0), 0.0);
        assert_eq!(db_to_amplitude(f32::NEG_INFINITY), 0.0);
        assert_eq!(db_to_amplitude(f32::NAN), 0.0);
    }

    #[test]
    fn test_time_to_coeff() {
        let c = time_to_coeff(0.01, 48000.0);
        assert_relative_eq!(c, (-1.0f64 / 480.0).exp() as f32, max_relative = 1e-6);
        assert_eq!(time_to_coeff(0.0, 48000.0), 0.0);
    }

    #[test]
    fn test_time_to_coeff_degenerate_sample_rate() {
        for sr in [0.0, -44100.0, f64::NAN] {
            let c = time_to_coeff(0.02, sr);
            assert!(c.is_finite());
            assert!((0.0..1.0).contains(&c));
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f32::NAN), 0.0);
        assert_eq!(sanitize(f32::INFINITY), OUTPUT_LIMIT);
        assert_eq!(sanitize(f32::NEG_INFINITY), -OUTPUT_LIMIT);
        assert_eq!(sanitize(1e-40), 0.0);
        assert_eq!(sanitize(0.25), 0.25);
        assert_eq!(sanitize(20.0), 20.0);
        assert_eq!(sanitize(-1e30), -1e30);
    }

    proptest! {
        #[test]
        fn prop_db_to_amplitude_matches_formula(db in -99.0f32..48.0) {
            let expected = 10.0f64.powf(db as f64 / 20.0);
            let got = db_to_amplitude(db) as f64;
            prop_assert!(((got - expected) / expected).abs() < 1e-6);
        }
    }
}

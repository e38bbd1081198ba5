//! Static gain curves for each dynamics mode.

/// Policy used by a [`DynamicsProcessor`](super::DynamicsProcessor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicsMode {
    /// Gain reduction `1 / (1 + envelope)`. Threshold and ratio are ignored.
    Simple,
    /// Hard or soft knee compressor on the envelope level in dB.
    #[default]
    Ratio,
    /// Targets `max(threshold / peak, ceiling)` while the held input peak is above the threshold.
    Limiter,
}

/// Reduction of the simplified compressor.
#[inline]
pub(crate) fn simple_gain(envelope: f32) -> f32 {
    1.0 / (1.0 + envelope.max(0.0))
}

/// Gain reduction in dB (positive means attenuation) for a level in dB.
#[inline]
pub(crate) fn ratio_reduction_db(input_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    let slope = 1.0 - 1.0 / ratio;

    if knee_db <= 0.0 {
        return (input_db - threshold_db).max(0.0) * slope;
    }

    let half_knee = knee_db / 2.0;
    let below = threshold_db - half_knee;
    let above = threshold_db + half_knee;

    if input_db <= below {
        0.0
    } else if input_db >= above {
        (input_db - threshold_db) * slope
    } else {
        let x = input_db - below;
        slope / (2.0 * knee_db) * x * x
    }
}

/// Target gain of the limiter while the input is above the threshold.
#[inline]
pub(crate) fn limiter_target(level: f32, threshold: f32, ceiling: f32) -> f32 {
    (threshold / level).max(ceiling)
}

/// Target gain of the limiter during release.
///
/// While the envelope is still above the threshold, `sustain` (0..=1) of the
/// envelope-derived reduction is held; otherwise the gain returns to unity.
#[inline]
pub(crate) fn sustain_target(envelope: f32, threshold: f32, ceiling: f32, sustain: f32) -> f32 {
    let hold = if envelope > threshold {
        limiter_target(envelope, threshold, ceiling)
    } else {
        1.0
    };
    1.0 - sustain * (1.0 - hold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_gain() {
        assert_eq!(simple_gain(0.0), 1.0);
        assert_relative_eq!(simple_gain(0.5), 2.0 / 3.0);
        assert_eq!(simple_gain(-1.0), 1.0);
    }

    #[test]
    fn test_hard_knee_reduction() {
        assert_eq!(ratio_reduction_db(-30.0, -20.0, 4.0, 0.0), 0.0);
        assert_relative_eq!(ratio_reduction_db(-8.0, -20.0, 4.0, 0.0), 9.0);
    }

    #[test]
    fn test_soft_knee_is_continuous() {
        let (t, r, k) = (-20.0, 4.0, 12.0);
        assert_eq!(ratio_reduction_db(-26.0, t, r, k), 0.0);
        assert_relative_eq!(
            ratio_reduction_db(-14.0 - 1e-3, t, r, k),
            ratio_reduction_db(-14.0, t, r, k),
            epsilon = 1e-2
        );
        let mid = ratio_reduction_db(-20.0, t, r, k);
        assert!(mid > 0.0 && mid < ratio_reduction_db(-14.0, t, r, k));
    }

    #[test]
    fn test_limiter_target_respects_ceiling() {
        assert_relative_eq!(limiter_target(0.5, 0.25, 0.1), 0.5);
        assert_eq!(limiter_target(10.0, 0.25, 0.1), 0.1);
    }

    #[test]
    fn test_sustain_target() {
        assert_eq!(sustain_target(0.1, 0.25, 0.1, 0.29), 1.0);
        assert_relative_eq!(sustain_target(0.5, 0.25, 0.1, 1.0), 0.5);
        assert_relative_eq!(sustain_target(0.5, 0.25, 0.1, 0.0), 1.0);
        assert_relative_eq!(sustain_target(0.5, 0.25, 0.1, 0.29), 1.0 - 0.29 * 0.5);
    }
}

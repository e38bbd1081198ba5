//! Block-level behaviour shared by every pipeline: silence, channel policy,
//! numeric hardening and parameter sampling.

mod helpers;

use helpers::tolerances::*;
use helpers::*;
use phat::prelude::*;
use phat::{Arc, BYPASS_PARAM, GAIN_PARAM};

fn plain_pipeline() -> ChannelPipeline {
    PipelineBuilder::new("plain").build().unwrap()
}

#[test]
fn test_silent_block_stays_silent() {
    for mut plugin in all_plugins() {
        plugin.prepare(test_spec());
        let out = process_constant(plugin.as_mut(), &[0.0, 0.0], 50);
        for channel in &out {
            assert_finite(channel);
            assert!(
                channel.iter().all(|&s| s == 0.0),
                "{} produced output from silence",
                plugin.name()
            );
        }
    }
}

#[test]
fn test_surplus_channels_are_silenced() {
    for mut plugin in all_plugins() {
        plugin.prepare(test_spec());

        let mut channels = vec![
            vec![0.1; TEST_BUFFER_SIZE],
            vec![0.1; TEST_BUFFER_SIZE],
            vec![0.7; TEST_BUFFER_SIZE],
            vec![-0.3; TEST_BUFFER_SIZE],
        ];
        process_channels(plugin.as_mut(), &mut channels);

        assert_eq!(channels.len(), 4);
        assert!(channels.iter().all(|c| c.len() == TEST_BUFFER_SIZE));
        assert_audible(&channels[0], 0.001);
        assert_audible(&channels[1], 0.001);
        assert_silent(&channels[2], 0.0);
        assert_silent(&channels[3], 0.0);
    }
}

#[test]
fn test_fewer_channels_than_prepared() {
    let mut bass = PhatBass::new();
    bass.prepare(test_spec());

    let mut channels = vec![sine(80.0, 1.0, TEST_BUFFER_SIZE)];
    process_channels(&mut bass, &mut channels);

    assert_eq!(channels.len(), 1);
    assert_finite(&channels[0]);
    assert_audible(&channels[0], 0.001);
}

#[test]
fn test_block_longer_than_max_block_size() {
    let mut limiter = GainLimiter::new();
    limiter.prepare(ProcessSpec::new(TEST_SAMPLE_RATE, 64, 2));

    let mut channels = vec![noise(1000, 7), noise(1000, 8)];
    process_channels(&mut limiter, &mut channels);
    assert_finite(&channels[0]);
    assert_finite(&channels[1]);
}

#[test]
fn test_empty_block() {
    let mut bass = PhatBass::new();
    bass.prepare(test_spec());
    let mut channels = vec![Vec::new(), Vec::new()];
    process_channels(&mut bass, &mut channels);
    assert!(channels.iter().all(|c| c.is_empty()));
}

#[test]
fn test_non_finite_input_is_sanitized() {
    for mut plugin in all_plugins() {
        plugin.prepare(test_spec());

        let mut left = sine(100.0, 1.0, TEST_BUFFER_SIZE);
        left[10] = f32::NAN;
        left[20] = f32::INFINITY;
        left[30] = f32::NEG_INFINITY;
        let mut channels = vec![left, vec![f32::NAN; TEST_BUFFER_SIZE]];
        process_channels(plugin.as_mut(), &mut channels);

        for channel in &channels {
            assert_finite(channel);
        }

        // State must not be poisoned for the following blocks.
        let out = process_constant(plugin.as_mut(), &[0.0, 0.0], 100);
        assert_silent(&out[0], SILENCE_THRESHOLD);
        assert_silent(&out[1], SILENCE_THRESHOLD);
    }
}

#[test]
fn test_invalid_sample_rates_do_not_break_processing() {
    for sample_rate in [0.0, -44100.0, f64::NAN, 1.0e9] {
        for mut plugin in all_plugins() {
            plugin.prepare(ProcessSpec::new(sample_rate, TEST_BUFFER_SIZE, 2));
            assert!(plugin.is_prepared());

            let mut channels = vec![
                sine(440.0, 1.0, TEST_BUFFER_SIZE),
                noise(TEST_BUFFER_SIZE, 3),
            ];
            process_channels(plugin.as_mut(), &mut channels);
            assert_finite(&channels[0]);
            assert_finite(&channels[1]);
        }
    }
}

#[test]
fn test_try_prepare_reports_invalid_spec() {
    let mut limiter = GainLimiter::new();
    let err = limiter
        .try_prepare(ProcessSpec::new(0.0, TEST_BUFFER_SIZE, 2))
        .unwrap_err();
    assert!(matches!(
        err,
        phat::Error::Core(phat::core::Error::InvalidConfig(_))
    ));
    assert!(!limiter.is_prepared());
}

#[test]
fn test_gain_scales_linearly() {
    let mut pipeline = plain_pipeline();
    pipeline.prepare(test_spec());
    pipeline.parameters().set(GAIN_PARAM, 6.0).unwrap();

    let out = process_constant(&mut pipeline, &[0.1, -0.2], 1);
    let gain = 10f32.powf(6.0 / 20.0);
    assert!(out[0].iter().all(|&s| (s - 0.1 * gain).abs() < FLOAT_EPSILON));
    assert!(out[1].iter().all(|&s| (s + 0.2 * gain).abs() < FLOAT_EPSILON));

    pipeline.parameters().set(GAIN_PARAM, -6.0).unwrap();
    let mut channels = out;
    process_channels(&mut pipeline, &mut channels);
    assert!(channels[0].iter().all(|&s| (s - 0.1).abs() < FLOAT_EPSILON));
    assert!(channels[1].iter().all(|&s| (s + 0.2).abs() < FLOAT_EPSILON));
}

#[test]
fn test_gain_is_sampled_once_per_block() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    let mut pipeline = plain_pipeline();
    pipeline.prepare(test_spec());

    let params = Arc::clone(pipeline.parameters());
    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut db = -12.0f32;
            while !stop.load(Ordering::Relaxed) {
                params.set(GAIN_PARAM, db).unwrap();
                db = if db >= 12.0 { -12.0 } else { db + 0.5 };
            }
        })
    };

    for _ in 0..500 {
        let out = process_constant(&mut pipeline, &[0.25, 0.0], 1);
        let first = out[0][0];
        assert!(out[0].iter().all(|&s| s == first), "gain changed within a block");
    }

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn test_bypass_passes_input_through() {
    for mut plugin in all_plugins() {
        plugin.prepare(test_spec());
        plugin.set_parameter(BYPASS_PARAM, 1.0).unwrap();
        plugin.set_parameter(GAIN_PARAM, 12.0).unwrap();

        let input = noise(TEST_BUFFER_SIZE, 11);
        let mut channels = vec![input.clone(), input.clone(), vec![0.5; TEST_BUFFER_SIZE]];
        process_channels(plugin.as_mut(), &mut channels);

        assert_eq!(channels[0], input);
        assert_eq!(channels[1], input);
        assert_silent(&channels[2], 0.0);
    }
}

#[test]
fn test_bypass_still_sanitizes() {
    let mut bass = PhatBass::new();
    bass.prepare(test_spec());
    bass.set_parameter(BYPASS_PARAM, 1.0).unwrap();

    let out = process_constant(&mut bass, &[f32::NAN, f32::INFINITY], 1);
    assert!(out[0].iter().all(|&s| s == 0.0));
    assert!(out[1].iter().all(|&s| s == phat::dsp::utils::OUTPUT_LIMIT));
}

#[test]
fn test_bypass_is_transparent_above_full_scale() {
    for mut plugin in all_plugins() {
        plugin.prepare(test_spec());
        plugin.set_parameter(BYPASS_PARAM, 1.0).unwrap();

        let out = process_constant(plugin.as_mut(), &[20.0, -3.5], 1);
        assert!(out[0].iter().all(|&s| s == 20.0), "{} clipped", plugin.name());
        assert!(out[1].iter().all(|&s| s == -3.5), "{} clipped", plugin.name());
    }
}

#[test]
fn test_release_and_prepare_again() {
    let mut limiter = GainLimiter::new();
    limiter.prepare(test_spec());
    process_constant(&mut limiter, &[0.9, 0.9], 10);

    limiter.release();
    assert!(!limiter.is_prepared());

    limiter.prepare(ProcessSpec::new(44100.0, 256, 1));
    assert!(limiter.is_prepared());
    assert_eq!(limiter.spec().unwrap().num_channels, 1);
    assert_eq!(limiter.gain_reduction(0, 0), Some(1.0));
}

#[test]
fn test_custom_ratio_pipeline() {
    let mut pipeline = PipelineBuilder::new("ratio")
        .full_band(
            BandConfig::new(
                DynamicsProcessorBuilder::default()
                    .mode(DynamicsMode::Ratio)
                    .threshold_db(-20.0)
                    .ratio(4.0)
                    .ceiling_db(-40.0),
            )
            .envelope(0.001, 0.05),
        )
        .build()
        .unwrap();
    pipeline.prepare(test_spec());

    // 0 dBFS input is 20 dB over threshold; 4:1 leaves 5 dB, so -15 dB out.
    let out = process_constant(&mut pipeline, &[1.0, 0.0], 200);
    let expected = 10f32.powf(-15.0 / 20.0);
    assert!((out[0][TEST_BUFFER_SIZE - 1] - expected).abs() < SETTLE_EPSILON);
    assert_silent(&out[1], 0.0);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn output_is_always_finite(
            samples in prop::collection::vec(prop::num::f32::ANY, 1..256),
            gain_db in -100.0f32..100.0,
            plugin_index in 0usize..3,
        ) {
            let mut plugin = all_plugins().swap_remove(plugin_index);
            plugin.prepare(test_spec());
            plugin.set_parameter(GAIN_PARAM, gain_db).unwrap();

            let mut channels = vec![samples.clone(), samples];
            process_channels(plugin.as_mut(), &mut channels);

            for channel in &channels {
                for &s in channel {
                    prop_assert!(s.is_finite());
                }
            }
        }
    }
}

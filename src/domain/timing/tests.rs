// Unit tests for the timing classifier

use super::*;

fn uniform(count: usize, delta: f64) -> FrameTimingSample {
    let timestamps = (0..count).map(|i| i as f64 * delta).collect();
    FrameTimingSample::from_timestamps(timestamps).unwrap()
}

fn fps_of(verdict: &TimingVerdict) -> f64 {
    *verdict.fps.as_option().unwrap()
}

#[test]
fn test_constant_delta_is_cfr() {
    let verdict = TimingClassifier::classify(&uniform(300, 1.0 / 25.0));
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Cfr));
    assert!((fps_of(&verdict) - 25.0).abs() < 1e-9);
}

#[test]
fn test_ntsc_rate_from_rational_timebase() {
    // 29.97 fps in a 1/30000 timebase: every delta is exactly 1001 ticks
    let timestamps = (0..600).map(|i| (i * 1001) as f64 / 30000.0).collect();
    let sample = FrameTimingSample::from_timestamps(timestamps).unwrap();

    let verdict = TimingClassifier::classify(&sample);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Cfr));
    assert!((fps_of(&verdict) - 29.97002997).abs() < 1e-6);
}

#[test]
fn test_millisecond_timebase_jitter_stays_cfr() {
    // 29.97 fps quantised to whole milliseconds alternates 33/34 ms deltas
    let timestamps = (0..300)
        .map(|i| ((i as f64 * 1001.0 / 30.0).round()) / 1000.0)
        .collect();
    let sample = FrameTimingSample::from_timestamps(timestamps).unwrap();

    let verdict = TimingClassifier::classify(&sample);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Cfr));
}

#[test]
fn test_single_duplicated_frame_flips_to_vfr() {
    // 1000 deltas, one of them doubled
    let delta = 1001.0 / 30000.0;
    let mut timestamps = Vec::new();
    let mut t = 0.0;
    for i in 0..1001 {
        timestamps.push(t);
        t += if i == 500 { 2.0 * delta } else { delta };
    }
    let sample = FrameTimingSample::from_timestamps(timestamps).unwrap();

    let verdict = TimingClassifier::classify(&sample);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Vfr));
    assert!(verdict.max_relative_deviation.unwrap() > 0.9);
}

#[test]
fn test_single_short_delta_flips_to_vfr() {
    let mut timestamps: Vec<f64> = (0..50).map(|i| i as f64 * 0.04).collect();
    // One frame arrives 10 ms early
    timestamps[20] -= 0.01;
    let sample = FrameTimingSample::from_timestamps(timestamps).unwrap();

    let verdict = TimingClassifier::classify(&sample);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Vfr));
}

#[test]
fn test_deviation_either_side_of_tolerance() {
    // Mean delta is 1.0; the outer deltas sit 1.5% and 2.5% away from it
    let inside = FrameTimingSample::from_timestamps(vec![0.0, 0.985, 2.0, 3.0]).unwrap();
    let verdict = TimingClassifier::classify(&inside);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Cfr));

    let outside = FrameTimingSample::from_timestamps(vec![0.0, 0.975, 2.0, 3.0]).unwrap();
    let verdict = TimingClassifier::classify(&outside);
    assert_eq!(verdict.mode, Measurement::Measured(FrameRateMode::Vfr));
}

#[test]
fn test_too_few_timestamps_is_unknown() {
    for count in 0..=2 {
        let verdict = TimingClassifier::classify(&uniform(count, 0.04));
        assert_eq!(verdict, TimingVerdict::unknown(), "count = {}", count);
    }
}

#[test]
fn test_identical_timestamps_is_unknown() {
    let sample = FrameTimingSample::from_timestamps(vec![1.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(TimingClassifier::classify(&sample), TimingVerdict::unknown());
}

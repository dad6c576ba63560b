// Integration tests for the lap comparison pipeline
//
// These drive the public API end to end with small hand-checked laps:
// 1. Resample lap B onto lap A's distance axis and compute the delta
// 2. Detect corners from the reference braking channel
// 3. Attribute corners and classify driving style
// 4. Render the ranked insights

use lapvis::analysis::style::{CornerPriority, ThrottleStyle};
use lapvis::config::CornerConfig;
use lapvis::{
    AnalysisConfig, Driver, DriverNames, InsightCategory, LapComparison, LapTrace, LapVisError,
    StyleProfile, TelemetrySample, compute_delta, resample, segment_corners,
};

const TOLERANCE: f64 = 0.01;

fn lap(distance: &[f64], time: &[f64], speed: &[f64], brake: &[bool]) -> LapTrace {
    let samples = (0..distance.len())
        .map(|i| TelemetrySample {
            distance: distance[i],
            time: time[i],
            speed: speed[i],
            throttle: 50.,
            brake: brake[i],
            position: (distance[i], 0.),
        })
        .collect();
    LapTrace::new(samples).unwrap()
}

fn timing_lap(distance: &[f64], time: &[f64]) -> LapTrace {
    let n = distance.len();
    lap(distance, time, &vec![150.; n], &vec![false; n])
}

/// Constant-speed lap sampled every `step` meters with the given brake channel.
fn braking_lap(brake: &[bool], step: f64) -> LapTrace {
    let n = brake.len();
    let distance: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
    let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
    lap(&distance, &time, &vec![150.; n], brake)
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < TOLERANCE, "{actual:?} != {expected:?}");
    }
}

fn scenario_laps() -> (LapTrace, LapTrace) {
    (
        timing_lap(&[0., 100., 200., 300.], &[0., 10., 20., 30.]),
        timing_lap(&[0., 150., 300.], &[0., 16., 28.]),
    )
}

#[test]
fn test_resampled_time_and_delta() {
    let (lap_a, lap_b) = scenario_laps();

    let resampled = resample(&lap_a.distances(), &lap_b.distances(), &lap_b.times()).unwrap();
    assert_close(&resampled, &[0., 10.67, 21.33, 28.]);

    let delta = compute_delta(&lap_a, &lap_b).unwrap();
    assert_close(&delta.deltas(), &[0., 0.67, 1.33, -2.]);
    assert!((delta.overall_delta() + 2.).abs() < 1e-9);
    assert_eq!(delta.faster_overall(), Driver::Reference);
}

#[test]
fn test_delta_follows_the_reference_axis_both_ways() {
    let (lap_a, lap_b) = scenario_laps();
    assert_eq!(compute_delta(&lap_a, &lap_b).unwrap().len(), lap_a.len());
    assert_eq!(compute_delta(&lap_b, &lap_a).unwrap().len(), lap_b.len());
}

#[test]
fn test_resample_clamps_outside_source_range() {
    let values = resample(&[-50., 0., 300., 400.], &[0., 150., 300.], &[0., 16., 28.]).unwrap();
    assert_eq!(values, vec![0., 0., 28., 28.]);
}

#[test]
fn test_corners_at_each_braking_entry() {
    let brake = [false, false, true, true, false, false, true, true, false];
    let config = CornerConfig {
        min_spacing_m: 5.,
        ..CornerConfig::default()
    };
    let corners = segment_corners(&braking_lap(&brake, 10.), &config);
    let entries: Vec<f64> = corners.iter().map(|c| c.entry_distance).collect();
    assert_eq!(entries, vec![20., 60.]);
}

#[test]
fn test_close_braking_entries_are_one_corner() {
    // rising edges at 5m and 15m
    let lap = braking_lap(&[false, true, false, true, false], 5.);
    let corners = segment_corners(&lap, &CornerConfig::default());
    assert_eq!(corners.len(), 1);
    assert_eq!(corners.corners()[0].entry_distance, 5.);
}

#[test]
fn test_corner_cap() {
    let brake: Vec<bool> = (0..40).map(|i| i % 2 == 1).collect();
    let corners = segment_corners(&braking_lap(&brake, 100.), &CornerConfig::default());
    assert_eq!(corners.len(), 12);
    let entries: Vec<f64> = corners.iter().map(|c| c.entry_distance).collect();
    let expected: Vec<f64> = (0..12).map(|k| 100. + 200. * k as f64).collect();
    assert_eq!(entries, expected);
}

#[test]
fn test_no_braking_degrades_gracefully() {
    let lap_a = braking_lap(&[false; 50], 10.);
    let lap_b = timing_lap(
        &(0..50).map(|i| i as f64 * 10.).collect::<Vec<_>>(),
        &(0..50).map(|i| i as f64 * 1.1).collect::<Vec<_>>(),
    );

    let comparison = LapComparison::new(&lap_a, &lap_b, &AnalysisConfig::default()).unwrap();
    assert!(comparison.corners.is_empty());
    assert!(comparison.attributions.is_empty());
    assert_eq!(comparison.summary.gains_reference, 0);
    assert_eq!(comparison.summary.gains_challenger, 0);
    assert_eq!(comparison.summary.stronger(), None);
    assert_eq!(
        comparison.reference.style.corner_priority,
        CornerPriority::Balanced
    );
}

#[test]
fn test_constant_throttle_is_progressive() {
    let profile = StyleProfile::build(
        &braking_lap(&[false; 30], 10.),
        &AnalysisConfig::default().style,
    );
    assert_eq!(profile.throttle_style, ThrottleStyle::Progressive);
    assert_eq!(
        profile.throttle_style.to_string(),
        "Progressive Throttle Application"
    );
}

#[test]
fn test_single_sample_lap_is_rejected() {
    let result = LapTrace::new(vec![TelemetrySample::default()]);
    assert!(matches!(result, Err(LapVisError::InvalidTrace { .. })));
    assert!(matches!(
        LapTrace::new(Vec::new()),
        Err(LapVisError::InvalidTrace { .. })
    ));
}

#[test]
fn test_full_comparison_report() {
    // lap A is quicker through the braking zones, lap B on the straights
    let n = 120;
    let distance: Vec<f64> = (0..n).map(|i| i as f64 * 25.).collect();
    let brake: Vec<bool> = (0..n).map(|i| i % 30 >= 25).collect();
    let speed_a: Vec<f64> = brake.iter().map(|b| if *b { 110. } else { 240. }).collect();
    let speed_b: Vec<f64> = brake.iter().map(|b| if *b { 100. } else { 245. }).collect();
    let time_a: Vec<f64> = (0..n).map(|i| i as f64 * 0.4).collect();
    let time_b: Vec<f64> = (0..n).map(|i| i as f64 * 0.41).collect();

    let lap_a = lap(&distance, &time_a, &speed_a, &brake);
    let lap_b = lap(&distance, &time_b, &speed_b, &brake);

    let report = LapComparison::new(&lap_a, &lap_b, &AnalysisConfig::default())
        .unwrap()
        .report(&DriverNames::new("LEC", "NOR"));

    let comparison = &report.comparison;
    assert_eq!(comparison.delta.len(), n);
    assert_eq!(comparison.speed_delta.len(), n);
    assert_eq!(comparison.corners.len(), 4);
    assert_eq!(comparison.attributions.len(), 4);
    // lap B is slower everywhere, so every delta is positive
    assert_eq!(comparison.summary.gains_challenger, 4);
    assert_eq!(comparison.delta.faster_overall(), Driver::Challenger);

    let advantage = comparison.speed_advantage;
    assert_eq!(advantage.braking_zone, Some(10.));
    assert_eq!(advantage.straight_line, None);

    let insight = |category: InsightCategory| {
        report
            .insights
            .iter()
            .find(|i| i.category == category)
            .map(|i| i.message.clone())
    };
    assert_eq!(
        insight(InsightCategory::OverallPace).as_deref(),
        Some("NOR is faster overall than LEC on this lap.")
    );
    assert_eq!(
        insight(InsightCategory::BrakingZone).as_deref(),
        Some("LEC brakes later into heavy braking zones.")
    );
    assert_eq!(insight(InsightCategory::StraightLine), None);
    assert_eq!(
        insight(InsightCategory::Strategy).as_deref(),
        Some(
            "Recommended strategy for LEC: Medium → Soft (Aggressive). High speed variance indicates aggressive driving. Softer tyres faster."
        )
    );

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"insights\""));
}

use log::debug;
use serde::{Deserialize, Serialize};

use super::stats;
use crate::config::HazardThresholds;
use crate::telemetry::{LapTrace, TelemetrySample};

/// A sample singled out by one of the hazard scans.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedSample {
    pub sample_index: usize,
    pub distance: f64,
    pub speed: f64,
    pub position: (f64, f64),
}

impl FlaggedSample {
    fn new(sample_index: usize, sample: &TelemetrySample) -> Self {
        Self {
            sample_index,
            distance: sample.distance,
            speed: sample.speed,
            position: sample.position,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TyreStrategy {
    /// Hard → Medium
    LongStint,
    /// Medium → Soft
    Aggressive,
}

impl TyreStrategy {
    pub fn reason(&self) -> &'static str {
        match self {
            TyreStrategy::LongStint => {
                "Driver maintains high speed with low variance. Tyre wear is stable."
            }
            TyreStrategy::Aggressive => {
                "High speed variance indicates aggressive driving. Softer tyres faster."
            }
        }
    }
}

impl std::fmt::Display for TyreStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TyreStrategy::LongStint => write!(f, "Hard → Medium (Long Stint)"),
            TyreStrategy::Aggressive => write!(f, "Medium → Soft (Aggressive)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyHint {
    pub average_speed: f64,
    /// Standard deviation of the lap's speed
    pub consistency_index: f64,
    pub strategy: TyreStrategy,
}

/// Single-lap scans for slow zones at full throttle, braking at very high speed and a
/// tyre strategy hint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub anomalies: Vec<FlaggedSample>,
    pub risky_braking: Vec<FlaggedSample>,
    pub strategy: StrategyHint,
}

impl HazardReport {
    pub fn scan(trace: &LapTrace, thresholds: &HazardThresholds) -> Self {
        let speeds = trace.speeds();
        // a validated trace is never empty
        let average_speed = stats::mean(&speeds).unwrap_or(0.);
        let speed_std = stats::std_dev(&speeds).unwrap_or(0.);

        let slow_limit = average_speed - thresholds.anomaly_sigma * speed_std;
        let anomalies = flag(trace, |s| {
            s.speed < slow_limit && s.throttle > thresholds.anomaly_min_throttle
        });
        let risky_braking = flag(trace, |s| s.brake && s.speed > thresholds.risk_min_speed_kph);

        let strategy = if average_speed > thresholds.strategy_min_avg_speed_kph
            && speed_std < thresholds.strategy_max_speed_std
        {
            TyreStrategy::LongStint
        } else {
            TyreStrategy::Aggressive
        };

        debug!(
            "Hazard scan found {} anomalous slow zones and {} high-risk braking samples",
            anomalies.len(),
            risky_braking.len()
        );
        Self {
            anomalies,
            risky_braking,
            strategy: StrategyHint {
                average_speed,
                consistency_index: speed_std,
                strategy,
            },
        }
    }
}

fn flag(trace: &LapTrace, predicate: impl Fn(&TelemetrySample) -> bool) -> Vec<FlaggedSample> {
    trace
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, sample)| predicate(sample))
        .map(|(index, sample)| FlaggedSample::new(index, sample))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::test_support::trace;

    fn lap(speed: &[f64], throttle: &[f64], brake: &[bool]) -> LapTrace {
        let n = speed.len();
        let distance: Vec<f64> = (0..n).map(|i| i as f64 * 25.).collect();
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        trace(&distance, &time, speed, throttle, brake)
    }

    #[test]
    fn test_slow_full_throttle_sample_is_anomalous() {
        let mut speed = vec![200.; 20];
        speed[7] = 60.;
        let mut throttle = vec![50.; 20];
        throttle[7] = 95.;
        let report = HazardReport::scan(&lap(&speed, &throttle, &[false; 20]), &HazardThresholds::default());
        assert_eq!(report.anomalies.len(), 1);
        assert_eq!(report.anomalies[0].sample_index, 7);
        assert_eq!(report.anomalies[0].distance, 175.);
    }

    #[test]
    fn test_slow_sample_without_throttle_is_not_anomalous() {
        let mut speed = vec![200.; 20];
        speed[7] = 60.;
        let report = HazardReport::scan(&lap(&speed, &[50.; 20], &[false; 20]), &HazardThresholds::default());
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_high_speed_braking_is_risky() {
        let report = HazardReport::scan(
            &lap(&[240., 235., 180., 229.], &[0.; 4], &[true, false, true, true]),
            &HazardThresholds::default(),
        );
        let indices: Vec<usize> = report.risky_braking.iter().map(|f| f.sample_index).collect();
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn test_strategy_hint() {
        let fast_and_steady = HazardReport::scan(
            &lap(&[260., 270., 265., 275.], &[100.; 4], &[false; 4]),
            &HazardThresholds::default(),
        );
        assert_eq!(fast_and_steady.strategy.strategy, TyreStrategy::LongStint);
        assert_eq!(fast_and_steady.strategy.average_speed, 267.5);

        let varied = HazardReport::scan(
            &lap(&[100., 300., 90., 310.], &[100.; 4], &[false; 4]),
            &HazardThresholds::default(),
        );
        assert_eq!(varied.strategy.strategy, TyreStrategy::Aggressive);
        assert_eq!(varied.strategy.strategy.to_string(), "Medium → Soft (Aggressive)");
    }
}

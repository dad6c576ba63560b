use log::debug;
use serde::{Deserialize, Serialize};

use super::stats;
use crate::config::StyleThresholds;
use crate::telemetry::LapTrace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrakingStyle {
    LateBraker,
    EarlyBraker,
    /// The lap has no braking samples
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrottleStyle {
    Aggressive,
    Progressive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Smoothness {
    Unstable,
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerPriority {
    ExitFocused,
    EntryFocused,
    /// No braking point had enough samples around it
    Balanced,
}

impl std::fmt::Display for BrakingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrakingStyle::LateBraker => write!(f, "Late Braker"),
            BrakingStyle::EarlyBraker => write!(f, "Early Braker"),
            BrakingStyle::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::fmt::Display for ThrottleStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThrottleStyle::Aggressive => write!(f, "Aggressive Throttle Application"),
            ThrottleStyle::Progressive => write!(f, "Progressive Throttle Application"),
        }
    }
}

impl std::fmt::Display for Smoothness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Smoothness::Unstable => write!(f, "Unstable / Aggressive Inputs"),
            Smoothness::Smooth => write!(f, "Smooth / Controlled Inputs"),
        }
    }
}

impl std::fmt::Display for CornerPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CornerPriority::ExitFocused => write!(f, "Exit-Focused Driving"),
            CornerPriority::EntryFocused => write!(f, "Entry-Focused Driving"),
            CornerPriority::Balanced => write!(f, "Balanced"),
        }
    }
}

/// Driving style of a single lap along four independent axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub braking_style: BrakingStyle,
    pub throttle_style: ThrottleStyle,
    pub smoothness: Smoothness,
    pub corner_priority: CornerPriority,
}

impl StyleProfile {
    pub fn build(trace: &LapTrace, thresholds: &StyleThresholds) -> Self {
        let profile = Self {
            braking_style: braking_style(trace),
            throttle_style: throttle_style(trace, thresholds.throttle_gradient_threshold),
            smoothness: smoothness(trace, thresholds.speed_gradient_std_threshold),
            corner_priority: corner_priority(trace, thresholds.corner_priority_window),
        };
        debug!("Built style profile {:?}", profile);
        profile
    }
}

/// Late when the average braking position sits in the second half of the lap.
fn braking_style(trace: &LapTrace) -> BrakingStyle {
    let braking_distances: Vec<f64> = trace
        .samples()
        .iter()
        .filter(|s| s.brake)
        .map(|s| s.distance)
        .collect();
    match stats::mean(&braking_distances) {
        None => BrakingStyle::Unknown,
        Some(mean) if mean > trace.total_distance() / 2. => BrakingStyle::LateBraker,
        Some(_) => BrakingStyle::EarlyBraker,
    }
}

fn throttle_style(trace: &LapTrace, threshold: f64) -> ThrottleStyle {
    let gradient: Vec<f64> = stats::gradient(&trace.throttles())
        .into_iter()
        .map(f64::abs)
        .collect();
    match stats::mean(&gradient) {
        Some(mean) if mean > threshold => ThrottleStyle::Aggressive,
        _ => ThrottleStyle::Progressive,
    }
}

fn smoothness(trace: &LapTrace, threshold: f64) -> Smoothness {
    match stats::std_dev(&stats::gradient(&trace.speeds())) {
        Some(std) if std > threshold => Smoothness::Unstable,
        _ => Smoothness::Smooth,
    }
}

/// Compares mean speed in the `window` samples before each braking point with the
/// `window` samples from it onward. A braking point needs more than `window` samples
/// on both sides of it to count.
fn corner_priority(trace: &LapTrace, window: usize) -> CornerPriority {
    let speeds = trace.speeds();
    let (pre, post): (Vec<f64>, Vec<f64>) = trace
        .braking_rising_edges()
        .into_iter()
        .filter(|&i| i > window && i + window < speeds.len())
        .filter_map(|i| {
            Some((
                stats::mean(&speeds[i - window..i])?,
                stats::mean(&speeds[i..i + window])?,
            ))
        })
        .unzip();

    match (stats::mean(&pre), stats::mean(&post)) {
        (Some(pre), Some(post)) if post > pre => CornerPriority::ExitFocused,
        (Some(_), Some(_)) => CornerPriority::EntryFocused,
        _ => CornerPriority::Balanced,
    }
}

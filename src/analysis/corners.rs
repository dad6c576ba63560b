use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::CornerConfig;
use crate::telemetry::LapTrace;

/// A braking-zone entry detected on the reference lap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    /// 1-based position in the corner list ("Turn n")
    pub number: usize,
    /// Index of the sample where the brake was first pressed
    pub sample_index: usize,
    pub entry_distance: f64,
    /// Speed at the braking point, km/h
    pub entry_speed: f64,
}

/// Corners of one lap in distance order, de-noised and capped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerList {
    corners: Vec<Corner>,
}

impl CornerList {
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Corner> {
        self.corners.iter()
    }
}

impl<'a> IntoIterator for &'a CornerList {
    type Item = &'a Corner;
    type IntoIter = std::slice::Iter<'a, Corner>;

    fn into_iter(self) -> Self::IntoIter {
        self.corners.iter()
    }
}

/// Detects corner entries from the braking channel of `trace`.
///
/// Every released-to-pressed transition is a candidate. A candidate is kept only when it
/// lies more than `min_spacing_m` past the previously kept one, which folds brake pedal
/// modulation inside one braking zone into a single corner. At most `max_corners` are
/// returned.
pub fn segment_corners(trace: &LapTrace, config: &CornerConfig) -> CornerList {
    let samples = trace.samples();
    let mut corners: Vec<Corner> = Vec::new();
    let mut last_kept: Option<f64> = None;

    for index in trace.braking_rising_edges() {
        if corners.len() == config.max_corners {
            break;
        }
        let sample = &samples[index];
        if let Some(last) = last_kept
            && sample.distance - last <= config.min_spacing_m
        {
            debug!(
                "Dropping braking point at {:.1}m, {:.1}m after the previous corner",
                sample.distance,
                sample.distance - last
            );
            continue;
        }
        last_kept = Some(sample.distance);
        corners.push(Corner {
            number: corners.len() + 1,
            sample_index: index,
            entry_distance: sample.distance,
            entry_speed: sample.speed,
        });
    }

    if corners.is_empty() {
        warn!("No corners detected in lap, braking channel has no entries");
    } else {
        debug!("Detected {} corners", corners.len());
    }
    CornerList { corners }
}

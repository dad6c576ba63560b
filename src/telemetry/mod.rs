pub mod loader;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::{LapVisError, Result};

/// Minimum number of samples needed to interpolate or differentiate a lap.
pub const MIN_TRACE_SAMPLES: usize = 2;

/// One row of a lap's telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Meters traveled from S/F this lap
    pub distance: f64,
    /// Seconds elapsed since the lap started
    pub time: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Throttle use. 0=off throttle to 100=full throttle
    pub throttle: f64,
    /// Whether the brake pedal is pressed
    pub brake: bool,
    /// Track-local coordinates derived from GPS
    pub position: (f64, f64),
}

/// Ordered telemetry samples of one driver's lap.
///
/// A `LapTrace` can only be built through [`LapTrace::new`] (deserialization goes through
/// the same validation), so every trace handed to the analysis code has at least
/// [`MIN_TRACE_SAMPLES`] finite samples with non-decreasing distance and time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TelemetrySample>", into = "Vec<TelemetrySample>")]
pub struct LapTrace {
    samples: Vec<TelemetrySample>,
}

impl LapTrace {
    pub fn new(samples: Vec<TelemetrySample>) -> Result<Self> {
        if samples.len() < MIN_TRACE_SAMPLES {
            return Err(LapVisError::invalid_trace(format!(
                "expected at least {} samples, got {}",
                MIN_TRACE_SAMPLES,
                samples.len()
            )));
        }

        if let Some((index, _)) = samples.iter().find_position(|s| !is_finite_sample(s)) {
            return Err(LapVisError::invalid_trace(format!(
                "non-finite value in sample {index}"
            )));
        }

        for (index, (prev, cur)) in samples.iter().tuple_windows().enumerate() {
            if cur.distance < prev.distance {
                return Err(LapVisError::invalid_trace(format!(
                    "distance decreases at sample {}",
                    index + 1
                )));
            }
            if cur.time < prev.time {
                return Err(LapVisError::invalid_trace(format!(
                    "time decreases at sample {}",
                    index + 1
                )));
            }
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a validated trace, kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.channel(|s| s.distance)
    }

    pub fn times(&self) -> Vec<f64> {
        self.channel(|s| s.time)
    }

    pub fn speeds(&self) -> Vec<f64> {
        self.channel(|s| s.speed)
    }

    pub fn throttles(&self) -> Vec<f64> {
        self.channel(|s| s.throttle)
    }

    pub fn channel(&self, extract: impl Fn(&TelemetrySample) -> f64) -> Vec<f64> {
        self.samples.iter().map(extract).collect()
    }

    /// Distance of the last sample, i.e. the length of the lap as recorded.
    pub fn total_distance(&self) -> f64 {
        self.samples.last().map(|s| s.distance).unwrap_or(0.)
    }

    /// Number of samples with the brake pressed.
    pub fn brake_sample_count(&self) -> usize {
        self.samples.iter().filter(|s| s.brake).count()
    }

    /// Indices where the brake goes from released to pressed.
    ///
    /// Index 0 is never an edge, so a lap that starts under braking does not count it.
    pub fn braking_rising_edges(&self) -> Vec<usize> {
        self.samples
            .iter()
            .tuple_windows()
            .enumerate()
            .filter(|(_, (prev, cur))| cur.brake && !prev.brake)
            .map(|(index, _)| index + 1)
            .collect()
    }
}

impl TryFrom<Vec<TelemetrySample>> for LapTrace {
    type Error = LapVisError;

    fn try_from(samples: Vec<TelemetrySample>) -> Result<Self> {
        LapTrace::new(samples)
    }
}

impl From<LapTrace> for Vec<TelemetrySample> {
    fn from(value: LapTrace) -> Self {
        value.samples
    }
}

fn is_finite_sample(sample: &TelemetrySample) -> bool {
    sample.distance.is_finite()
        && sample.time.is_finite()
        && sample.speed.is_finite()
        && sample.throttle.is_finite()
        && sample.position.0.is_finite()
        && sample.position.1.is_finite()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a trace from parallel channels, with positions laid out along the x axis.
    pub(crate) fn trace(
        distance: &[f64],
        time: &[f64],
        speed: &[f64],
        throttle: &[f64],
        brake: &[bool],
    ) -> LapTrace {
        let samples = (0..distance.len())
            .map(|i| TelemetrySample {
                distance: distance[i],
                time: time[i],
                speed: speed[i],
                throttle: throttle[i],
                brake: brake[i],
                position: (distance[i], 0.),
            })
            .collect();
        LapTrace::new(samples).unwrap()
    }

    /// A trace at constant speed with the given brake channel, one sample every `step` meters.
    pub(crate) fn braking_trace(brake: &[bool], step: f64) -> LapTrace {
        let n = brake.len();
        let distance: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
        let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
        trace(&distance, &time, &vec![150.; n], &vec![50.; n], brake)
    }
}

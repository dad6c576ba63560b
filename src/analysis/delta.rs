use itertools::{Itertools, MinMaxResult};
use log::debug;
use serde::{Deserialize, Serialize};
use uom::si::f64::{Length, Time, Velocity};
use uom::si::{length::meter, time::second, velocity::kilometer_per_hour};

use super::{Driver, resample::resample, stats};
use crate::config::SpeedAdvantageConfig;
use crate::errors::{LapVisError, Result};
use crate::telemetry::LapTrace;

/// Lap B's time channel expressed on lap A's distance axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedPair {
    pub distance: Vec<f64>,
    pub time_a: Vec<f64>,
    pub time_b: Vec<f64>,
}

impl AlignedPair {
    pub fn align(lap_a: &LapTrace, lap_b: &LapTrace) -> Result<Self> {
        let distance = lap_a.distances();
        let time_b = resample(&distance, &lap_b.distances(), &lap_b.times())?;
        Ok(Self {
            distance,
            time_a: lap_a.times(),
            time_b,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeltaPoint {
    pub distance: f64,
    /// `time_b - time_a`; negative when lap A is ahead at this distance
    pub delta: f64,
}

/// Time delta between two laps along lap A's distance axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeltaCurve {
    points: Vec<DeltaPoint>,
}

impl DeltaCurve {
    pub fn new(points: Vec<DeltaPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DeltaPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn deltas(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.delta).collect()
    }

    /// Delta at the end of the lap. Negative means lap A is faster overall.
    pub fn overall_delta(&self) -> f64 {
        self.points.last().map(|p| p.delta).unwrap_or(0.)
    }

    pub fn faster_overall(&self) -> Driver {
        Driver::gaining(self.overall_delta())
    }

    /// Point where lap A is furthest ahead (the smallest delta, first one on ties).
    pub fn biggest_gain(&self) -> Option<DeltaPoint> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| a.delta.total_cmp(&b.delta))
    }

    /// Mean delta of the points with `from <= distance <= to`.
    pub fn mean_between(&self, from: f64, to: f64) -> Option<f64> {
        self.mean_where(|distance| distance >= from && distance <= to)
    }

    pub fn mean_where(&self, include: impl Fn(f64) -> bool) -> Option<f64> {
        let selected = self
            .points
            .iter()
            .filter(|p| include(p.distance))
            .map(|p| p.delta)
            .collect_vec();
        stats::mean(&selected)
    }

    /// Rescales deltas into `[0, 1]`, 0 being the biggest gain for lap A and 1 the biggest loss.
    pub fn try_normalize(&self) -> Result<Vec<f64>> {
        let (min, max) = match self.points.iter().map(|p| p.delta).minmax() {
            MinMaxResult::NoElements => return Ok(Vec::new()),
            MinMaxResult::OneElement(_) => return Err(LapVisError::DegenerateRange),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let range = max - min;
        if range == 0. || !range.is_finite() {
            return Err(LapVisError::DegenerateRange);
        }
        Ok(self.points.iter().map(|p| (p.delta - min) / range).collect())
    }

    /// Same as [`DeltaCurve::try_normalize`] but a flat curve maps to all zeros.
    pub fn normalized_loss(&self) -> Vec<f64> {
        self.try_normalize().unwrap_or_else(|e| {
            debug!("{e}, using all-zero time loss");
            vec![0.; self.points.len()]
        })
    }
}

/// Time delta of lap B against lap A, one point per sample of lap A.
pub fn compute_delta(lap_a: &LapTrace, lap_b: &LapTrace) -> Result<DeltaCurve> {
    let aligned = AlignedPair::align(lap_a, lap_b)?;
    let points = aligned
        .distance
        .iter()
        .zip(aligned.time_a.iter().zip(&aligned.time_b))
        .map(|(&distance, (time_a, time_b))| DeltaPoint {
            distance,
            delta: time_b - time_a,
        })
        .collect_vec();
    let curve = DeltaCurve::new(points);
    debug!(
        "Computed delta over {} points, overall {:.3}s",
        curve.len(),
        curve.overall_delta()
    );
    Ok(curve)
}

/// Point-wise `speed_a - speed_b` with lap B's speed resampled onto lap A's distance axis.
pub fn cumulative_speed_delta(lap_a: &LapTrace, lap_b: &LapTrace) -> Result<Vec<f64>> {
    let speed_b = resample(&lap_a.distances(), &lap_b.distances(), &lap_b.speeds())?;
    Ok(lap_a
        .speeds()
        .iter()
        .zip(speed_b)
        .map(|(a, b)| a - b)
        .collect())
}

/// Mean speed delta on the straights and in the braking zones of lap A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedAdvantage {
    /// Mean delta where lap A's speed is above the straight percentile
    pub straight_line: Option<f64>,
    /// Mean delta where lap A's speed is below the braking percentile
    pub braking_zone: Option<f64>,
}

impl SpeedAdvantage {
    pub fn new(lap_a: &LapTrace, speed_delta: &[f64], config: &SpeedAdvantageConfig) -> Self {
        let speeds = lap_a.speeds();
        let masked_mean = |keep: &dyn Fn(f64) -> bool| {
            let selected = speeds
                .iter()
                .zip(speed_delta)
                .filter(|(speed, _)| keep(**speed))
                .map(|(_, delta)| *delta)
                .collect_vec();
            stats::mean(&selected)
        };

        let straight_line = stats::percentile(&speeds, config.straight_percentile)
            .and_then(|threshold| masked_mean(&|speed| speed > threshold));
        let braking_zone = stats::percentile(&speeds, config.braking_percentile)
            .and_then(|threshold| masked_mean(&|speed| speed < threshold));

        Self {
            straight_line,
            braking_zone,
        }
    }
}

/// Estimates the delta from speed alone by integrating `ds / v` along lap A's distance
/// axis for both laps. Steps where either speed is not positive contribute nothing.
pub fn speed_integrated_delta(lap_a: &LapTrace, lap_b: &LapTrace) -> Result<DeltaCurve> {
    let distance = lap_a.distances();
    let speed_a = lap_a.speeds();
    let speed_b = resample(&distance, &lap_b.distances(), &lap_b.speeds())?;

    let mut cumulative = 0.;
    let mut points = Vec::with_capacity(distance.len());
    points.push(DeltaPoint {
        distance: distance[0],
        delta: 0.,
    });
    for i in 1..distance.len() {
        let step = Length::new::<meter>(distance[i] - distance[i - 1]);
        let v_a = 0.5 * (speed_a[i] + speed_a[i - 1]);
        let v_b = 0.5 * (speed_b[i] + speed_b[i - 1]);
        if v_a > 0. && v_b > 0. {
            let t_a: Time = step / Velocity::new::<kilometer_per_hour>(v_a);
            let t_b: Time = step / Velocity::new::<kilometer_per_hour>(v_b);
            cumulative += (t_b - t_a).get::<second>();
        }
        points.push(DeltaPoint {
            distance: distance[i],
            delta: cumulative,
        });
    }
    Ok(DeltaCurve::new(points))
}

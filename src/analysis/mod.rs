pub mod attribution;
pub mod corners;
pub mod delta;
pub mod hazards;
pub mod insights;
pub mod resample;
mod stats;
pub mod style;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::telemetry::LapTrace;
use attribution::{
    AttributionSummary, CornerAttribution, SectorSplit, SpeedClassBreakdown, attribute_corners,
};
use corners::{CornerList, segment_corners};
use delta::{DeltaCurve, SpeedAdvantage, compute_delta, cumulative_speed_delta};
use hazards::HazardReport;
use insights::{DriverNames, Insight, synthesize};
use style::StyleProfile;

/// One of the two laps in a comparison. The reference lap (A) provides the distance axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    Reference,
    Challenger,
}

impl Driver {
    /// Driver ahead for a `t_B - t_A` delta. Zero and NaN go to the challenger.
    pub fn gaining(delta: f64) -> Self {
        if delta < 0. {
            Driver::Reference
        } else {
            Driver::Challenger
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Driver::Reference => Driver::Challenger,
            Driver::Challenger => Driver::Reference,
        }
    }
}

/// Single-lap results: style labels, hazard scans and braking volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapOverview {
    pub style: StyleProfile,
    pub hazards: HazardReport,
    /// Number of samples with the brake pressed
    pub brake_samples: usize,
}

impl LapOverview {
    pub fn new(trace: &LapTrace, config: &AnalysisConfig) -> Self {
        Self {
            style: StyleProfile::build(trace, &config.style),
            hazards: HazardReport::scan(trace, &config.hazards),
            brake_samples: trace.brake_sample_count(),
        }
    }
}

/// Every result of comparing a challenger lap against a reference lap.
///
/// Built in one pass by [`LapComparison::new`]; the fields are plain data and nothing is
/// kept between comparisons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapComparison {
    pub delta: DeltaCurve,
    /// `speed_a - speed_b` on the reference distance axis
    pub speed_delta: Vec<f64>,
    pub speed_advantage: SpeedAdvantage,
    /// Corners detected on the reference lap
    pub corners: CornerList,
    pub attributions: Vec<CornerAttribution>,
    pub summary: AttributionSummary,
    pub speed_classes: SpeedClassBreakdown,
    pub sectors: SectorSplit,
    pub reference: LapOverview,
    pub challenger: LapOverview,
}

impl LapComparison {
    pub fn new(lap_a: &LapTrace, lap_b: &LapTrace, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let delta = compute_delta(lap_a, lap_b)?;
        let speed_delta = cumulative_speed_delta(lap_a, lap_b)?;
        let speed_advantage = SpeedAdvantage::new(lap_a, &speed_delta, &config.speed_advantage);

        let corners = segment_corners(lap_a, &config.corners);
        let attributions =
            attribute_corners(&corners, &delta, &config.corners, &config.speed_classes);
        let summary = AttributionSummary::new(&attributions);
        let speed_classes = SpeedClassBreakdown::new(&attributions);
        let sectors = SectorSplit::new(&delta);

        info!(
            "Compared laps: overall delta {:.3}s over {} points, {} corners",
            delta.overall_delta(),
            delta.len(),
            corners.len()
        );

        Ok(Self {
            delta,
            speed_delta,
            speed_advantage,
            corners,
            attributions,
            summary,
            speed_classes,
            sectors,
            reference: LapOverview::new(lap_a, config),
            challenger: LapOverview::new(lap_b, config),
        })
    }

    pub fn insights(&self, names: &DriverNames) -> Vec<Insight> {
        synthesize(self, names)
    }

    pub fn report(self, names: &DriverNames) -> ComparisonReport {
        let insights = self.insights(names);
        ComparisonReport {
            names: names.clone(),
            comparison: self,
            insights,
        }
    }
}

/// A comparison together with its rendered insights, ready to serialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub names: DriverNames,
    pub comparison: LapComparison,
    pub insights: Vec<Insight>,
}

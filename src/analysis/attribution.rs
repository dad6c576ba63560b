use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    Driver,
    corners::{Corner, CornerList},
    delta::DeltaCurve,
};
use crate::config::{CornerConfig, SpeedClassBands};

/// Corner bucket by speed at the braking point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedClass {
    Slow,
    Medium,
    Fast,
}

impl SpeedClass {
    pub fn classify(entry_speed: f64, bands: &SpeedClassBands) -> Self {
        if entry_speed < bands.slow_max_kph {
            SpeedClass::Slow
        } else if entry_speed < bands.fast_min_kph {
            SpeedClass::Medium
        } else {
            SpeedClass::Fast
        }
    }
}

impl std::fmt::Display for SpeedClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedClass::Slow => write!(f, "Slow"),
            SpeedClass::Medium => write!(f, "Medium speed"),
            SpeedClass::Fast => write!(f, "High speed"),
        }
    }
}

/// Which driver is faster through one corner window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerAttribution {
    pub corner: Corner,
    /// Mean delta over the corner window
    pub corner_delta: f64,
    pub gaining: Driver,
    pub speed_class: SpeedClass,
}

impl CornerAttribution {
    /// Time gained by the faster driver, in seconds.
    pub fn magnitude(&self) -> f64 {
        self.corner_delta.abs()
    }
}

/// Attributes the delta around every corner entry to the driver gaining there.
///
/// Corners whose window holds no delta point (a corner list from another lap) are skipped.
pub fn attribute_corners(
    corners: &CornerList,
    delta: &DeltaCurve,
    config: &CornerConfig,
    bands: &SpeedClassBands,
) -> Vec<CornerAttribution> {
    corners
        .iter()
        .filter_map(|corner| {
            let half_width = config.window_half_width_m;
            let Some(corner_delta) = delta.mean_between(
                corner.entry_distance - half_width,
                corner.entry_distance + half_width,
            ) else {
                debug!(
                    "Turn {} at {:.1}m has no delta samples in its window",
                    corner.number, corner.entry_distance
                );
                return None;
            };
            Some(CornerAttribution {
                corner: *corner,
                corner_delta,
                gaining: Driver::gaining(corner_delta),
                speed_class: SpeedClass::classify(corner.entry_speed, bands),
            })
        })
        .collect()
}

/// Corner counts won by each driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionSummary {
    pub gains_reference: usize,
    pub gains_challenger: usize,
}

impl AttributionSummary {
    pub fn new(attributions: &[CornerAttribution]) -> Self {
        let gains_reference = attributions
            .iter()
            .filter(|a| a.gaining == Driver::Reference)
            .count();
        Self {
            gains_reference,
            gains_challenger: attributions.len() - gains_reference,
        }
    }

    pub fn total(&self) -> usize {
        self.gains_reference + self.gains_challenger
    }

    /// Driver gaining in more corners; the challenger on a tie, nobody without corners.
    pub fn stronger(&self) -> Option<Driver> {
        match self.total() {
            0 => None,
            _ if self.gains_reference > self.gains_challenger => Some(Driver::Reference),
            _ => Some(Driver::Challenger),
        }
    }

    pub fn gains(&self, driver: Driver) -> usize {
        match driver {
            Driver::Reference => self.gains_reference,
            Driver::Challenger => self.gains_challenger,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerTypeVerdict {
    SlowCornerSpecialist,
    HighSpeedSpecialist,
    Balanced,
}

/// Corners gained by the reference driver in each speed class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedClassBreakdown {
    pub slow_gains: usize,
    pub medium_gains: usize,
    pub fast_gains: usize,
}

impl SpeedClassBreakdown {
    pub fn new(attributions: &[CornerAttribution]) -> Self {
        let mut breakdown = Self::default();
        for attribution in attributions
            .iter()
            .filter(|a| a.gaining == Driver::Reference)
        {
            match attribution.speed_class {
                SpeedClass::Slow => breakdown.slow_gains += 1,
                SpeedClass::Medium => breakdown.medium_gains += 1,
                SpeedClass::Fast => breakdown.fast_gains += 1,
            }
        }
        breakdown
    }

    pub fn gains(&self, class: SpeedClass) -> usize {
        match class {
            SpeedClass::Slow => self.slow_gains,
            SpeedClass::Medium => self.medium_gains,
            SpeedClass::Fast => self.fast_gains,
        }
    }

    /// Needs a strict majority over both other classes, anything else is balanced.
    pub fn verdict(&self) -> CornerTypeVerdict {
        if self.slow_gains > self.medium_gains && self.slow_gains > self.fast_gains {
            CornerTypeVerdict::SlowCornerSpecialist
        } else if self.fast_gains > self.slow_gains && self.fast_gains > self.medium_gains {
            CornerTypeVerdict::HighSpeedSpecialist
        } else {
            CornerTypeVerdict::Balanced
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    First,
    Second,
    Third,
}

impl Sector {
    pub fn description(&self) -> &'static str {
        match self {
            Sector::First => "Sector 1 (high speed)",
            Sector::Second => "Sector 2 (technical corners)",
            Sector::Third => "Sector 3 (corner exits)",
        }
    }
}

/// Mean delta over three equal-distance thirds of the lap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorSplit {
    pub sector_means: [Option<f64>; 3],
    pub strongest: Sector,
}

impl SectorSplit {
    pub fn new(delta: &DeltaCurve) -> Self {
        let total = delta.points().last().map(|p| p.distance).unwrap_or(0.);
        let s1 = total / 3.;
        let s2 = 2. * total / 3.;

        let sector_means = [
            delta.mean_where(|d| d < s1),
            delta.mean_where(|d| d >= s1 && d < s2),
            delta.mean_where(|d| d >= s2),
        ];
        // an empty third can never be the strongest
        let [m1, m2, m3] = sector_means.map(|m| m.unwrap_or(f64::INFINITY));

        // sector 2 must beat both others outright, then sector 1 must beat sector 3
        let strongest = if m2 < m1 && m2 < m3 {
            Sector::Second
        } else if m1 < m3 {
            Sector::First
        } else {
            Sector::Third
        };

        Self {
            sector_means,
            strongest,
        }
    }
}

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{LapVisError, Result};

const CONFIG_DIR_NAME: &str = "lapvis";
const CONFIG_FILE_NAME: &str = "config.json";

/// Minimum distance between two kept corner entries, in meters
pub const DEFAULT_MIN_CORNER_SPACING_M: f64 = 80.;
/// Half width of the delta window centred on a corner entry, in meters
pub const DEFAULT_CORNER_WINDOW_HALF_WIDTH_M: f64 = 40.;
/// Number of corners kept for attribution
pub const DEFAULT_MAX_CORNERS: usize = 12;
/// Entry speeds below this are slow corners (km/h)
pub const DEFAULT_SLOW_CORNER_MAX_KPH: f64 = 120.;
/// Entry speeds at or above this are fast corners (km/h)
pub const DEFAULT_FAST_CORNER_MIN_KPH: f64 = 220.;
/// Mean absolute throttle gradient above which throttle application is aggressive
pub const DEFAULT_THROTTLE_GRADIENT_THRESHOLD: f64 = 8.;
/// Standard deviation of the speed gradient above which inputs are unstable
pub const DEFAULT_SPEED_GRADIENT_STD_THRESHOLD: f64 = 12.;
/// Samples averaged before and after a braking point for corner priority
pub const DEFAULT_CORNER_PRIORITY_WINDOW: usize = 20;

/// Corner segmentation and attribution parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CornerConfig {
    pub min_spacing_m: f64,
    pub window_half_width_m: f64,
    pub max_corners: usize,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            min_spacing_m: DEFAULT_MIN_CORNER_SPACING_M,
            window_half_width_m: DEFAULT_CORNER_WINDOW_HALF_WIDTH_M,
            max_corners: DEFAULT_MAX_CORNERS,
        }
    }
}

/// Band edges used to bucket corners by their entry speed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpeedClassBands {
    pub slow_max_kph: f64,
    pub fast_min_kph: f64,
}

impl Default for SpeedClassBands {
    fn default() -> Self {
        Self {
            slow_max_kph: DEFAULT_SLOW_CORNER_MAX_KPH,
            fast_min_kph: DEFAULT_FAST_CORNER_MIN_KPH,
        }
    }
}

/// Tunable thresholds of the driving style classifier. These are fixed cut-offs,
/// not statistics derived from the lap.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StyleThresholds {
    pub throttle_gradient_threshold: f64,
    pub speed_gradient_std_threshold: f64,
    pub corner_priority_window: usize,
}

impl Default for StyleThresholds {
    fn default() -> Self {
        Self {
            throttle_gradient_threshold: DEFAULT_THROTTLE_GRADIENT_THRESHOLD,
            speed_gradient_std_threshold: DEFAULT_SPEED_GRADIENT_STD_THRESHOLD,
            corner_priority_window: DEFAULT_CORNER_PRIORITY_WINDOW,
        }
    }
}

/// Percentiles of the reference lap's speed selecting straights and braking zones.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpeedAdvantageConfig {
    pub straight_percentile: f64,
    pub braking_percentile: f64,
}

impl Default for SpeedAdvantageConfig {
    fn default() -> Self {
        Self {
            straight_percentile: 85.,
            braking_percentile: 30.,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HazardThresholds {
    /// Standard deviations below the mean speed that make a full-throttle sample anomalous
    pub anomaly_sigma: f64,
    pub anomaly_min_throttle: f64,
    pub risk_min_speed_kph: f64,
    pub strategy_min_avg_speed_kph: f64,
    pub strategy_max_speed_std: f64,
}

impl Default for HazardThresholds {
    fn default() -> Self {
        Self {
            anomaly_sigma: 2.,
            anomaly_min_throttle: 85.,
            risk_min_speed_kph: 230.,
            strategy_min_avg_speed_kph: 250.,
            strategy_max_speed_std: 20.,
        }
    }
}

/// Every tunable parameter of a lap comparison.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub corners: CornerConfig,
    pub speed_classes: SpeedClassBands,
    pub style: StyleThresholds,
    pub speed_advantage: SpeedAdvantageConfig,
    pub hazards: HazardThresholds,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.corners.min_spacing_m >= 0.) {
            return Err(LapVisError::invalid_config(
                "corners.min_spacing_m",
                "must be zero or positive",
            ));
        }
        if !(self.corners.window_half_width_m > 0.) {
            return Err(LapVisError::invalid_config(
                "corners.window_half_width_m",
                "must be positive",
            ));
        }
        if self.corners.max_corners == 0 {
            return Err(LapVisError::invalid_config(
                "corners.max_corners",
                "must be at least 1",
            ));
        }
        if !(self.speed_classes.slow_max_kph <= self.speed_classes.fast_min_kph) {
            return Err(LapVisError::invalid_config(
                "speed_classes",
                "slow_max_kph must not exceed fast_min_kph",
            ));
        }
        if self.style.corner_priority_window == 0 {
            return Err(LapVisError::invalid_config(
                "style.corner_priority_window",
                "must be at least 1",
            ));
        }
        for (field, value) in [
            (
                "speed_advantage.straight_percentile",
                self.speed_advantage.straight_percentile,
            ),
            (
                "speed_advantage.braking_percentile",
                self.speed_advantage.braking_percentile,
            ),
        ] {
            if !(0. ..=100.).contains(&value) {
                return Err(LapVisError::invalid_config(field, "must be within 0..=100"));
            }
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file =
            std::fs::File::open(path).map_err(|e| LapVisError::ConfigIOError { source: e })?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| LapVisError::ConfigSerializeError { source: e })?;
        config.validate()?;
        debug!("Loaded analysis config from {:?}", path);
        Ok(config)
    }

    /// Reads the config saved in the user's config directory, if there is one.
    pub fn from_local_file() -> Option<Result<Self>> {
        let config_path = Self::local_path()?;
        if config_path.exists() {
            Some(Self::from_file(&config_path))
        } else {
            None
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::local_path().ok_or(LapVisError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| LapVisError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| LapVisError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| LapVisError::ConfigSerializeError { source: e })
    }

    fn local_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.corners.min_spacing_m, 80.);
        assert_eq!(config.corners.window_half_width_m, 40.);
        assert_eq!(config.corners.max_corners, 12);
        assert_eq!(config.speed_classes.slow_max_kph, 120.);
        assert_eq!(config.speed_classes.fast_min_kph, 220.);
        assert_eq!(config.style.throttle_gradient_threshold, 8.);
        assert_eq!(config.style.speed_gradient_std_threshold, 12.);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"corners":{"max_corners":15}}"#).unwrap();
        assert_eq!(config.corners.max_corners, 15);
        assert_eq!(config.corners.min_spacing_m, 80.);
        assert_eq!(config.hazards, HazardThresholds::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalysisConfig::default();
        config.corners.window_half_width_m = 0.;
        match config.validate() {
            Err(LapVisError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "corners.window_half_width_m")
            }
            _ => panic!("Expected InvalidConfig error"),
        }

        let mut config = AnalysisConfig::default();
        config.speed_classes.slow_max_kph = 250.;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.speed_advantage.braking_percentile = 101.;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.corners.max_corners = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = AnalysisConfig::default();
        config.corners.min_spacing_m = 50.;
        config.save_to(&path).unwrap();

        let reloaded = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            AnalysisConfig::from_file(&missing),
            Err(LapVisError::ConfigIOError { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            AnalysisConfig::from_file(&garbage),
            Err(LapVisError::ConfigSerializeError { .. })
        ));
    }
}

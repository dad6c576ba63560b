// Library interface for lapvis
// Lap comparison analytics usable without the CLI

pub mod analysis;
pub mod config;
pub mod errors;
pub mod telemetry;

// Re-export commonly used types
pub use analysis::attribution::{AttributionSummary, CornerAttribution, SectorSplit};
pub use analysis::corners::{Corner, CornerList, segment_corners};
pub use analysis::delta::{DeltaCurve, compute_delta, speed_integrated_delta};
pub use analysis::insights::{DriverNames, Insight, InsightCategory};
pub use analysis::resample::resample;
pub use analysis::style::StyleProfile;
pub use analysis::{ComparisonReport, Driver, LapComparison, LapOverview};
pub use config::AnalysisConfig;
pub use errors::LapVisError;
pub use telemetry::{LapTrace, TelemetrySample, loader::load_lap_jsonl};

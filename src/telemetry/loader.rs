use std::path::Path;

use log::info;

use super::{LapTrace, TelemetrySample};
use crate::errors::{LapVisError, Result};

/// Loads a lap from a JSON lines file holding one [`TelemetrySample`] per line.
pub fn load_lap_jsonl(source_file: &Path) -> Result<LapTrace> {
    if !source_file.is_file() {
        return Err(LapVisError::InvalidTelemetryFile {
            path: format!("{:?}", source_file),
        });
    }

    let samples = serde_jsonlines::json_lines(source_file)
        .map_err(|e| LapVisError::TelemetryLoaderError { source: e })?
        .collect::<Result<Vec<TelemetrySample>, std::io::Error>>()
        .map_err(|e| LapVisError::TelemetryLoaderError { source: e })?;

    let lap = LapTrace::new(samples)?;
    info!(
        "Loaded {:?}, found {} samples covering {:.0} meters",
        source_file,
        lap.len(),
        lap.total_distance()
    );
    Ok(lap)
}

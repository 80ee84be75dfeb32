use super::BatchError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One row of a quality-gate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    pub index: usize,
    pub predicted_initial: f64,
    pub predicted_final: f64,
    pub energy_change: f64,
    pub accepted: bool,
    /// Energy attached to the structure the gate passed on.
    pub final_energy: Option<f64>,
}

/// Writes `records` as CSV with a header row.
pub fn write_gate_report(writer: impl Write, records: &[GateRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_gate_report_to_path(path: &Path, records: &[GateRecord]) -> Result<(), BatchError> {
    let label = || path.to_string_lossy().to_string();
    let file = std::fs::File::create(path).map_err(|source| BatchError::Io {
        path: label(),
        source,
    })?;
    write_gate_report(file, records).map_err(|source| BatchError::Csv {
        path: label(),
        source,
    })
}

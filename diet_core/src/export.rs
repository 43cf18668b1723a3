//! CSV export of weight history.

use crate::{Result, WeightSample};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    actual: f64,
    estimated: f64,
}

impl From<&WeightSample> for CsvRow {
    fn from(sample: &WeightSample) -> Self {
        CsvRow {
            date: sample.date.format("%Y-%m-%d").to_string(),
            actual: sample.actual,
            estimated: sample.estimated,
        }
    }
}

/// Write `date,actual,estimated` rows to `path`, replacing any existing file.
///
/// Returns the number of rows written.
pub fn export_history_csv(path: &Path, history: &[WeightSample]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    // Written explicitly so an empty history still gets a header line
    writer.write_record(["date", "actual", "estimated"])?;
    for sample in history {
        writer.serialize(CsvRow::from(sample))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} weight samples to {:?}", history.len(), path);
    Ok(history.len())
}

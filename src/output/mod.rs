//! CSV output sink
//!
//! Records go out as one CSV row each, columns in the order declared on
//! [`StudentRecord`]: name, college, class_year, major, bio, source_url,
//! scraped_at.

use crate::record::StudentRecord;
use crate::Result;
use std::path::Path;

/// Writes all records to a CSV file at the given path.
///
/// The header row comes from the record's field names. With zero records
/// nothing is written at all, not even a header, and a warning is logged.
pub fn write_csv(records: &[StudentRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        tracing::warn!("No records to write");
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(
        count = records.len(),
        path = %path.display(),
        "Wrote records"
    );
    Ok(())
}

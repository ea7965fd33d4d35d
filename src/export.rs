use std::io::Write;

use tracing::info;

use crate::error::Result;
use crate::models::{PersonnelRecord, RECORD_HEADERS};

/// Writes `rows` as always-quoted CSV under the fixed header row.
pub fn write_csv<W: Write>(rows: &[&PersonnelRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(RECORD_HEADERS)?;
    for record in rows {
        csv_writer.write_record(record.field_values().iter().map(|value| value.as_bytes()))?;
    }
    csv_writer.flush()?;

    info!(rows = rows.len(), "exported filtered rows");
    Ok(())
}

pub fn to_csv_string(rows: &[&PersonnelRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

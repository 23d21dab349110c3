//! JSON export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::error_handling::ExportError;
use crate::models::LookupResult;

/// Writes the unflattened results as a JSON array indented by four spaces.
pub fn export_json(results: &[LookupResult], path: &Path) -> Result<usize, ExportError> {
    if results.is_empty() {
        return Err(ExportError::EmptyResults);
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer =
        Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    results.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(results.len())
}

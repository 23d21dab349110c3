//! CSV export.
//!
//! One row per IP with nested fields flattened into `parent_child` columns.

use std::path::Path;

use csv::Writer;

use super::flatten::{cell_text, flatten_results, headers};
use crate::error_handling::ExportError;
use crate::models::LookupResult;

/// Writes `results` as CSV to `path`.
///
/// The header is the sorted union of all flattened keys; missing and `null`
/// cells are left empty. Returns the number of rows written.
pub fn export_csv(results: &[LookupResult], path: &Path) -> Result<usize, ExportError> {
    if results.is_empty() {
        return Err(ExportError::EmptyResults);
    }
    let rows = flatten_results(results)?;
    let headers = headers(&rows);

    let mut writer = Writer::from_path(path)?;
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(
            headers
                .iter()
                .map(|header| cell_text(row, header).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    Ok(rows.len())
}

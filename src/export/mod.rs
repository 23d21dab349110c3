//! Report export.
//!
//! Writes scan results to a file whose format follows its extension:
//! - `.json`: the nested results, pretty-printed
//! - `.csv`: one flattened row per IP
//! - `.html`: a styled static table

mod csv;
mod flatten;
mod html;
mod json;
mod types;

use std::path::Path;

use log::info;

use crate::error_handling::ExportError;
use crate::models::LookupResult;

pub use self::csv::export_csv;
pub use flatten::{flatten_result, flatten_results, headers, FlatRow};
pub use html::{export_html, render_html};
pub use json::export_json;
pub use types::ExportFormat;

/// Exports `results` to `path`, choosing the format from the extension.
///
/// Nothing is written when the extension is unsupported or `results` is
/// empty.
///
/// # Errors
///
/// - `ExportError::UnsupportedFormat` for an extension other than
///   `.json`, `.csv` or `.html`
/// - `ExportError::EmptyResults` when there is nothing to export
/// - I/O and serialization failures
pub fn export_report(results: &[LookupResult], path: &Path) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path)?;
    let written = match format {
        ExportFormat::Json => export_json(results, path)?,
        ExportFormat::Csv => export_csv(results, path)?,
        ExportFormat::Html => export_html(results, path)?,
    };
    info!(
        "Exported {} result{} as {} to {}",
        written,
        if written == 1 { "" } else { "s" },
        format,
        path.display()
    );
    Ok(format)
}

//! HTML export.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::flatten::{cell_text, flatten_results, headers};
use crate::error_handling::ExportError;
use crate::models::LookupResult;

const REPORT_TITLE: &str = "IP Analysis Report";
const MISSING_CELL: &str = "N/A";

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; } \
table { border-collapse: collapse; width: 100%; } \
th, td { border: 1px solid #ddd; text-align: left; padding: 8px; } \
tr:nth-child(even) { background-color: #f2f2f2; } \
th { background-color: #4CAF50; color: white; }";

/// Writes a static page with one table row per result.
pub fn export_html(results: &[LookupResult], path: &Path) -> Result<usize, ExportError> {
    if results.is_empty() {
        return Err(ExportError::EmptyResults);
    }
    fs::write(path, render_html(results)?)?;
    Ok(results.len())
}

/// Builds the report page.
pub fn render_html(results: &[LookupResult]) -> Result<String, ExportError> {
    let rows = flatten_results(results)?;
    let headers = headers(&rows);

    let mut html = String::new();
    // Writing to a String cannot fail
    let _ = write!(
        html,
        "<html><head><meta charset=\"utf-8\"><title>{title}</title><style>{style}</style></head>\
         <body><h1>{title}</h1><table><tr>",
        title = REPORT_TITLE,
        style = STYLE
    );
    for header in &headers {
        let _ = write!(html, "<th>{}</th>", escape(&title_case(header)));
    }
    html.push_str("</tr>\n");

    for row in &rows {
        html.push_str("<tr>");
        for header in &headers {
            let text = cell_text(row, header).unwrap_or_else(|| MISSING_CELL.to_string());
            let _ = write!(html, "<td>{}</td>", escape(&text));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table></body></html>\n");

    Ok(html)
}

/// `threat_intel_total_reports` -> `Threat Intel Total Reports`.
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

//! Terminal results table.

use std::cmp::Ordering;

use clap::ValueEnum;
use colored::Colorize;

use crate::models::{LookupResult, ThreatOutcome};

const NOT_AVAILABLE: &str = "N/A";
const DISABLED: &str = "Disabled";
const PRIVATE_LABEL: &str = "Private IP";
const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Columns of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Column {
    Ip,
    Country,
    City,
    MapLink,
    Org,
    ThreatScore,
    Reports,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Ip,
        Column::Country,
        Column::City,
        Column::MapLink,
        Column::Org,
        Column::ThreatScore,
        Column::Reports,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Column::Ip => "IP Address",
            Column::Country => "Country",
            Column::City => "City",
            Column::MapLink => "Map",
            Column::Org => "Organization",
            Column::ThreatScore => "Threat Score",
            Column::Reports => "Reports",
        }
    }
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub ip: String,
    pub country: String,
    pub city: String,
    /// Empty when the location is unknown
    pub map_link: String,
    pub org: String,
    pub threat_score: String,
    pub reports: String,
    pub private: bool,
}

impl TableRow {
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Ip => &self.ip,
            Column::Country => &self.country,
            Column::City => &self.city,
            Column::MapLink => &self.map_link,
            Column::Org => &self.org,
            Column::ThreatScore => &self.threat_score,
            Column::Reports => &self.reports,
        }
    }
}

impl From<&LookupResult> for TableRow {
    fn from(result: &LookupResult) -> Self {
        match result {
            LookupResult::Failed { ip, .. } => TableRow {
                ip: ip.clone(),
                country: PRIVATE_LABEL.to_string(),
                city: NOT_AVAILABLE.to_string(),
                map_link: String::new(),
                org: NOT_AVAILABLE.to_string(),
                threat_score: NOT_AVAILABLE.to_string(),
                reports: NOT_AVAILABLE.to_string(),
                private: true,
            },
            LookupResult::Resolved {
                ip,
                geolocation,
                threat_intel,
            } => {
                let geo = geolocation.record();
                let text = |value: Option<&String>| {
                    value.cloned().unwrap_or_else(|| NOT_AVAILABLE.to_string())
                };
                let map_link = geo
                    .and_then(|g| g.loc.as_deref())
                    .filter(|loc| !loc.is_empty())
                    .map(|loc| format!("{}{}", MAP_SEARCH_URL, loc))
                    .unwrap_or_default();

                let (threat_score, reports) = match threat_intel {
                    ThreatOutcome::Disabled {} => (DISABLED.to_string(), DISABLED.to_string()),
                    ThreatOutcome::Found(record) => (
                        number(record.abuse_confidence_score),
                        number(record.total_reports),
                    ),
                    ThreatOutcome::Failed { .. } => {
                        (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string())
                    }
                };

                TableRow {
                    ip: ip.clone(),
                    country: text(geo.and_then(|g| g.country.as_ref())),
                    city: text(geo.and_then(|g| g.city.as_ref())),
                    map_link,
                    org: text(geo.and_then(|g| g.org.as_ref())),
                    threat_score,
                    reports,
                    private: false,
                }
            }
        }
    }
}

fn number<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Projects results into table rows, in order.
pub fn build_rows(results: &[LookupResult]) -> Vec<TableRow> {
    results.iter().map(TableRow::from).collect()
}

/// Sorts rows by `column`.
///
/// Numeric when every cell of the column parses as an integer, otherwise
/// lexicographic. The sort is stable in both directions.
pub fn sort_rows(rows: &mut [TableRow], column: Column, reverse: bool) {
    let as_int = |row: &TableRow| row.cell(column).trim().parse::<i64>().ok();
    let numeric = rows.iter().all(|row| as_int(row).is_some());

    let order = |ordering: Ordering| if reverse { ordering.reverse() } else { ordering };
    if numeric {
        rows.sort_by(|a, b| order(as_int(a).cmp(&as_int(b))));
    } else {
        rows.sort_by(|a, b| order(a.cell(column).cmp(b.cell(column))));
    }
}

/// Renders rows as an aligned text table.
pub fn render_table(rows: &[TableRow]) -> String {
    let widths: Vec<usize> = Column::ALL
        .iter()
        .map(|&column| {
            rows.iter()
                .map(|row| row.cell(column).chars().count())
                .chain(std::iter::once(column.heading().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(
        line(
            Column::ALL
                .iter()
                .zip(&widths)
                .map(|(column, &width)| format!("{:<width$}", column.heading()))
                .collect(),
        )
        .bold()
        .to_string(),
    );
    out.push(
        widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("  "),
    );

    for row in rows {
        let text = line(
            Column::ALL
                .iter()
                .zip(&widths)
                .map(|(&column, &width)| format!("{:<width$}", row.cell(column)))
                .collect(),
        );
        out.push(if row.private {
            text.dimmed().to_string()
        } else {
            text
        });
    }

    out.join("\n")
}

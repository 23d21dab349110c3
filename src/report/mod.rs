//! Human-readable presentation of scan results.

mod table;

pub use table::{build_rows, render_table, sort_rows, Column, TableRow};

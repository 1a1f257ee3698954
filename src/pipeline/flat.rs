//! Flat row extraction: every detected row as plain text.
//!
//! Headers are not interpreted and nothing is typed. Rows are sanitized but
//! not padded per table; [`crate::output::FlatOutput::to_csv`] pads once,
//! globally, when rendering.

use crate::output::FlatOutput;
use crate::table::Page;

/// Flatten all rows of all tables of all pages, in discovery order.
pub fn flatten(pages: &[Page]) -> FlatOutput {
    let data = pages
        .iter()
        .flat_map(|page| page.tables.iter())
        .flat_map(|table| table.rows().iter())
        .map(|row| row.to_strings())
        .collect();
    FlatOutput::new(data)
}

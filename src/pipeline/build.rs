//! Table builder: turn one sanitized raw table into a labelled record set.

use crate::error::ExtractError;
use crate::pipeline::classify::classify_header;
use crate::record::RecordSet;
use crate::table::RawTable;
use tracing::debug;

/// Build a record set from a detected table.
///
/// The first row is the header; the remaining rows become records, each
/// padded to the table's width. A header-only table yields the classified
/// columns with zero rows.
///
/// # Errors
/// [`ExtractError::EmptyTable`] when `table` has no rows at all.
pub fn build_record_set(table: &RawTable) -> Result<RecordSet, ExtractError> {
    let mut rows = table.sanitized().into_iter();
    let header = rows.next().ok_or(ExtractError::EmptyTable)?;
    let names = classify_header(&header);

    let body: Vec<Vec<Option<String>>> = rows
        .map(|r| r.into_iter().map(Some).collect())
        .collect();

    debug!(
        columns = names.len(),
        rows = body.len(),
        "Built record set: {:?}",
        names
    );

    if body.is_empty() {
        return Ok(RecordSet::with_columns(names));
    }
    Ok(RecordSet::from_rows(names, body))
}

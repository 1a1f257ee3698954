//! Consolidation: fold per-table record sets into one.
//!
//! The output schema is the union of every input column, in the order each
//! name was first seen. Rows keep table order; a table that lacks a column
//! contributes absent values for it.

use crate::record::{Column, RecordSet};

/// Merge record sets in discovery order.
///
/// No input yields [`RecordSet::empty`].
pub fn consolidate<'a, I>(record_sets: I) -> RecordSet
where
    I: IntoIterator<Item = &'a RecordSet>,
{
    record_sets
        .into_iter()
        .fold(RecordSet::empty(), |acc, next| union(&acc, next))
}

/// Stack `below` under `above`, widening both to the union schema.
pub fn union(above: &RecordSet, below: &RecordSet) -> RecordSet {
    let mut names: Vec<&str> = above.column_names().collect();
    for name in below.column_names() {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let row_count = above.row_count() + below.row_count();
    let columns = names
        .into_iter()
        .map(|name| {
            let mut values = Vec::with_capacity(row_count);
            extend_column(&mut values, above, name);
            extend_column(&mut values, below, name);
            Column {
                name: name.to_string(),
                values,
            }
        })
        .collect();

    RecordSet::from_columns(columns, row_count)
}

fn extend_column(values: &mut Vec<Option<String>>, rs: &RecordSet, name: &str) {
    match rs.column(name) {
        Some(col) => values.extend(col.values.iter().cloned()),
        None => values.extend(std::iter::repeat_n(None, rs.row_count())),
    }
}

//! Header classification: map a table's first row onto semantic column roles.
//!
//! Statements from different banks label the same column in wildly different
//! ways ("Posting Date", "Trans. Date", "Transaction Details", "Withdrawals
//! (Debit)"). A handful of substring rules, checked in a fixed priority order,
//! recognise the common ones; anything else keeps its literal header text.
//!
//! The rules are deliberately simple and first-match-wins. A header such as
//! "Date / Description" is a `Date` column, never both.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Name given to a header cell with no text.
pub const UNNAMED_COLUMN: &str = "Col";

/// The six recognised financial-statement column roles.
///
/// Declaration order is the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnRole {
    Date,
    Description,
    Amount,
    Debit,
    Credit,
    Balance,
}

impl ColumnRole {
    /// All roles in canonical output order.
    pub const ALL: [ColumnRole; 6] = [
        ColumnRole::Date,
        ColumnRole::Description,
        ColumnRole::Amount,
        ColumnRole::Debit,
        ColumnRole::Credit,
        ColumnRole::Balance,
    ];

    /// Canonical column name for the role.
    pub fn name(self) -> &'static str {
        match self {
            ColumnRole::Date => "Date",
            ColumnRole::Description => "Description",
            ColumnRole::Amount => "Amount",
            ColumnRole::Debit => "Debit",
            ColumnRole::Credit => "Credit",
            ColumnRole::Balance => "Balance",
        }
    }

    /// Classify a header cell. First matching rule wins.
    pub fn from_header(text: &str) -> Option<ColumnRole> {
        let t = text.to_lowercase();
        if t.contains("date") {
            Some(ColumnRole::Date)
        } else if ["descr", "memo", "detail", "name"]
            .iter()
            .any(|k| t.contains(k))
        {
            Some(ColumnRole::Description)
        } else if t.contains("amount") && !t.contains("balance") {
            Some(ColumnRole::Amount)
        } else if t.contains("debit") {
            Some(ColumnRole::Debit)
        } else if t.contains("credit") {
            Some(ColumnRole::Credit)
        } else if t.contains("balance") {
            Some(ColumnRole::Balance)
        } else {
            None
        }
    }

    /// Whether a consolidated column name can supply this role.
    ///
    /// These predicates are looser about position than [`Self::from_header`]
    /// (`Date` must be a prefix, `Description` accepts an exact `name`) because
    /// they run over already-classified names such as `Date_2`.
    pub fn matches_column(self, column_name: &str) -> bool {
        let n = column_name.to_lowercase();
        match self {
            ColumnRole::Date => n.starts_with("date"),
            ColumnRole::Description => {
                n.starts_with("descr") || n.contains("memo") || n.contains("detail") || n == "name"
            }
            ColumnRole::Amount => n == "amount" || (n.contains("amount") && !n.contains("balance")),
            ColumnRole::Debit => n.contains("debit"),
            ColumnRole::Credit => n.contains("credit"),
            ColumnRole::Balance => n.contains("balance"),
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify every header cell, then make the resulting names unique.
///
/// A cell that matches no role keeps its text; an empty cell becomes
/// [`UNNAMED_COLUMN`]. Whitespace-only text counts as empty here.
///
/// The first occurrence of a name is kept as-is; later ones get `_2`, `_3`, …
pub fn classify_header(cells: &[String]) -> Vec<String> {
    let named: Vec<String> = cells
        .iter()
        .map(|cell| match ColumnRole::from_header(cell) {
            Some(role) => role.name().to_string(),
            None if cell.trim().is_empty() => UNNAMED_COLUMN.to_string(),
            None => cell.clone(),
        })
        .collect();
    dedupe_names(named)
}

fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let unique = if taken.contains(&name) {
            // A literal header may already be called `Date_2`; keep counting.
            (2..)
                .map(|n| format!("{name}_{n}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default()
        } else {
            name
        };
        taken.insert(unique.clone());
        out.push(unique);
    }
    out
}

//! Maps the user's choice of entity to the rows the aggregations run over.

use std::collections::BTreeSet;

use crate::table::{Slice, Table};

/// Which part of the table a view looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    /// Exact match on the startup name.
    ByStartup(String),
    /// Substring match against the raw, comma-joined investor field.
    ///
    /// `"Accel"` therefore also matches `"Accel Partners"`, and one record
    /// can match several investors. The enumerated investor names come from
    /// the split field, so each of them matches at least one record.
    ByInvestorSubstring(String),
}

/// Rows of `table` picked by `selection`, in file order. May be empty.
pub fn resolve<'a>(table: &'a Table, selection: &Selection) -> Slice<'a> {
    match selection {
        Selection::All => table.all(),
        Selection::ByStartup(name) => table.select(|r| r.startup == *name),
        Selection::ByInvestorSubstring(name) => {
            table.select(|r| r.investors_raw.contains(name.as_str()))
        }
    }
}

/// Sorted distinct startup names.
pub fn startup_names(table: &Table) -> Vec<String> {
    table
        .records()
        .iter()
        .map(|r| r.startup.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct individual investor names.
pub fn investor_names(table: &Table) -> Vec<String> {
    table
        .records()
        .iter()
        .flat_map(|r| r.investors.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// anomabot-core/src/domain/checks/row_count.rs

use crate::domain::table::{QueryResultTable, Value};

pub const BREAKDOWN_TABLE_COLUMN: &str = "dataset/table";
pub const BREAKDOWN_ROWS_COLUMN: &str = "no_of_rows";

/// Running totals of a multi-table `no_of_rows` test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowCountTally {
    pub total: i64,
    pub breakdown: Vec<(String, i64)>,
    pub zero_row_found: bool,
}

impl RowCountTally {
    /// Accumulator step: one sub-table's count.
    pub fn add(mut self, table: impl Into<String>, rows: i64) -> Self {
        self.total += rows;
        self.zero_row_found |= rows == 0;
        self.breakdown.push((table.into(), rows));
        self
    }

    pub fn fold<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        counts
            .into_iter()
            .fold(Self::default(), |tally, (table, rows)| tally.add(table, rows))
    }

    pub fn to_table(&self) -> QueryResultTable {
        QueryResultTable::from_rows(
            [BREAKDOWN_TABLE_COLUMN, BREAKDOWN_ROWS_COLUMN],
            self.breakdown
                .iter()
                .map(|(table, rows)| vec![Value::from(table.as_str()), Value::Integer(*rows)])
                .collect(),
        )
    }
}

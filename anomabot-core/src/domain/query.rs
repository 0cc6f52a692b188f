// anomabot-core/src/domain/query.rs
//
// SQL rendering for each test type. Pure: no I/O, same input -> same string.
// The dialect is the intersection of BigQuery and DuckDB.

use crate::domain::definition::{EntriesQuery, PivotKey, TableRef, TestType};
use crate::domain::error::DomainError;

pub const LAST_ENTRY_DATE: &str = "last_entry_date";
pub const NO_OF_ROWS: &str = "no_of_rows";
pub const PIVOT_COLUMN: &str = "column_to_pivot_on";
pub const ENTRIES_COLUMN: &str = "current_day_rows";
/// Alias of the date column in the daily entries result. A qualified
/// `date_column_name` (`stats.day`) would otherwise come back as `day`.
pub const ENTRY_DATE_COLUMN: &str = "entry_date";

/// A query shape that is known to be complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpec {
    LastEntryDate(TableRef),
    RowsToday(TableRef),
    DailyEntries(EntriesQuery),
}

impl QuerySpec {
    /// Resolves the flat configuration fields into a query shape.
    /// Anything that cannot produce a well-formed query is rejected here.
    pub fn from_parts(
        test_id: &str,
        test_type: &str,
        main_table_name: &str,
        date_column_name: &str,
        dataset_column_name: Option<&str>,
        dataset_table_column_name: Option<&str>,
        entries_column_name: Option<&str>,
    ) -> Result<Self, DomainError> {
        let table = TableRef::new(main_table_name, date_column_name);

        match test_type.parse::<TestType>()? {
            TestType::DataArrivedOrNot => Ok(QuerySpec::LastEntryDate(table)),
            TestType::NoOfRows => Ok(QuerySpec::RowsToday(table)),
            TestType::Anomaly => {
                let missing = |field| DomainError::MissingField {
                    test_id: test_id.to_string(),
                    field,
                };
                let table_column = non_blank(dataset_table_column_name)
                    .ok_or_else(|| missing("dataset_table_column_name"))?;
                let entries_column = non_blank(entries_column_name)
                    .ok_or_else(|| missing("entries_column_name"))?;

                let pivot = match non_blank(dataset_column_name) {
                    Some(dataset_column) => PivotKey::Composite {
                        dataset_column: dataset_column.to_string(),
                        table_column: table_column.to_string(),
                    },
                    None => PivotKey::Column(table_column.to_string()),
                };

                Ok(QuerySpec::DailyEntries(EntriesQuery {
                    table,
                    pivot,
                    entries_column_name: entries_column.to_string(),
                }))
            }
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            QuerySpec::LastEntryDate(table) => last_entry_date(table),
            QuerySpec::RowsToday(table) => rows_today(table),
            QuerySpec::DailyEntries(entries) => daily_entries(entries),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn last_entry_date(table: &TableRef) -> String {
    format!(
        "SELECT max({}) AS {} FROM {}",
        table.date_column_name, LAST_ENTRY_DATE, table.main_table_name
    )
}

pub fn rows_today(table: &TableRef) -> String {
    format!(
        "SELECT count(1) AS {} FROM {} WHERE {} = current_date",
        NO_OF_ROWS, table.main_table_name, table.date_column_name
    )
}

pub fn daily_entries(entries: &EntriesQuery) -> String {
    let pivot = match &entries.pivot {
        PivotKey::Column(column) => column.clone(),
        PivotKey::Composite {
            dataset_column,
            table_column,
        } => format!("concat({}, '|', {})", dataset_column, table_column),
    };

    format!(
        "SELECT {} AS {}, {} AS {}, {} AS {} FROM {}",
        entries.table.date_column_name,
        ENTRY_DATE_COLUMN,
        pivot,
        PIVOT_COLUMN,
        entries.entries_column_name,
        ENTRIES_COLUMN,
        entries.table.main_table_name
    )
}

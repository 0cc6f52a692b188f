// anomabot-core/src/domain/definition/mod.rs

pub mod row;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

pub use row::TestRow;

/// The three behaviours a configured test can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Anomaly,
    DataArrivedOrNot,
    NoOfRows,
}

impl FromStr for TestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "anomaly" => Ok(TestType::Anomaly),
            "data_arrived_or_not" => Ok(TestType::DataArrivedOrNot),
            "no_of_rows" => Ok(TestType::NoOfRows),
            other => Err(DomainError::UnknownTestType(other.to_string())),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestType::Anomaly => "anomaly",
            TestType::DataArrivedOrNot => "data_arrived_or_not",
            TestType::NoOfRows => "no_of_rows",
        };
        write!(f, "{}", s)
    }
}

/// A warehouse table and the column holding each row's date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub main_table_name: String,
    pub date_column_name: String,
}

impl TableRef {
    pub fn new(main_table_name: impl Into<String>, date_column_name: impl Into<String>) -> Self {
        Self {
            main_table_name: main_table_name.into(),
            date_column_name: date_column_name.into(),
        }
    }

    /// Last `.`-separated segment of the table path (`project.dataset.table` -> `table`).
    pub fn short_name(&self) -> &str {
        self.main_table_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.main_table_name)
    }
}

/// How one series is identified in the daily entries table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotKey {
    /// The table column alone.
    Column(String),
    /// `dataset|table`, concatenated in SQL.
    Composite {
        dataset_column: String,
        table_column: String,
    },
}

/// Source of the per-day entry counts an anomaly test looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesQuery {
    pub table: TableRef,
    pub pivot: PivotKey,
    pub entries_column_name: String,
}

/// What a test checks, with exactly the fields that check needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Check {
    Anomaly { entries: EntriesQuery, threshold: f64 },
    DataArrived { table: TableRef },
    RowCount { tables: Vec<TableRef> },
}

impl Check {
    pub fn test_type(&self) -> TestType {
        match self {
            Check::Anomaly { .. } => TestType::Anomaly,
            Check::DataArrived { .. } => TestType::DataArrivedOrNot,
            Check::RowCount { .. } => TestType::NoOfRows,
        }
    }
}

/// One configured test, read fresh from the catalog on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub test_id: String,
    pub test_name: String,
    pub project_name: String,
    pub notify_target: String,
    pub check: Check,
}

impl TestDefinition {
    pub fn test_type(&self) -> TestType {
        self.check.test_type()
    }
}

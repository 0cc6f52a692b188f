// anomabot-core/src/domain/definition/row.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

use super::{Check, TableRef, TestDefinition};
use crate::domain::error::DomainError;
use crate::domain::query::QuerySpec;

fn re_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_$`.\-]+$").unwrap_or_else(|_| {
            // Pattern is a literal; a failure here is a programming error.
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if re_identifier().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("identifier")
            .with_message(format!("'{}' is not a plain table/column identifier", value).into()))
    }
}

/// One row of the test configuration store, as the user wrote it.
///
/// Several rows may share a `test_id` (multi-table `no_of_rows` tests); the
/// first row carries the test-level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TestRow {
    #[validate(length(min = 1, message = "test_id cannot be empty"))]
    pub test_id: String,

    #[serde(default)]
    pub test_name: String,

    pub test_type: String,

    #[validate(custom(function = "validate_identifier"))]
    pub main_table_name: String,

    #[validate(custom(function = "validate_identifier"))]
    pub date_column_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_column_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_table_column_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries_column_name: Option<String>,

    #[validate(range(min = 0.0, max = 50.0, message = "threshold must be a percentile in [0, 50]"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    #[serde(default)]
    pub project_name: String,

    #[serde(alias = "slack_member_id", default)]
    pub notify_target: String,
}

impl TestRow {
    fn check_fields(&self) -> Result<(), DomainError> {
        self.validate().map_err(|e| DomainError::InvalidDefinition {
            test_id: self.test_id.clone(),
            reason: e.to_string(),
        })?;

        let optional_columns = [
            &self.dataset_column_name,
            &self.dataset_table_column_name,
            &self.entries_column_name,
        ];
        for column in optional_columns.into_iter().flatten() {
            if !column.trim().is_empty() {
                validate_identifier(column.trim()).map_err(|e| {
                    DomainError::InvalidDefinition {
                        test_id: self.test_id.clone(),
                        reason: e.to_string(),
                    }
                })?;
            }
        }
        Ok(())
    }

    fn query_spec(&self) -> Result<QuerySpec, DomainError> {
        QuerySpec::from_parts(
            &self.test_id,
            &self.test_type,
            &self.main_table_name,
            &self.date_column_name,
            self.dataset_column_name.as_deref(),
            self.dataset_table_column_name.as_deref(),
            self.entries_column_name.as_deref(),
        )
    }
}

impl TestDefinition {
    /// Converts every configuration row of one `test_id` into a definition.
    ///
    /// The test type of the first row decides the check. Only `no_of_rows` reads
    /// rows past the first one.
    pub fn from_rows(rows: &[TestRow]) -> Result<Self, DomainError> {
        let head = rows.first().ok_or_else(|| DomainError::InvalidDefinition {
            test_id: String::new(),
            reason: "no configuration rows".to_string(),
        })?;

        // Type first: an unknown type must win over field validation.
        head.test_type.parse::<super::TestType>()?;
        head.check_fields()?;

        let check = match head.query_spec()? {
            QuerySpec::DailyEntries(entries) => {
                let threshold = head.threshold.ok_or_else(|| DomainError::MissingField {
                    test_id: head.test_id.clone(),
                    field: "threshold",
                })?;
                Check::Anomaly { entries, threshold }
            }
            QuerySpec::LastEntryDate(table) => Check::DataArrived { table },
            QuerySpec::RowsToday(_) => {
                let mut tables = Vec::with_capacity(rows.len());
                for row in rows {
                    row.check_fields()?;
                    tables.push(TableRef::new(
                        row.main_table_name.trim(),
                        row.date_column_name.trim(),
                    ));
                }
                Check::RowCount { tables }
            }
        };

        let test_name = if head.test_name.trim().is_empty() {
            head.test_id.clone()
        } else {
            head.test_name.trim().to_string()
        };

        Ok(TestDefinition {
            test_id: head.test_id.clone(),
            test_name,
            project_name: head.project_name.trim().to_string(),
            notify_target: head.notify_target.trim().to_string(),
            check,
        })
    }
}

// anomabot-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unknown test_type '{0}'")]
    #[diagnostic(
        code(anomabot::domain::test_type),
        help("Supported values: anomaly, data_arrived_or_not, no_of_rows.")
    )]
    UnknownTestType(String),

    #[error("Test '{test_id}' is missing required field '{field}'")]
    #[diagnostic(
        code(anomabot::domain::missing_field),
        help("Anomaly tests need date_column_name, dataset_table_column_name, entries_column_name and threshold.")
    )]
    MissingField { test_id: String, field: &'static str },

    #[error("Invalid test definition '{test_id}': {reason}")]
    #[diagnostic(code(anomabot::domain::invalid_definition))]
    InvalidDefinition { test_id: String, reason: String },

    #[error("Query result is missing a usable '{column}' value")]
    #[diagnostic(
        code(anomabot::domain::unexpected_result),
        help("The warehouse returned no rows, or the column was null.")
    )]
    UnexpectedResult { column: String },

    #[error("Test catalog unavailable: {0}")]
    #[diagnostic(
        code(anomabot::domain::catalog),
        help("Check `catalog-path` in the project configuration.")
    )]
    CatalogUnavailable(String),
}

impl DomainError {
    /// True for errors caused by the test configuration rather than by the data.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            DomainError::UnexpectedResult { .. } | DomainError::CatalogUnavailable(_)
        )
    }
}

// anomabot-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(anomabot::infra::database::duckdb),
        help("An error occurred inside the SQL engine. Check the table and column names of the test.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("No database configured for project '{0}'")]
    #[diagnostic(
        code(anomabot::infra::database::project),
        help("Add the project under `warehouse.projects` or set `warehouse.default`.")
    )]
    UnknownProject(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(anomabot::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(anomabot::infra::yaml),
        help("Check your YAML syntax (indentation, types). Test ids must be quoted strings.")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(anomabot::infra::config_missing))]
    ConfigNotFound(String),

    // --- NOTIFICATIONS ---
    #[error("HTTP Error: {0}")]
    #[diagnostic(
        code(anomabot::infra::http),
        help("Check the webhook URL and network access.")
    )]
    Http(#[from] reqwest::Error),
}

// `?` on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

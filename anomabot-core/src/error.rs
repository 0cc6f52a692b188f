// anomabot-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnomabotError {
    // --- DOMAIN (test definitions, unexpected results) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (warehouse, IO, config, HTTP) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Shortcuts so adapters can use `?` on their native errors.
impl From<std::io::Error> for AnomabotError {
    fn from(err: std::io::Error) -> Self {
        AnomabotError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for AnomabotError {
    fn from(err: duckdb::Error) -> Self {
        AnomabotError::Infrastructure(InfrastructureError::from(err))
    }
}

impl From<reqwest::Error> for AnomabotError {
    fn from(err: reqwest::Error) -> Self {
        AnomabotError::Infrastructure(InfrastructureError::Http(err))
    }
}

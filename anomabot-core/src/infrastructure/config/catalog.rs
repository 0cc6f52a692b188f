// anomabot-core/src/infrastructure/config/catalog.rs
//
// YAML-backed test catalog. Same columns as the historical spreadsheet, one
// list entry per row.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::domain::definition::TestRow;
use crate::domain::error::DomainError;
use crate::domain::ports::TestCatalog;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tests: Vec<TestRow>,
}

/// Re-reads the file on every lookup so edits apply to the next run.
#[derive(Debug, Clone)]
pub struct YamlCatalog {
    path: PathBuf,
}

impl YamlCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InfrastructureError> {
        let path = path.into();
        if !path.exists() {
            return Err(InfrastructureError::ConfigNotFound(
                path.to_string_lossy().into_owned(),
            ));
        }
        Ok(Self { path })
    }

    #[instrument(skip(self), fields(path = ?self.path))]
    fn load(&self) -> Result<Vec<TestRow>, InfrastructureError> {
        let content = fs::read_to_string(&self.path)?;
        let file: CatalogFile = serde_yaml::from_str(&content)?;
        info!(rows = file.tests.len(), "Test catalog loaded");
        Ok(file.tests)
    }

    fn load_for_domain(&self) -> Result<Vec<TestRow>, DomainError> {
        self.load()
            .map_err(|e| DomainError::CatalogUnavailable(format!("{:?}: {}", self.path, e)))
    }
}

impl TestCatalog for YamlCatalog {
    fn rows(&self, test_id: &str) -> Result<Vec<TestRow>, DomainError> {
        Ok(self
            .load_for_domain()?
            .into_iter()
            .filter(|r| r.test_id.trim() == test_id.trim())
            .collect())
    }

    fn all_rows(&self) -> Result<Vec<TestRow>, DomainError> {
        self.load_for_domain()
    }
}

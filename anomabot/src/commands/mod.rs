// anomabot/src/commands/mod.rs

pub mod list;
pub mod query;
pub mod run;
pub mod validate;

use anyhow::Context;
use std::path::Path;

use anomabot_core::infrastructure::adapters::DuckDBConnector;
use anomabot_core::infrastructure::config::{ProjectConfig, YamlCatalog, load_project_config};

pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })
}

pub(crate) fn open_catalog(project_dir: &Path, config: &ProjectConfig) -> anyhow::Result<YamlCatalog> {
    let path = project_dir.join(&config.catalog_path);
    YamlCatalog::new(&path).with_context(|| format!("Failed to open test catalog {:?}", path))
}

pub(crate) fn open_warehouse(
    project_dir: &Path,
    config: &ProjectConfig,
) -> anyhow::Result<DuckDBConnector> {
    let warehouse = config.warehouse.resolved(project_dir);
    DuckDBConnector::from_config(&warehouse).context("Failed to open the DuckDB warehouse")
}

// anomabot-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use super::connection::WarehouseConfig;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,

    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct NotificationConfig {
    #[serde(default)]
    pub slack: Option<SlackConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SlackConfig {
    pub webhook_url: String,
    /// Attachment rows rendered into the message; the rest is summarized.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_catalog_path() -> String {
    "tests.yaml".to_string()
}

fn default_max_rows() -> usize {
    10
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    load_project_config_with(project_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_project_config`] with `env` standing in for the process environment.
pub fn load_project_config_with<F>(
    project_dir: &Path,
    env: F,
) -> Result<ProjectConfig, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    apply_env_overrides(&mut config, env);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["anomabot.yaml", "anomabot.yml", "anomabot_project_conf.yaml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

// ANOMABOT_SLACK_WEBHOOK_URL keeps the webhook secret out of the YAML file.
fn apply_env_overrides<F>(config: &mut ProjectConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = env("ANOMABOT_CATALOG_PATH") {
        info!(old = ?config.catalog_path, new = ?val, "Overriding catalog path via ENV");
        config.catalog_path = val;
    }
    if let Some(url) = env("ANOMABOT_SLACK_WEBHOOK_URL") {
        info!("Overriding Slack webhook via ENV");
        match config.notifications.slack.as_mut() {
            Some(slack) => slack.webhook_url = url,
            None => {
                config.notifications.slack = Some(SlackConfig {
                    webhook_url: url,
                    max_rows: default_max_rows(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_with_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("anomabot.yaml"), "name: dwh\n")?;

        let config = load_project_config_with(dir.path(), no_env)?;
        assert_eq!(config.name, "dwh");
        assert_eq!(config.catalog_path, "tests.yaml");
        assert_eq!(config.warehouse.default.as_deref(), Some("warehouse.duckdb"));
        Ok(())
    }

    #[test]
    fn test_load_full() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("anomabot.yaml"),
            r#"
name: dwh
catalog-path: config/tests.yaml
warehouse:
  default: main.duckdb
  projects:
    marketing: marketing.duckdb
notifications:
  slack:
    webhook_url: https://hooks.example.com/T000
"#,
        )?;

        let config = load_project_config_with(dir.path(), no_env)?;
        assert_eq!(config.catalog_path, "config/tests.yaml");
        assert_eq!(config.warehouse.projects["marketing"], "marketing.duckdb");
        let slack = config.notifications.slack.unwrap();
        assert_eq!(slack.max_rows, 10);
        Ok(())
    }

    #[test]
    fn test_env_overrides_catalog_and_creates_slack_section() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("anomabot.yaml"), "name: dwh\n")?;

        let config = load_project_config_with(dir.path(), |key| match key {
            "ANOMABOT_CATALOG_PATH" => Some("ci/tests.yaml".to_string()),
            "ANOMABOT_SLACK_WEBHOOK_URL" => Some("https://hooks.example.com/ENV".to_string()),
            _ => None,
        })?;

        assert_eq!(config.catalog_path, "ci/tests.yaml");
        let slack = config.notifications.slack.unwrap();
        assert_eq!(slack.webhook_url, "https://hooks.example.com/ENV");
        assert_eq!(slack.max_rows, 10);
        Ok(())
    }

    #[test]
    fn test_env_webhook_keeps_configured_max_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("anomabot.yaml"),
            "name: dwh\nnotifications:\n  slack:\n    webhook_url: https://hooks.example.com/YAML\n    max_rows: 3\n",
        )?;

        let config = load_project_config_with(dir.path(), |key| {
            (key == "ANOMABOT_SLACK_WEBHOOK_URL").then(|| "https://hooks.example.com/ENV".to_string())
        })?;

        let slack = config.notifications.slack.unwrap();
        assert_eq!(slack.webhook_url, "https://hooks.example.com/ENV");
        assert_eq!(slack.max_rows, 3);
        assert_eq!(config.catalog_path, "tests.yaml");
        Ok(())
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_project_config(dir.path());
        assert!(matches!(res, Err(InfrastructureError::ConfigNotFound(_))));
    }
}

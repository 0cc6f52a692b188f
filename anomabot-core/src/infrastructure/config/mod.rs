pub mod catalog;
pub mod connection;
pub mod project;

pub use catalog::YamlCatalog;
pub use connection::WarehouseConfig;
pub use project::{
    NotificationConfig, ProjectConfig, SlackConfig, load_project_config, load_project_config_with,
};

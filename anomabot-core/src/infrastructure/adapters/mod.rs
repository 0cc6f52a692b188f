pub mod console;
pub mod duckdb;
pub mod slack;

pub use console::ConsoleNotifier;
pub use duckdb::DuckDBConnector;
pub use slack::SlackNotifier;

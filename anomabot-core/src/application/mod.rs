// anomabot-core/src/application/mod.rs

pub mod dispatcher;
pub mod engine;

pub use dispatcher::{RunStatus, TestDispatcher};
pub use engine::run_query;

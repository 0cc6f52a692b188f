// anomabot-core/src/ports/connector.rs

// What the dispatcher needs from a warehouse, without knowing which one answers.

use crate::domain::table::QueryResultTable;
use crate::error::AnomabotError;
use async_trait::async_trait;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs `query` in the context of `project` (a warehouse project, a
    /// database file...). Failures are returned as-is; nothing is retried.
    async fn query(&self, query: &str, project: &str) -> Result<QueryResultTable, AnomabotError>;

    fn engine_name(&self) -> &str;
}

// anomabot-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::table::QueryResultTable;
use crate::error::AnomabotError;
use crate::ports::connector::Connector;

/// Runs one query through the connector with logging and timing.
/// Every query the bot issues goes through here.
#[instrument(skip(connector, query), fields(engine = connector.engine_name(), query.len = query.len()))]
pub async fn run_query(
    connector: &dyn Connector,
    query: &str,
    project: &str,
) -> Result<QueryResultTable, AnomabotError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    let result = connector.query(query, project).await;

    let duration = start.elapsed();

    match result {
        Ok(table) => {
            debug!("✅ Query returned {} rows in {:.2?}", table.len(), duration);
            Ok(table)
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}

// anomabot/src/commands/query.rs
//
// USE CASE: Execute a raw SQL query (ad-hoc) against the warehouse.

use std::path::PathBuf;

use anomabot_core::application::run_query;
use anomabot_core::infrastructure::render::render_table;

use super::{load_config, open_warehouse};

pub async fn execute(
    project_dir: PathBuf,
    query: String,
    project: String,
    limit: usize,
) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let connector = open_warehouse(&project_dir, &config)?;

    let table = run_query(&connector, &query, &project).await?;

    println!("{}", render_table(&table, limit));
    println!("({} rows)", table.len());
    Ok(())
}

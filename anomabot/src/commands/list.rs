// anomabot/src/commands/list.rs
//
// USE CASE: Show the configured tests.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;

use anomabot_core::domain::ports::TestCatalog;

use super::{load_config, open_catalog};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let catalog = open_catalog(&project_dir, &config)?;
    let rows = catalog.all_rows()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header([
            "test_id",
            "test_name",
            "test_type",
            "main_table_name",
            "project_name",
            "notify_target",
        ]);

    for row in &rows {
        table.add_row([
            row.test_id.as_str(),
            row.test_name.as_str(),
            row.test_type.as_str(),
            row.main_table_name.as_str(),
            row.project_name.as_str(),
            row.notify_target.as_str(),
        ]);
    }

    println!("{table}");
    println!("{} rows, {} tests", rows.len(), catalog.test_ids()?.len());
    Ok(())
}

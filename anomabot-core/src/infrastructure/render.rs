// anomabot-core/src/infrastructure/render.rs

use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{ContentArrangement, Table};

use crate::domain::table::QueryResultTable;

/// Plain-text grid for chat messages and the terminal.
/// At most `max_rows` rows are drawn; a trailing line counts the rest.
pub fn render_table(table: &QueryResultTable, max_rows: usize) -> String {
    let mut grid = Table::new();
    grid.load_preset(ASCII_MARKDOWN)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(table.columns().iter().map(String::as_str));

    for row in table.rows().iter().take(max_rows) {
        grid.add_row(row.iter().map(|v| v.to_string()));
    }

    let hidden = table.len().saturating_sub(max_rows);
    if hidden > 0 {
        format!("{}\n... {} more rows", grid, hidden)
    } else {
        grid.to_string()
    }
}

// anomabot/src/commands/validate.rs
//
// USE CASE: Check every test definition without touching the warehouse.

use std::path::PathBuf;

use anomabot_core::domain::ports::TestCatalog;

use super::{load_config, open_catalog};

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;
    let catalog = open_catalog(&project_dir, &config)?;

    let mut invalid = 0;
    for test_id in catalog.test_ids()? {
        match catalog.find_test(&test_id) {
            Ok(Some(definition)) => {
                println!("✅ {} ({})", test_id, definition.test_type());
            }
            Ok(None) => {}
            Err(e) => {
                invalid += 1;
                println!("❌ {}: {}", test_id, e);
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} invalid test definition(s)", invalid);
    }
    println!("All test definitions are valid.");
    Ok(())
}

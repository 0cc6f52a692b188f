// anomabot/src/commands/run.rs
//
// USE CASE: Run one test from the catalog and notify its owner.

use std::path::PathBuf;
use std::sync::Arc;

use anomabot_core::application::TestDispatcher;
use anomabot_core::infrastructure::adapters::{ConsoleNotifier, SlackNotifier};
use anomabot_core::ports::Notifier;
use tracing::info;

use super::{load_config, open_catalog, open_warehouse};

pub async fn execute(project_dir: PathBuf, test_id: String, dry_run: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let config = load_config(&project_dir)?;
    let catalog = open_catalog(&project_dir, &config)?;
    let connector = open_warehouse(&project_dir, &config)?;

    let notifier: Arc<dyn Notifier> = match &config.notifications.slack {
        Some(slack) if !dry_run => Arc::new(SlackNotifier::new(slack)),
        slack => Arc::new(ConsoleNotifier::new(
            slack.as_ref().map(|s| s.max_rows).unwrap_or(10),
        )),
    };
    info!(project = %config.name, notifier = notifier.name(), "⚙️  Configuration loaded");

    let dispatcher = TestDispatcher::new(Arc::new(connector), notifier);
    let status = dispatcher.run(&catalog, &test_id).await?;

    info!("Finished in {:.2?}", start.elapsed());
    println!("{}", status);
    Ok(())
}

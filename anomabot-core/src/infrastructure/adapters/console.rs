// anomabot-core/src/infrastructure/adapters/console.rs

use async_trait::async_trait;

use crate::domain::notification::Notification;
use crate::error::AnomabotError;
use crate::infrastructure::render::render_table;
use crate::ports::notifier::Notifier;

/// Prints notifications on stdout. Used for dry runs and when no webhook is configured.
pub struct ConsoleNotifier {
    max_rows: usize,
}

impl ConsoleNotifier {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }

    pub fn format(&self, notification: &Notification) -> String {
        match &notification.attachment {
            Some(table) if !table.is_empty() => format!(
                "{}\n{}",
                notification.message,
                render_table(table, self.max_rows)
            ),
            _ => notification.message.clone(),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, notification: &Notification) -> Result<(), AnomabotError> {
        println!("{}", self.format(notification));
        Ok(())
    }
}

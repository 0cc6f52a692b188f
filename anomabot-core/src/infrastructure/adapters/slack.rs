// anomabot-core/src/infrastructure/adapters/slack.rs

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use tracing::debug;

use crate::domain::notification::Notification;
use crate::error::AnomabotError;
use crate::infrastructure::config::SlackConfig;
use crate::infrastructure::render::render_table;
use crate::ports::notifier::Notifier;

/// Incoming-webhook channel. Attachments are sent as a code block under the message.
pub struct SlackNotifier {
    webhook_url: String,
    max_rows: usize,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            max_rows: config.max_rows,
            client: reqwest::Client::new(),
        }
    }

    pub fn payload(&self, notification: &Notification) -> JsonValue {
        let text = match &notification.attachment {
            Some(table) if !table.is_empty() => format!(
                "{}\n```\n{}\n```",
                notification.message,
                render_table(table, self.max_rows)
            ),
            _ => notification.message.clone(),
        };
        json!({ "text": text })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<(), AnomabotError> {
        let payload = self.payload(notification);

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        debug!(mentions = notification.mentions_recipient, "Slack message delivered");
        Ok(())
    }
}

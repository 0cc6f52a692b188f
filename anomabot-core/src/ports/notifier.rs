// anomabot-core/src/ports/notifier.rs

use crate::domain::notification::Notification;
use crate::error::AnomabotError;
use async_trait::async_trait;

/// Delivery channel for test results (chat webhook, console...).
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, notification: &Notification) -> Result<(), AnomabotError>;
}

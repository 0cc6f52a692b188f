// anomabot-core/src/domain/notification.rs

use serde::Serialize;

use crate::domain::table::QueryResultTable;

/// What the dispatcher decided to tell people about one test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<QueryResultTable>,
    /// True when the message pings the configured recipient.
    pub mentions_recipient: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attachment: None,
            mentions_recipient: false,
        }
    }

    pub fn alert(target: &str, message: impl AsRef<str>, attachment: QueryResultTable) -> Self {
        Self {
            message: format!("{}{}", mention(target), message.as_ref()),
            attachment: Some(attachment),
            mentions_recipient: true,
        }
    }

    pub fn with_attachment(mut self, attachment: QueryResultTable) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Chat mention prefix (`<@U123>` is the Slack member syntax).
pub fn mention(target: &str) -> String {
    if target.is_empty() {
        "Hey! ".to_string()
    } else {
        format!("Hey, <@{}>! ", target)
    }
}

// --- MESSAGE TEXTS ---

pub fn no_anomalies(test_name: &str) -> String {
    format!(
        "Anomaly test successfully run for {}, No Anomalies detected",
        test_name
    )
}

pub fn anomalies_detected(test_name: &str) -> String {
    format!(
        "Anomaly test successfully run for {}, Anomalies detected, run query for the test to see more",
        test_name
    )
}

pub fn data_collected(test_name: &str) -> String {
    format!(
        "Test successfully run for {}, Data has been collected",
        test_name
    )
}

pub fn data_not_collected(test_name: &str) -> String {
    format!(
        "Test successfully run for {}, Data has not been collected",
        test_name
    )
}

pub fn rows_collected(test_name: &str, total: i64) -> String {
    format!(
        "Test successfully run for {}, Total no. of rows collected today: {}",
        test_name, total
    )
}

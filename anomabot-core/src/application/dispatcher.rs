// anomabot-core/src/application/dispatcher.rs
//
// USE CASE: run one configured test end-to-end (lookup, query, decide, notify).

use chrono::{Local, NaiveDate};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::engine::run_query;
use crate::domain::checks::{RowCountTally, arrived_today};
use crate::domain::definition::{Check, EntriesQuery, TableRef, TestDefinition};
use crate::domain::detection::{OutlierDetector, detect_anomalies};
use crate::domain::error::DomainError;
use crate::domain::notification::{self, Notification};
use crate::domain::ports::TestCatalog;
use crate::domain::query::{self, ENTRY_DATE_COLUMN, LAST_ENTRY_DATE, NO_OF_ROWS};
use crate::domain::table::Value;
use crate::error::AnomabotError;
use crate::ports::{Connector, Notifier};

/// Outcome reported back to whoever triggered the run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Executed,
    NoTestAvailable,
    MisconfiguredTestType,
    InvalidDefinition(String),
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Executed => write!(f, "Executed successfully"),
            RunStatus::NoTestAvailable => write!(f, "No test available with given test_id"),
            RunStatus::MisconfiguredTestType => {
                write!(f, "test_type isn't configured correct. Check again!")
            }
            RunStatus::InvalidDefinition(reason) => {
                write!(f, "Test definition is invalid: {}. Check again!", reason)
            }
        }
    }
}

pub struct TestDispatcher {
    connector: Arc<dyn Connector>,
    notifier: Arc<dyn Notifier>,
    today: Option<NaiveDate>,
}

impl TestDispatcher {
    pub fn new(connector: Arc<dyn Connector>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            connector,
            notifier,
            today: None,
        }
    }

    /// Pins the date freshness checks compare against. Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Trigger entry point. Configuration problems come back as a status and
    /// reach neither the warehouse nor the notifier; query failures propagate.
    #[instrument(skip(self, catalog))]
    pub async fn run(
        &self,
        catalog: &dyn TestCatalog,
        test_id: &str,
    ) -> Result<RunStatus, AnomabotError> {
        let definition = match catalog.find_test(test_id) {
            Ok(Some(definition)) => definition,
            Ok(None) => {
                warn!("No test configured with this id");
                return Ok(RunStatus::NoTestAvailable);
            }
            Err(DomainError::UnknownTestType(t)) => {
                warn!(test_type = %t, "Unsupported test_type");
                return Ok(RunStatus::MisconfiguredTestType);
            }
            Err(DomainError::InvalidDefinition { reason, .. }) => {
                warn!(%reason, "Invalid test definition");
                return Ok(RunStatus::InvalidDefinition(reason));
            }
            Err(e) if e.is_configuration() => {
                warn!("Invalid test definition: {}", e);
                return Ok(RunStatus::InvalidDefinition(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            test_type = %definition.test_type(),
            test_name = %definition.test_name,
            "🚀 Running test"
        );

        let notification = self.decide(&definition).await?;
        self.deliver(&notification).await;

        Ok(RunStatus::Executed)
    }

    /// Runs the check and builds the message, without sending it.
    pub async fn decide(&self, definition: &TestDefinition) -> Result<Notification, AnomabotError> {
        match &definition.check {
            Check::Anomaly { entries, threshold } => {
                self.check_anomalies(definition, entries, *threshold).await
            }
            Check::DataArrived { table } => self.check_freshness(definition, table).await,
            Check::RowCount { tables } => self.count_rows(definition, tables).await,
        }
    }

    async fn check_anomalies(
        &self,
        definition: &TestDefinition,
        entries: &EntriesQuery,
        threshold: f64,
    ) -> Result<Notification, AnomabotError> {
        let sql = query::daily_entries(entries);
        let result = run_query(self.connector.as_ref(), &sql, &definition.project_name).await?;

        let detector = OutlierDetector::new(threshold);
        let report = detect_anomalies(&result, ENTRY_DATE_COLUMN, &detector);
        info!(flagged = report.len(), "Anomaly detection finished");

        if report.is_empty() {
            return Ok(Notification::info(notification::no_anomalies(
                &definition.test_name,
            )));
        }
        Ok(Notification::alert(
            &definition.notify_target,
            notification::anomalies_detected(&definition.test_name),
            report.to_table(threshold),
        ))
    }

    async fn check_freshness(
        &self,
        definition: &TestDefinition,
        table: &TableRef,
    ) -> Result<Notification, AnomabotError> {
        let sql = query::last_entry_date(table);
        let result = run_query(self.connector.as_ref(), &sql, &definition.project_name).await?;

        let last = result
            .first(LAST_ENTRY_DATE)
            .ok_or_else(|| DomainError::UnexpectedResult {
                column: LAST_ENTRY_DATE.to_string(),
            })?;
        let today = self.today();
        debug!(last_entry_date = %last, %today, "Freshness check");

        if arrived_today(last, today) {
            return Ok(Notification::info(notification::data_collected(
                &definition.test_name,
            )));
        }
        Ok(Notification::alert(
            &definition.notify_target,
            notification::data_not_collected(&definition.test_name),
            result,
        ))
    }

    /// Sub-tables are queried one after the other against the test's project.
    async fn count_rows(
        &self,
        definition: &TestDefinition,
        tables: &[TableRef],
    ) -> Result<Notification, AnomabotError> {
        let mut counts = Vec::with_capacity(tables.len());
        for table in tables {
            let sql = query::rows_today(table);
            let result =
                run_query(self.connector.as_ref(), &sql, &definition.project_name).await?;
            let rows = result
                .first(NO_OF_ROWS)
                .and_then(Value::as_i64)
                .ok_or_else(|| DomainError::UnexpectedResult {
                    column: NO_OF_ROWS.to_string(),
                })?;
            debug!(table = %table.main_table_name, rows, "Rows collected today");
            counts.push((table.short_name(), rows));
        }

        let tally = RowCountTally::fold(counts);

        let message = notification::rows_collected(&definition.test_name, tally.total);
        let breakdown = tally.to_table();
        if tally.zero_row_found {
            warn!("At least one table received no rows today");
            Ok(Notification::alert(&definition.notify_target, message, breakdown))
        } else {
            Ok(Notification::info(message).with_attachment(breakdown))
        }
    }

    async fn deliver(&self, notification: &Notification) {
        match self.notifier.send(notification).await {
            Ok(()) => debug!(notifier = self.notifier.name(), "Notification sent"),
            Err(e) => error!(
                notifier = self.notifier.name(),
                "❌ Failed to send notification: {}", e
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::checks::{BREAKDOWN_ROWS_COLUMN, BREAKDOWN_TABLE_COLUMN};
    use crate::domain::definition::TestRow;
    use crate::domain::ports::InMemoryCatalog;
    use crate::domain::query::{ENTRIES_COLUMN, PIVOT_COLUMN};
    use crate::infrastructure::adapters::DuckDBConnector;
    use crate::domain::table::QueryResultTable;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // --- MOCKS ---

    /// Answers with the first canned table whose marker appears in the query.
    struct MockConnector {
        responses: Vec<(&'static str, QueryResultTable)>,
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl MockConnector {
        fn new(responses: Vec<(&'static str, QueryResultTable)>) -> Self {
            Self {
                responses,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn query(&self, query: &str, project: &str) -> Result<QueryResultTable, AnomabotError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), project.to_string()));
            self.responses
                .iter()
                .find(|(marker, _)| query.contains(marker))
                .map(|(_, table)| table.clone())
                .ok_or_else(|| AnomabotError::InternalError(format!("unexpected query: {}", query)))
        }

        fn engine_name(&self) -> &str {
            "mock"
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, notification: &Notification) -> Result<(), AnomabotError> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                return Err(AnomabotError::InternalError("webhook down".into()));
            }
            Ok(())
        }
    }

    // --- FIXTURES ---

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn row(test_id: &str, test_type: &str, table: &str) -> TestRow {
        TestRow {
            test_id: test_id.into(),
            test_name: "events".into(),
            test_type: test_type.into(),
            main_table_name: table.into(),
            date_column_name: "day".into(),
            project_name: "dwh".into(),
            notify_target: "U42".into(),
            ..Default::default()
        }
    }

    fn scalar(column: &str, value: Value) -> QueryResultTable {
        QueryResultTable::from_rows([column], vec![vec![value]])
    }

    fn dispatcher(
        connector: MockConnector,
    ) -> (TestDispatcher, Arc<Mutex<Vec<(String, String)>>>, Arc<RecordingNotifier>) {
        let calls = connector.calls.clone();
        let notifier = Arc::new(RecordingNotifier::default());
        let d = TestDispatcher::new(Arc::new(connector), notifier.clone()).with_today(today());
        (d, calls, notifier)
    }

    // --- DATA ARRIVED ---

    #[tokio::test]
    async fn test_data_arrived_today() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let (d, calls, notifier) = dispatcher(MockConnector::new(vec![(
            LAST_ENTRY_DATE,
            scalar(LAST_ENTRY_DATE, Value::from("2024-03-05")),
        )]));

        let status = d.run(&catalog, "1").await?;

        assert_eq!(status.to_string(), "Executed successfully");
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].message,
            "Test successfully run for events, Data has been collected"
        );
        assert!(sent[0].attachment.is_none());
        assert_eq!(calls.lock().unwrap()[0].1, "dwh");
        Ok(())
    }

    #[tokio::test]
    async fn test_data_not_arrived_alerts_with_result() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![(
            LAST_ENTRY_DATE,
            scalar(LAST_ENTRY_DATE, Value::from("2024-03-04")),
        )]));

        d.run(&catalog, "1").await?;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent[0].message,
            "Hey, <@U42>! Test successfully run for events, Data has not been collected"
        );
        assert!(sent[0].mentions_recipient);
        let attached = sent[0].attachment.as_ref().unwrap();
        assert_eq!(attached.first(LAST_ENTRY_DATE), Some(&Value::from("2024-03-04")));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_freshness_result_is_an_error() {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![(
            LAST_ENTRY_DATE,
            QueryResultTable::new(vec![LAST_ENTRY_DATE.to_string()]),
        )]));

        let res = d.run(&catalog, "1").await;
        assert!(matches!(
            res,
            Err(AnomabotError::Domain(DomainError::UnexpectedResult { .. }))
        ));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    // --- ROW COUNT ---

    #[tokio::test]
    async fn test_row_count_with_empty_table() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![
            row("2", "no_of_rows", "sales.orders"),
            TestRow {
                project_name: "ignored".into(),
                ..row("2", "no_of_rows", "sales.refunds")
            },
        ]);
        let (d, calls, notifier) = dispatcher(MockConnector::new(vec![
            ("sales.orders", scalar(NO_OF_ROWS, Value::Integer(120))),
            ("sales.refunds", scalar(NO_OF_ROWS, Value::Integer(0))),
        ]));

        d.run(&catalog, "2").await?;

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].0.contains("sales.orders"));
        assert!(calls[1].0.contains("sales.refunds"));
        assert!(calls.iter().all(|(_, project)| project == "dwh"));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent[0].message,
            "Hey, <@U42>! Test successfully run for events, Total no. of rows collected today: 120"
        );
        let breakdown = sent[0].attachment.as_ref().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.get(0, BREAKDOWN_TABLE_COLUMN), Some(&Value::from("orders")));
        assert_eq!(breakdown.get(1, BREAKDOWN_ROWS_COLUMN), Some(&Value::Integer(0)));
        Ok(())
    }

    #[tokio::test]
    async fn test_row_count_all_tables_filled() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![
            row("2", "no_of_rows", "sales.orders"),
            row("2", "no_of_rows", "sales.refunds"),
        ]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![
            ("sales.orders", scalar(NO_OF_ROWS, Value::Integer(3))),
            ("sales.refunds", scalar(NO_OF_ROWS, Value::Integer(4))),
        ]));

        d.run(&catalog, "2").await?;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent[0].message,
            "Test successfully run for events, Total no. of rows collected today: 7"
        );
        assert!(!sent[0].mentions_recipient);
        assert_eq!(sent[0].attachment.as_ref().map(QueryResultTable::len), Some(2));
        Ok(())
    }

    // --- ANOMALY ---

    fn anomaly_row() -> TestRow {
        TestRow {
            dataset_column_name: Some("dataset_id".into()),
            dataset_table_column_name: Some("table_id".into()),
            entries_column_name: Some("row_count".into()),
            threshold: Some(10.0),
            ..row("3", "anomaly", "monitoring.table_stats")
        }
    }

    fn entries(trailing_spiky: i64) -> QueryResultTable {
        let history = [98, 100, 102, 99, 101, 100, 103, 97];
        let mut rows = Vec::new();
        for (i, v) in history.iter().enumerate() {
            let day = format!("2024-02-{:02}", i + 1);
            rows.push(vec![Value::from(day.as_str()), Value::from("ds|spiky"), Value::Integer(*v)]);
            rows.push(vec![Value::from(day.as_str()), Value::from("ds|steady"), Value::Integer(*v)]);
        }
        rows.push(vec![Value::from("2024-02-09"), Value::from("ds|spiky"), Value::Integer(trailing_spiky)]);
        rows.push(vec![Value::from("2024-02-09"), Value::from("ds|steady"), Value::Integer(105)]);
        QueryResultTable::from_rows([ENTRY_DATE_COLUMN, PIVOT_COLUMN, ENTRIES_COLUMN], rows)
    }

    #[tokio::test]
    async fn test_anomaly_detected() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![anomaly_row()]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![(PIVOT_COLUMN, entries(10_000))]));

        d.run(&catalog, "3").await?;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent[0].message,
            "Hey, <@U42>! Anomaly test successfully run for events, Anomalies detected, run query for the test to see more"
        );
        let report = sent[0].attachment.as_ref().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.first("dataset|table"), Some(&Value::from("ds|spiky")));
        Ok(())
    }

    #[tokio::test]
    async fn test_no_anomaly() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![anomaly_row()]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![(PIVOT_COLUMN, entries(100))]));

        d.run(&catalog, "3").await?;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent[0].message,
            "Anomaly test successfully run for events, No Anomalies detected"
        );
        assert!(sent[0].attachment.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_anomaly_with_qualified_date_column() -> anyhow::Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector.execute_batch(
            "",
            "CREATE TABLE stats (day DATE, dataset_id VARCHAR, table_id VARCHAR, row_count BIGINT);",
        )?;
        for (i, v) in [98, 100, 102, 99, 101, 100, 103, 97].iter().enumerate() {
            connector.execute_batch(
                "",
                &format!("INSERT INTO stats VALUES ('2024-01-{:02}', 'ds', 'spiky', {});", i + 1, v),
            )?;
        }
        connector.execute_batch("", "INSERT INTO stats VALUES ('2024-01-09', 'ds', 'spiky', 10000);")?;
        let connector = Arc::new(connector);
        let d = TestDispatcher::new(connector, Arc::new(RecordingNotifier::default()));

        for date_column in ["day", "stats.day"] {
            let definition = TestDefinition::from_rows(&[TestRow {
                main_table_name: "stats".into(),
                date_column_name: date_column.into(),
                ..anomaly_row()
            }])?;

            let n = d.decide(&definition).await?;
            assert!(n.message.contains("Anomalies detected"), "{}: {}", date_column, n.message);
            assert_eq!(
                n.attachment.as_ref().and_then(|t| t.first("dataset|table")),
                Some(&Value::from("ds|spiky"))
            );
        }
        Ok(())
    }

    // --- CONFIGURATION ERRORS ---

    #[tokio::test]
    async fn test_unknown_test_type_contacts_nobody() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![row("4", "row_count", "sales.orders")]);
        let (d, calls, notifier) = dispatcher(MockConnector::new(vec![]));

        let status = d.run(&catalog, "4").await?;

        assert_eq!(status.to_string(), "test_type isn't configured correct. Check again!");
        assert!(calls.lock().unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_no_test_available() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let (d, calls, _) = dispatcher(MockConnector::new(vec![]));

        let status = d.run(&catalog, "999").await?;

        assert_eq!(status, RunStatus::NoTestAvailable);
        assert_eq!(status.to_string(), "No test available with given test_id");
        assert!(calls.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_incomplete_anomaly_row() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![TestRow {
            entries_column_name: None,
            ..anomaly_row()
        }]);
        let (d, calls, _) = dispatcher(MockConnector::new(vec![]));

        let status = d.run(&catalog, "3").await?;

        assert!(matches!(status, RunStatus::InvalidDefinition(_)));
        assert!(status.to_string().starts_with("Test definition is invalid: "));
        assert!(calls.lock().unwrap().is_empty());
        Ok(())
    }

    // --- DELIVERY ---

    #[tokio::test]
    async fn test_notifier_failure_is_swallowed() -> anyhow::Result<()> {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let connector = MockConnector::new(vec![(
            LAST_ENTRY_DATE,
            scalar(LAST_ENTRY_DATE, Value::from("2024-03-05")),
        )]);
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let d = TestDispatcher::new(Arc::new(connector), notifier.clone()).with_today(today());

        let status = d.run(&catalog, "1").await?;

        assert_eq!(status, RunStatus::Executed);
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let catalog = InMemoryCatalog::new(vec![row("1", "data_arrived_or_not", "analytics.events")]);
        let (d, _, notifier) = dispatcher(MockConnector::new(vec![]));

        assert!(d.run(&catalog, "1").await.is_err());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }
}

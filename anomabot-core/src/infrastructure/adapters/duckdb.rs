// anomabot-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::domain::table::{QueryResultTable, Value};
use crate::error::AnomabotError;
use crate::infrastructure::config::WarehouseConfig;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

type SharedConnection = Arc<Mutex<Connection>>;

/// Local warehouse: one DuckDB database per project, plus a default.
pub struct DuckDBConnector {
    default: Option<SharedConnection>,
    projects: HashMap<String, SharedConnection>,
}

fn open(db_path: &str) -> Result<SharedConnection, InfrastructureError> {
    let config = Config::default();
    let conn = if db_path == ":memory:" {
        Connection::open_in_memory_with_flags(config)?
    } else {
        Connection::open_with_flags(db_path, config)?
    };
    Ok(Arc::new(Mutex::new(conn)))
}

fn poisoned() -> AnomabotError {
    AnomabotError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
        "DuckDB Mutex Poisoned",
    )))
}

impl DuckDBConnector {
    /// Single database answering for every project.
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        Ok(Self {
            default: Some(open(db_path)?),
            projects: HashMap::new(),
        })
    }

    /// Paths in `config` are used as given; resolve them before calling.
    pub fn from_config(config: &WarehouseConfig) -> Result<Self, InfrastructureError> {
        let default = config.default.as_deref().map(open).transpose()?;
        let mut projects = HashMap::with_capacity(config.projects.len());
        for (name, path) in &config.projects {
            projects.insert(name.clone(), open(path)?);
        }
        Ok(Self { default, projects })
    }

    fn connection_for(&self, project: &str) -> Result<SharedConnection, AnomabotError> {
        self.projects
            .get(project)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| {
                AnomabotError::Infrastructure(InfrastructureError::Database(
                    DatabaseError::UnknownProject(project.to_string()),
                ))
            })
    }

    /// Runs statements that return nothing (fixtures, setup scripts).
    pub fn execute_batch(&self, project: &str, sql: &str) -> Result<(), AnomabotError> {
        let conn = self.connection_for(project)?;
        let conn = conn.lock().map_err(|_| poisoned())?;
        conn.execute_batch(sql)?;
        Ok(())
    }
}

fn run_query(conn: &Connection, query: &str) -> Result<QueryResultTable, duckdb::Error> {
    let mut stmt = conn.prepare(query)?;
    let mut rows = stmt.query([])?;

    // Column names are only known once the statement has run.
    let columns: Vec<String> = rows.as_ref().map(|s| s.column_names()).unwrap_or_default();
    let mut table = QueryResultTable::new(columns);
    let width = table.columns().len();

    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(convert(row.get::<_, DuckValue>(i)?));
        }
        table.push_row(cells);
    }
    Ok(table)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn micros(unit: TimeUnit, v: i64) -> i64 {
    match unit {
        TimeUnit::Second => v.saturating_mul(1_000_000),
        TimeUnit::Millisecond => v.saturating_mul(1_000),
        TimeUnit::Microsecond => v,
        TimeUnit::Nanosecond => v / 1_000,
    }
}

/// DuckDB value -> scalar cell. Dates become ISO text, matching how the
/// freshness check compares them.
fn convert(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Integer(b as i64),
        DuckValue::TinyInt(v) => Value::Integer(v.into()),
        DuckValue::SmallInt(v) => Value::Integer(v.into()),
        DuckValue::Int(v) => Value::Integer(v.into()),
        DuckValue::BigInt(v) => Value::Integer(v),
        DuckValue::HugeInt(v) => i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or(Value::Float(v as f64)),
        DuckValue::UTinyInt(v) => Value::Integer(v.into()),
        DuckValue::USmallInt(v) => Value::Integer(v.into()),
        DuckValue::UInt(v) => Value::Integer(v.into()),
        DuckValue::UBigInt(v) => i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or(Value::Float(v as f64)),
        DuckValue::Float(v) => Value::Float(v.into()),
        DuckValue::Double(v) => Value::Float(v),
        DuckValue::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Date32(days) => {
            Value::Text((epoch() + Duration::days(days.into())).format("%Y-%m-%d").to_string())
        }
        DuckValue::Timestamp(unit, v) => DateTime::from_timestamp_micros(micros(unit, v))
            .map(|ts| Value::Text(ts.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),
        other => Value::Text(format!("{:?}", other)),
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn query(&self, query: &str, project: &str) -> Result<QueryResultTable, AnomabotError> {
        let conn = self.connection_for(project)?;
        let sql = query.to_string();

        // DuckDB calls block; keep them off the async workers.
        let table = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| poisoned())?;
            run_query(&conn, &sql).map_err(AnomabotError::from)
        })
        .await
        .map_err(|e| AnomabotError::InternalError(format!("DuckDB task failed: {}", e)))??;

        debug!(rows = table.len(), project, "DuckDB query returned");
        Ok(table)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

// anomabot-core/src/domain/detection/report.rs

use serde::{Deserialize, Serialize};

use super::outlier::OutlierReading;
use crate::domain::table::{QueryResultTable, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub series_key: String,
    pub latest_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Flagged series, in the order they were evaluated. Empty means "no anomalies".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub records: Vec<AnomalyRecord>,
}

impl AnomalyReport {
    /// Keeps the flagged entries and drops the rest; no sorting, no dedup.
    pub fn aggregate<I, K>(results: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<OutlierReading>)>,
        K: Into<String>,
    {
        let records = results
            .into_iter()
            .filter_map(|(key, reading)| {
                reading.map(|r| AnomalyRecord {
                    series_key: key.into(),
                    latest_value: r.latest_value,
                    lower_bound: r.lower_bound,
                    upper_bound: r.upper_bound,
                })
            })
            .collect();
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Tabular form used as the alert attachment. The bound columns are named
    /// after the percentiles they came from (`10%`, `90%`).
    pub fn to_table(&self, threshold: f64) -> QueryResultTable {
        let columns = vec![
            "dataset|table".to_string(),
            "today's rows".to_string(),
            format!("{}%", threshold),
            format!("{}%", 100.0 - threshold),
        ];
        let rows = self
            .records
            .iter()
            .map(|r| {
                vec![
                    Value::from(r.series_key.as_str()),
                    Value::Float(r.latest_value),
                    Value::Float(r.lower_bound),
                    Value::Float(r.upper_bound),
                ]
            })
            .collect();
        QueryResultTable::from_rows(columns, rows)
    }
}

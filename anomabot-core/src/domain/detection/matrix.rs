// anomabot-core/src/domain/detection/matrix.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::query::{ENTRIES_COLUMN, PIVOT_COLUMN};
use crate::domain::table::{QueryResultTable, Value};

/// One named, date-aligned sequence of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// The most recent observation, the one under test.
    pub fn trailing(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Series sharing one date axis, oldest first.
///
/// Every series has exactly `dates.len()` values; gaps are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesMatrix {
    pub dates: Vec<Value>,
    pub series: Vec<Series>,
}

impl SeriesMatrix {
    /// Reshapes a daily entries result into one series per pivot key.
    ///
    /// Without a `column_to_pivot_on` column the table is taken as-is: each
    /// column other than `date_column` is one series, in row order.
    pub fn pivot(table: &QueryResultTable, date_column: &str) -> Self {
        match table.column_index(PIVOT_COLUMN) {
            Some(key_idx) => Self::pivot_on(
                table,
                date_column,
                key_idx,
                table.column_index(ENTRIES_COLUMN),
            ),
            None => Self::from_columns(table, date_column),
        }
    }

    fn pivot_on(
        table: &QueryResultTable,
        date_column: &str,
        key_idx: usize,
        value_idx: Option<usize>,
    ) -> Self {
        let date_idx = table.column_index(date_column);

        // Distinct dates, ascending.
        let mut seen = HashSet::new();
        let mut dates: Vec<Value> = Vec::new();
        for row in table.rows() {
            let date = date_idx.map(|i| row[i].clone()).unwrap_or(Value::Null);
            if seen.insert(date.to_string()) {
                dates.push(date);
            }
        }
        dates.sort_by(|a, b| a.axis_cmp(b));
        let positions: HashMap<String, usize> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| (d.to_string(), i))
            .collect();

        // (sum, count) per cell; duplicates are averaged.
        let mut cells: BTreeMap<String, Vec<(f64, u32)>> = BTreeMap::new();
        for row in table.rows() {
            let key = row[key_idx].to_string();
            let slots = cells
                .entry(key)
                .or_insert_with(|| vec![(0.0, 0); dates.len()]);

            let date = date_idx
                .map(|i| row[i].to_string())
                .unwrap_or_else(|| Value::Null.to_string());
            let Some(&pos) = positions.get(&date) else {
                continue;
            };
            if let Some(value) = value_idx.and_then(|i| row[i].as_f64()) {
                slots[pos].0 += value;
                slots[pos].1 += 1;
            }
        }

        let series = cells
            .into_iter()
            .map(|(key, slots)| Series {
                key,
                values: slots
                    .into_iter()
                    .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
                    .collect(),
            })
            .collect();

        Self { dates, series }
    }

    fn from_columns(table: &QueryResultTable, date_column: &str) -> Self {
        let date_idx = table.column_index(date_column);
        let dates = match date_idx {
            Some(i) => table.rows().iter().map(|r| r[i].clone()).collect(),
            None => (0..table.len() as i64).map(Value::Integer).collect(),
        };

        let series = table
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != date_idx)
            .map(|(i, name)| Series {
                key: name.clone(),
                values: table.rows().iter().map(|r| r[i].as_f64()).collect(),
            })
            .collect();

        Self { dates, series }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.key == key)
    }

    /// Number of cells holding an observation.
    pub fn observed_cells(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.iter().filter(|v| v.is_some()).count())
            .sum()
    }
}

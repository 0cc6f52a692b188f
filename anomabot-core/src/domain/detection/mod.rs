// anomabot-core/src/domain/detection/mod.rs
//
// Pivot -> per-series outlier test -> report.

pub mod matrix;
pub mod outlier;
pub mod report;

pub use matrix::{Series, SeriesMatrix};
pub use outlier::{OutlierDetector, OutlierReading};
pub use report::{AnomalyRecord, AnomalyReport};

use crate::domain::table::QueryResultTable;

/// Runs the detector over every series of the (pivoted) result.
pub fn detect_anomalies(
    table: &QueryResultTable,
    date_column: &str,
    detector: &OutlierDetector,
) -> AnomalyReport {
    let matrix = SeriesMatrix::pivot(table, date_column);
    AnomalyReport::aggregate(
        matrix
            .series
            .iter()
            .map(|s| (s.key.as_str(), detector.detect(&s.values))),
    )
}

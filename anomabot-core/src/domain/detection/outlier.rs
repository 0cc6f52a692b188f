// anomabot-core/src/domain/detection/outlier.rs

use serde::{Deserialize, Serialize};

/// Tukey fence multiplier.
pub const FENCE_MULTIPLIER: f64 = 1.5;

/// Below this many historical observations no verdict is given.
pub const MIN_HISTORY: usize = 3;

/// A trailing value that fell outside the fences, with the bounds it was judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierReading {
    pub latest_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Flags the last value of a series when it lies beyond
/// `[lower - 1.5 * iqr, upper + 1.5 * iqr]`, where `lower`/`upper` are the
/// `threshold` and `100 - threshold` percentiles of the preceding values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierDetector {
    threshold: f64,
}

impl OutlierDetector {
    /// `threshold` is the lower percentile (e.g. 10 for the 10th/90th pair).
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn upper_percentile(&self) -> f64 {
        100.0 - self.threshold
    }

    /// Returns `None` for in-range values, a missing trailing value, or when
    /// fewer than [`MIN_HISTORY`] historical values exist.
    pub fn detect(&self, series: &[Option<f64>]) -> Option<OutlierReading> {
        let (last, history) = series.split_last()?;

        let mut history: Vec<f64> = history
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        if history.len() < MIN_HISTORY {
            return None;
        }
        history.sort_by(f64::total_cmp);

        let lower_bound = percentile(&history, self.threshold);
        let upper_bound = percentile(&history, self.upper_percentile());
        let iqr = upper_bound - lower_bound;

        let last = (*last).filter(|v| !v.is_nan())?;

        let below = last < lower_bound - FENCE_MULTIPLIER * iqr;
        let above = last > upper_bound + FENCE_MULTIPLIER * iqr;

        (below || above).then_some(OutlierReading {
            latest_value: last,
            lower_bound,
            upper_bound,
        })
    }
}

/// Percentile with linear interpolation between closest ranks.
/// `sorted` must be ascending and non-empty; `pct` is clamped to [0, 100].
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let Some(&first) = sorted.first() else {
        return f64::NAN;
    };
    if sorted.len() == 1 {
        return first;
    }

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

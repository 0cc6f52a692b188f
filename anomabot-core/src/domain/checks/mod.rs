pub mod freshness;
pub mod row_count;

pub use freshness::arrived_today;
pub use row_count::{BREAKDOWN_ROWS_COLUMN, BREAKDOWN_TABLE_COLUMN, RowCountTally};

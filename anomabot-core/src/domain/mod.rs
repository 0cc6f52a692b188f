pub mod checks;
pub mod definition;
pub mod detection;
pub mod error;
pub mod notification;
pub mod ports;
pub mod query;
pub mod table;

// Shorter imports for the application layer
pub use definition::{Check, TestDefinition, TestRow, TestType};
pub use error::DomainError;
pub use notification::Notification;
pub use table::{QueryResultTable, Value};

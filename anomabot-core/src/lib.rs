// anomabot-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// Async collaborator contracts (warehouse, notification channel).
pub mod ports;

// Test model, query shapes, detection. No I/O.
pub mod domain;

// DuckDB, YAML config and catalog, Slack, console.
pub mod infrastructure;

// Use cases: instrumented queries, test dispatch.
pub mod application;

pub mod error;

pub use error::AnomabotError;

// src/domain/ports/mod.rs

pub mod catalog;

pub use catalog::{InMemoryCatalog, TestCatalog};

use crate::domain::definition::{TestDefinition, TestRow};
use crate::domain::error::DomainError;

/// Read access to the test configuration store.
pub trait TestCatalog: Send + Sync {
    /// Every configuration row whose `test_id` matches. Empty when unknown.
    fn rows(&self, test_id: &str) -> Result<Vec<TestRow>, DomainError>;

    /// All rows, in store order.
    fn all_rows(&self) -> Result<Vec<TestRow>, DomainError>;

    /// `Ok(None)` when no row matches `test_id`.
    fn find_test(&self, test_id: &str) -> Result<Option<TestDefinition>, DomainError> {
        let rows = self.rows(test_id)?;
        if rows.is_empty() {
            return Ok(None);
        }
        TestDefinition::from_rows(&rows).map(Some)
    }

    /// Distinct test ids, first-seen order.
    fn test_ids(&self) -> Result<Vec<String>, DomainError> {
        let mut ids: Vec<String> = Vec::new();
        for row in self.all_rows()? {
            if !ids.contains(&row.test_id) {
                ids.push(row.test_id);
            }
        }
        Ok(ids)
    }
}

/// Catalog over rows already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    rows: Vec<TestRow>,
}

impl InMemoryCatalog {
    pub fn new(rows: Vec<TestRow>) -> Self {
        Self { rows }
    }
}

impl TestCatalog for InMemoryCatalog {
    fn rows(&self, test_id: &str) -> Result<Vec<TestRow>, DomainError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.test_id.trim() == test_id.trim())
            .cloned()
            .collect())
    }

    fn all_rows(&self) -> Result<Vec<TestRow>, DomainError> {
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(id: &str, table: &str) -> TestRow {
        TestRow {
            test_id: id.into(),
            test_type: "no_of_rows".into(),
            main_table_name: table.into(),
            date_column_name: "day".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_test_groups_rows_by_id() {
        let catalog = InMemoryCatalog::new(vec![row("1", "a"), row("2", "b"), row("1", "c")]);
        let def = catalog.find_test("1").unwrap().unwrap();
        assert_eq!(def.test_id, "1");
        assert!(catalog.find_test("9").unwrap().is_none());
        assert_eq!(catalog.test_ids().unwrap(), vec!["1", "2"]);
    }
}

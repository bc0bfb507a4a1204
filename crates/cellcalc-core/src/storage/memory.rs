use crate::error::{CellcalcError, Result};
use cellcalc_engine::engine::{CellId, CellSource};
use dashmap::DashMap;
use std::sync::Arc;

use super::{CellStore, PutOutcome};

/// In-process store. Clones share the same cells.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    cells: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellSource for MemoryStore {
    type Error = CellcalcError;

    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.cells.get(id).map(|entry| entry.value().clone()))
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.cells.iter().map(|entry| entry.key().clone()).collect())
    }
}

impl CellStore for MemoryStore {
    fn put(&self, id: &CellId, formula: &str) -> Result<PutOutcome> {
        match self.cells.insert(id.to_string(), formula.to_string()) {
            Some(_) => Ok(PutOutcome::Updated),
            None => Ok(PutOutcome::Created),
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.cells.remove(id).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.cells.clear();
        Ok(())
    }
}

//! The sheet service: the operations behind each request.
//!
//! A [`Sheet`] owns an injected store handle and, optionally, an evaluator.
//! Reads resolve the target cell into an arithmetic expression and hand it
//! to the evaluator; everything else goes straight to the store.

use crate::error::{CellcalcError, Result};
use crate::solver::Evaluator;
use crate::storage::{CellStore, PutOutcome};
use cellcalc_engine::engine::{CellId, ResolveOptions, ResolvedExpression, find_cycle, resolve};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Computed value of a cell, together with the expression that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellReading {
    pub id: String,
    pub expression: String,
    pub value: String,
}

/// Result of storing a cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PutReport {
    pub outcome: PutOutcome,
    /// Reference cycle reachable from the stored cell, if the check could run.
    pub cycle: Option<Vec<String>>,
}

pub struct Sheet {
    store: Box<dyn CellStore>,
    evaluator: Option<Box<dyn Evaluator>>,
    options: ResolveOptions,
}

impl Sheet {
    pub fn new(store: Box<dyn CellStore>) -> Self {
        Sheet {
            store,
            evaluator: None,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &dyn CellStore {
        self.store.as_ref()
    }

    /// Create or overwrite a cell.
    ///
    /// A formula that closes a reference cycle is still stored; the cycle is
    /// reported, since resolution terminates on it anyway. A failing cycle
    /// check does not fail the write.
    pub fn put(&self, id: &str, formula: &str) -> Result<PutReport> {
        let id = CellId::new(id)?;
        let outcome = self.store.put(&id, formula)?;
        info!(cell = %id, ?outcome, "stored cell");

        let cycle = match self.find_cycle(id.as_str()) {
            Ok(cycle) => cycle,
            Err(err) => {
                debug!(cell = %id, error = %err, "cycle check skipped");
                None
            }
        };
        if let Some(cycle) = &cycle {
            warn!(cell = %id, cycle = %cycle.join(" -> "), "formula closes a reference cycle");
        }
        Ok(PutReport { outcome, cycle })
    }

    /// Reference cycle reachable from `id`, if any.
    pub fn find_cycle(&self, id: &str) -> Result<Option<Vec<String>>> {
        find_cycle(self.store.as_ref(), id)
    }

    /// Expand a cell into an evaluator-ready expression.
    pub fn resolve(&self, id: &str) -> Result<ResolvedExpression> {
        Ok(resolve(self.store.as_ref(), id, &self.options)?)
    }

    /// Resolve a cell and evaluate the resulting expression.
    pub fn read(&self, id: &str) -> Result<CellReading> {
        let resolved = self.resolve(id)?;
        self.evaluate(resolved)
    }

    /// Hand an already resolved expression to the evaluator.
    pub fn evaluate(&self, resolved: ResolvedExpression) -> Result<CellReading> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or_else(|| CellcalcError::Config("no evaluator configured".to_string()))?;
        let value = evaluator.evaluate(&resolved.expression)?;
        Ok(CellReading {
            id: resolved.id,
            expression: resolved.expression,
            value,
        })
    }

    /// Remove a cell. Returns false if it did not exist.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let found = self.store.delete(id)?;
        debug!(cell = id, found, "delete");
        Ok(found)
    }

    /// Ids of all stored cells, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut ids = self.store.list()?;
        ids.sort();
        Ok(ids)
    }

    /// Remove every cell from the store.
    pub fn reset(&self) -> Result<()> {
        self.store.clear()?;
        info!("cleared cell store");
        Ok(())
    }
}

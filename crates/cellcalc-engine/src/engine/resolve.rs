//! Bounded reference expansion.
//!
//! [`resolve`] inlines referenced formulas one occurrence at a time, always
//! the leftmost whole-token match of a known id, until a scan finds nothing
//! left to substitute. The number of substitutions is capped at a multiple of
//! the number of known ids so that cyclic sheets still terminate. Whatever is
//! left unresolved afterwards is neutralized to `0`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use super::neutralize::neutralize;
use super::source::CellSource;
use super::token::first_known;

/// Substitutions allowed per known cell id.
pub const DEFAULT_EXPANSION_FACTOR: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Multiplier applied to the known-id count to get the substitution cap.
    pub expansion_factor: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            expansion_factor: DEFAULT_EXPANSION_FACTOR,
        }
    }
}

impl ResolveOptions {
    /// Maximum number of substitutions for a snapshot of `known_ids` cells.
    pub fn iteration_cap(&self, known_ids: usize) -> usize {
        self.expansion_factor
            .max(1)
            .saturating_mul(known_ids.max(1))
    }
}

/// How the expansion loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expansion {
    /// A full scan found no known reference left.
    Converged,
    /// The substitution cap was reached first (malformed or cyclic sheet).
    Capped,
}

/// Evaluator-ready expression for one cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedExpression {
    pub id: String,
    pub expression: String,
    pub substitutions: usize,
    pub expansion: Expansion,
}

#[derive(Debug, Error)]
pub enum ResolveError<E: std::error::Error + 'static> {
    #[error("cell {0:?} not found")]
    NotFound(String),

    #[error("cell store unavailable: {0}")]
    Source(#[source] E),
}

impl<E: std::error::Error + 'static> ResolveError<E> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}

/// Expand `target` into a self-contained arithmetic expression.
///
/// Fails with [`ResolveError::NotFound`] if the target has no formula, and
/// with [`ResolveError::Source`] if the target lookup or the id snapshot
/// cannot be read. Nested lookups never fail the call: an id that disappears
/// or errors after the snapshot is dropped from the known set and ends up
/// neutralized.
pub fn resolve<S>(
    source: &S,
    target: &str,
    options: &ResolveOptions,
) -> Result<ResolvedExpression, ResolveError<S::Error>>
where
    S: CellSource + ?Sized,
{
    let mut expression = source
        .get(target)
        .map_err(ResolveError::Source)?
        .ok_or_else(|| ResolveError::NotFound(target.to_string()))?;

    let mut known: HashSet<String> = source
        .list()
        .map_err(ResolveError::Source)?
        .into_iter()
        .collect();
    let cap = options.iteration_cap(known.len());

    let mut substitutions = 0usize;
    let mut expansion = Expansion::Converged;

    while let Some((id, span)) =
        first_known(&expression, &known).map(|t| (t.text.to_string(), t.span))
    {
        if substitutions >= cap {
            warn!(
                cell = target,
                cap, "expansion cap reached, neutralizing remaining references"
            );
            expansion = Expansion::Capped;
            break;
        }

        match source.get(&id) {
            Ok(Some(formula)) => {
                expression.replace_range(span, &format!("({formula})"));
                substitutions += 1;
                debug!(cell = target, reference = %id, substitutions, "inlined reference");
            }
            Ok(None) => {
                debug!(cell = target, reference = %id, "reference vanished since snapshot");
                known.remove(&id);
            }
            Err(err) => {
                warn!(cell = target, reference = %id, error = %err, "reference lookup failed");
                known.remove(&id);
            }
        }
    }

    Ok(ResolvedExpression {
        id: target.to_string(),
        expression: neutralize(&expression),
        substitutions,
        expansion,
    })
}

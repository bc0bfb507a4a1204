//! Formula resolution API.
//!
//! This module turns a graph of textual cell references into one
//! evaluator-ready arithmetic expression:
//!
//! - [`CellId`] - Validated, opaque cell identifier
//! - [`CellSource`] - Read-only lookup seam over a cell store
//! - [`tokens`] - Whole-token scanning of formulas
//! - [`resolve`] - Bounded reference expansion
//! - [`neutralize`] - Final pass replacing unresolved symbol runs with `0`
//! - [`find_cycle`] - Reference cycle diagnostics

mod cell_id;
mod cycle;
mod neutralize;
mod resolve;
mod source;
mod token;

pub use cell_id::{CellId, InvalidCellId};
pub use cycle::{find_cycle, references};
pub use neutralize::{is_neutralized, neutralize};
pub use resolve::{
    DEFAULT_EXPANSION_FACTOR, Expansion, ResolveError, ResolveOptions, ResolvedExpression, resolve,
};
pub use source::CellSource;
pub use token::{Token, is_numeric_literal, is_operator, tokens};

//! cellcalc-core - Cell stores, evaluator client and the sheet service.

pub mod error;
pub mod sheet;
pub mod solver;
pub mod storage;

pub use error::{CellcalcError, Result};
pub use sheet::{CellReading, PutReport, Sheet};
pub use solver::{Evaluator, SolverConfig, WolframSolver};
pub use storage::{Backend, CellStore, PutOutcome, StoreConfig};

pub use cellcalc_engine::engine::{CellId, Expansion, ResolveOptions, ResolvedExpression};

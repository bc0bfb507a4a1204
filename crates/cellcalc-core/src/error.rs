//! Error types for cellcalc core.

use cellcalc_engine::engine::{InvalidCellId, ResolveError};
use thiserror::Error;

/// Errors that can occur in the cellcalc store and service layer
#[derive(Error, Debug)]
pub enum CellcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    InvalidCellId(#[from] InvalidCellId),

    #[error("Cell {0:?} not found")]
    NotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned HTTP {status} for {url}")]
    RemoteStatus { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Evaluator returned no result for {expression:?}: {reason}")]
    Evaluation { expression: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cell store lock poisoned")]
    LockPoisoned,

    #[error("Cell store unavailable: {0}")]
    Store(Box<CellcalcError>),
}

impl CellcalcError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CellcalcError::NotFound(_))
    }
}

impl From<ResolveError<CellcalcError>> for CellcalcError {
    fn from(err: ResolveError<CellcalcError>) -> Self {
        match err {
            ResolveError::NotFound(id) => CellcalcError::NotFound(id),
            ResolveError::Source(source) => CellcalcError::Store(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, CellcalcError>;

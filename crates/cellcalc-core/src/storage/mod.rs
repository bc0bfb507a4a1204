//! Cell store backends.
//!
//! Every backend implements [`CellStore`], which extends the engine's
//! read-only [`CellSource`] with writes. The backend in use is picked at
//! startup from a [`StoreConfig`] and handed around as a `Box<dyn CellStore>`.

mod firebase;
mod memory;
mod sqlite;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{CellcalcError, Result};
use cellcalc_engine::engine::{CellId, CellSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Whether a `put` created a new cell or overwrote an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PutOutcome {
    Created,
    Updated,
}

/// A durable mapping from cell id to formula.
pub trait CellStore: CellSource<Error = CellcalcError> + Send + Sync {
    /// Insert or overwrite the formula for `id`.
    fn put(&self, id: &CellId, formula: &str) -> Result<PutOutcome>;

    /// Remove a cell. Returns false if it did not exist.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Remove every cell.
    fn clear(&self) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    Sqlite,
    Firebase,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            "firebase" => Ok(Backend::Firebase),
            other => Err(format!(
                "Unknown backend: {} (expected memory, sqlite or firebase)",
                other
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Memory => "memory",
            Backend::Sqlite => "sqlite",
            Backend::Firebase => "firebase",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Database file for the sqlite backend.
    pub path: PathBuf,
    /// Firebase realtime database name, used to derive its URL.
    pub firebase_name: Option<String>,
    /// Explicit Firebase base URL (takes precedence over `firebase_name`).
    pub firebase_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: Backend::default(),
            path: PathBuf::from("cells.db"),
            firebase_name: None,
            firebase_url: None,
        }
    }
}

/// Open the backend selected by `config`.
pub fn open(config: &StoreConfig) -> Result<Box<dyn CellStore>> {
    let store: Box<dyn CellStore> = match config.backend {
        Backend::Memory => Box::new(MemoryStore::new()),
        Backend::Sqlite => Box::new(SqliteStore::open(&config.path)?),
        Backend::Firebase => {
            let url = match (&config.firebase_url, &config.firebase_name) {
                (Some(url), _) => url.clone(),
                (None, Some(name)) => FirebaseStore::database_url(name),
                (None, None) => {
                    return Err(CellcalcError::Config(
                        "firebase backend needs firebase_url or firebase_name (FBASE)".to_string(),
                    ));
                }
            };
            Box::new(FirebaseStore::new(&url)?)
        }
    };
    info!(backend = %config.backend, "opened cell store");
    Ok(store)
}

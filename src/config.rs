//! Configuration file + environment overrides.
//!
//! Looked up at `<config_dir>/cellcalc/config.toml` unless `--config` names a
//! file. Every section is optional.
//!
//! ```toml
//! [store]
//! backend = "sqlite"        # memory | sqlite | firebase
//! path = "cells.db"
//! firebase_name = "my-sheet"
//!
//! [solver]
//! app_id = "..."
//! timeout_secs = 30
//!
//! [resolver]
//! expansion_factor = 8
//!
//! [logging]
//! level = "warn"
//! ```

use cellcalc_core::{ResolveOptions, SolverConfig, StoreConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the solver API key.
pub const SOLVER_KEY_ENV: &str = "FORMULA_KEY";
/// Environment variable holding the Firebase database name.
pub const FIREBASE_ENV: &str = "FBASE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub solver: SolverConfig,
    pub resolver: ResolveOptions,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `-v` nor `CELLCALC_LOG` is given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("", "", "cellcalc")?;
        Some(proj.config_dir().join("config.toml"))
    }

    /// Load `explicit` (which must exist), or the default file if present.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `FORMULA_KEY` / `FBASE` style overrides from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(SOLVER_KEY_ENV).filter(|v| !v.is_empty()) {
            self.solver.app_id = Some(key);
        }
        if let Some(name) = lookup(FIREBASE_ENV).filter(|v| !v.is_empty()) {
            self.store.firebase_name = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcalc_core::Backend;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store.backend, Backend::Sqlite);
        assert_eq!(config.resolver.expansion_factor, 8);
    }

    #[test]
    fn test_parse_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [store]
            backend = "firebase"
            firebase_name = "sheet"

            [solver]
            app_id = "KEY"
            timeout_secs = 5

            [resolver]
            expansion_factor = 3

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, Backend::Firebase);
        assert_eq!(config.store.firebase_name.as_deref(), Some("sheet"));
        assert_eq!(config.solver.app_id.as_deref(), Some("KEY"));
        assert_eq!(config.solver.timeout_secs, 5);
        assert_eq!(config.resolver.expansion_factor, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[store]\nbackend = \"mongo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(SOLVER_KEY_ENV, "K"), (FIREBASE_ENV, "db")].into();
        let mut config = Config::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.solver.app_id.as_deref(), Some("K"));
        assert_eq!(config.store.firebase_name.as_deref(), Some("db"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.solver.app_id = Some("from-file".to_string());
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.solver.app_id.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.store.backend, Backend::Memory);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}

//! Cell identifiers.
//!
//! Ids are opaque strings, but each one has to be a single formula token so
//! that it can be found again by whole-token matching: non-empty, with no
//! whitespace and none of `( ) + - * /`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::token::is_operator;

/// A validated cell id.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId(String);

/// Returned when a string cannot be used as a cell id.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid cell id {id:?}: {reason}")]
pub struct InvalidCellId {
    pub id: String,
    pub reason: &'static str,
}

impl CellId {
    pub fn new(id: impl Into<String>) -> Result<CellId, InvalidCellId> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("must not be empty")
        } else if id.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else if id.chars().any(is_operator) {
            Some("must not contain operators or parentheses")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidCellId { id, reason }),
            None => Ok(CellId(id)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::str::FromStr for CellId {
    type Err = InvalidCellId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellId::new(s)
    }
}

impl TryFrom<String> for CellId {
    type Error = InvalidCellId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CellId::new(value)
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> String {
        id.0
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

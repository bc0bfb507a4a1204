//! Remote document-database backend (Firebase realtime database REST API).
//!
//! Cells live under `/cells/<id>.json` as `{"id": ..., "formula": ...}`.
//! The service answers HTTP 200 with a JSON `null` body for missing paths,
//! and renders a collection whose keys are mostly sequential integers as a
//! JSON array with `null` holes.

use crate::error::{CellcalcError, Result};
use cellcalc_engine::engine::{CellId, CellSource, InvalidCellId};
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::{CellStore, PutOutcome};

#[derive(Debug, Serialize, Deserialize)]
struct CellDocument {
    id: String,
    formula: String,
}

/// Characters Firebase does not allow in a key.
const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '$', '#', '[', ']'];

/// Body of `GET /cells.json`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellCollection {
    Keyed(BTreeMap<String, CellDocument>),
    Indexed(Vec<Option<CellDocument>>),
}

impl CellCollection {
    fn into_ids(self) -> Vec<String> {
        match self {
            CellCollection::Keyed(docs) => docs.into_values().map(|doc| doc.id).collect(),
            CellCollection::Indexed(docs) => docs.into_iter().flatten().map(|doc| doc.id).collect(),
        }
    }
}

fn check_key(id: &CellId) -> Result<()> {
    if id.as_str().contains(FORBIDDEN_KEY_CHARS) {
        return Err(InvalidCellId {
            id: id.to_string(),
            reason: "must not contain . $ # [ or ] with the firebase backend",
        }
        .into());
    }
    Ok(())
}

/// Blocking Firebase client (no Tokio runtime required).
#[derive(Clone)]
pub struct FirebaseStore {
    http: Client,
    base_url: Url,
}

impl FirebaseStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CellcalcError::Config(format!("invalid firebase URL {base_url}: {e}")))?;
        let http = Client::builder()
            .user_agent(format!("cellcalc/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(FirebaseStore { http, base_url })
    }

    /// Default URL of a named realtime database.
    pub fn database_url(name: &str) -> String {
        format!("https://{name}-default-rtdb.europe-west1.firebasedatabase.app")
    }

    pub fn cell_url(&self, id: &str) -> Result<Url> {
        let leaf = format!("{id}.json");
        self.endpoint(&["cells", &leaf])
    }

    pub fn cells_url(&self) -> Result<Url> {
        self.endpoint(&["cells.json"])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CellcalcError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn fetch(&self, id: &str) -> Result<Option<CellDocument>> {
        let url = self.cell_url(id)?;
        let response = self.http.get(url.clone()).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(ensure_success(response, &url)?.json::<Option<CellDocument>>()?)
    }
}

fn ensure_success(response: Response, url: &Url) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(CellcalcError::RemoteStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        })
    }
}

impl CellSource for FirebaseStore {
    type Error = CellcalcError;

    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.fetch(id)?.map(|doc| doc.formula))
    }

    fn list(&self) -> Result<Vec<String>> {
        let url = self.cells_url()?;
        let response = ensure_success(self.http.get(url.clone()).send()?, &url)?;
        let docs = response.json::<Option<CellCollection>>()?;
        Ok(docs.map(CellCollection::into_ids).unwrap_or_default())
    }
}

impl CellStore for FirebaseStore {
    fn put(&self, id: &CellId, formula: &str) -> Result<PutOutcome> {
        check_key(id)?;
        let existed = self.fetch(id.as_str())?.is_some();
        let url = self.cell_url(id.as_str())?;
        let doc = CellDocument {
            id: id.to_string(),
            formula: formula.to_string(),
        };
        ensure_success(self.http.put(url.clone()).json(&doc).send()?, &url)?;
        debug!(cell = %id, existed, "wrote firebase document");

        Ok(if existed {
            PutOutcome::Updated
        } else {
            PutOutcome::Created
        })
    }

    fn delete(&self, id: &str) -> Result<bool> {
        if self.fetch(id)?.is_none() {
            return Ok(false);
        }
        let url = self.cell_url(id)?;
        ensure_success(self.http.delete(url.clone()).send()?, &url)?;
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let url = self.cells_url()?;
        ensure_success(self.http.delete(url.clone()).send()?, &url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url() {
        assert_eq!(
            FirebaseStore::database_url("sheet"),
            "https://sheet-default-rtdb.europe-west1.firebasedatabase.app"
        );
    }

    #[test]
    fn test_cell_urls() {
        let store = FirebaseStore::new("https://example.test/").unwrap();
        assert_eq!(
            store.cell_url("A1").unwrap().as_str(),
            "https://example.test/cells/A1.json"
        );
        assert_eq!(
            store.cells_url().unwrap().as_str(),
            "https://example.test/cells.json"
        );
    }

    #[test]
    fn test_cell_url_escapes_id() {
        let store = FirebaseStore::new("https://example.test/db").unwrap();
        assert_eq!(
            store.cell_url("a#b").unwrap().as_str(),
            "https://example.test/db/cells/a%23b.json"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            FirebaseStore::new("not a url"),
            Err(CellcalcError::Config(_))
        ));
    }

    #[test]
    fn test_document_json_shape() {
        let doc: Option<CellDocument> = serde_json::from_str("null").unwrap();
        assert!(doc.is_none());
        let doc: CellDocument =
            serde_json::from_str(r#"{"id":"A","formula":"1+2"}"#).unwrap();
        assert_eq!(doc.formula, "1+2");
    }

    #[test]
    fn test_collection_keyed_by_name() {
        let body = r#"{"A":{"id":"A","formula":"1"},"B":{"id":"B","formula":"A"}}"#;
        let docs: Option<CellCollection> = serde_json::from_str(body).unwrap();
        assert_eq!(docs.unwrap().into_ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_collection_rendered_as_array() {
        let body = r#"[null, {"id":"1","formula":"5"}, {"id":"2","formula":"1+1"}]"#;
        let docs: Option<CellCollection> = serde_json::from_str(body).unwrap();
        assert_eq!(docs.unwrap().into_ids(), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_collection_is_null() {
        let docs: Option<CellCollection> = serde_json::from_str("null").unwrap();
        assert!(docs.is_none());
    }

    #[test]
    fn test_put_rejects_forbidden_key_before_any_request() {
        // Unroutable base URL: a request would fail with an HTTP error instead.
        let store = FirebaseStore::new("http://127.0.0.1:9/").unwrap();
        for bad in ["x.y", "a$b", "h#1", "v[0]"] {
            let id = CellId::new(bad).unwrap();
            let err = store.put(&id, "1").unwrap_err();
            assert!(
                matches!(err, CellcalcError::InvalidCellId(_)),
                "unexpected error for {bad}: {err}"
            );
        }
    }
}

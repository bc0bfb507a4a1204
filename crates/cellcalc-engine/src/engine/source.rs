use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::hash::BuildHasher;

/// Read-only view of a cell store, as seen by the resolver.
///
/// Implementations only need point-in-time reads: a `get` issued after a
/// write for the same id must observe the new formula, nothing more.
pub trait CellSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Formula stored for `id`, or `None` if there is no such cell.
    fn get(&self, id: &str) -> Result<Option<String>, Self::Error>;

    /// Ids of every cell currently stored.
    fn list(&self) -> Result<Vec<String>, Self::Error>;
}

impl<T: CellSource + ?Sized> CellSource for &T {
    type Error = T::Error;

    fn get(&self, id: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        (**self).list()
    }
}

impl<H: BuildHasher> CellSource for HashMap<String, String, H> {
    type Error = Infallible;

    fn get(&self, id: &str) -> Result<Option<String>, Self::Error> {
        Ok(HashMap::get(self, id).cloned())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.keys().cloned().collect())
    }
}

impl CellSource for BTreeMap<String, String> {
    type Error = Infallible;

    fn get(&self, id: &str) -> Result<Option<String>, Self::Error> {
        Ok(BTreeMap::get(self, id).cloned())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.keys().cloned().collect())
    }
}

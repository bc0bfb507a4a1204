use std::collections::HashSet;

use super::source::CellSource;
use super::token::tokens;

/// Whole-token references to `known` ids in a formula, in order of
/// appearance. Repeated references are kept.
pub fn references<'a>(formula: &'a str, known: &HashSet<String>) -> Vec<&'a str> {
    tokens(formula)
        .map(|t| t.text)
        .filter(|text| known.contains(*text))
        .collect()
}

/// Detect a reference cycle reachable from `start`.
/// Returns Some(cycle) with the first id repeated at the end, None otherwise.
pub fn find_cycle<S: CellSource + ?Sized>(
    source: &S,
    start: &str,
) -> Result<Option<Vec<String>>, S::Error> {
    let known: HashSet<String> = source.list()?.into_iter().collect();
    let mut visiting = HashSet::new();
    let mut finished = HashSet::new();
    let mut path = Vec::new();

    if find_cycle_dfs(source, start, &known, &mut visiting, &mut finished, &mut path)? {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

fn find_cycle_dfs<S: CellSource + ?Sized>(
    source: &S,
    current: &str,
    known: &HashSet<String>,
    visiting: &mut HashSet<String>,
    finished: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Result<bool, S::Error> {
    if visiting.contains(current) {
        // Keep only the part of the path that forms the loop.
        if let Some(pos) = path.iter().position(|id| id == current) {
            path.drain(..pos);
        }
        path.push(current.to_string());
        return Ok(true);
    }
    if finished.contains(current) {
        return Ok(false);
    }

    let Some(formula) = source.get(current)? else {
        return Ok(false);
    };

    visiting.insert(current.to_string());
    path.push(current.to_string());

    for dep in references(&formula, known) {
        if find_cycle_dfs(source, dep, known, visiting, finished, path)? {
            return Ok(true);
        }
    }

    path.pop();
    visiting.remove(current);
    finished.insert(current.to_string());
    Ok(false)
}

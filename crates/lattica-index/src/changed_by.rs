//! Changed-by index
//!
//! Maps `environment@@author` to the ordered, duplicate-free list of element
//! ids last attributed to that author in that environment. Authorship comes
//! from the `_changed_by` core annotation, falling back to a sentinel for
//! unattributed elements.

use lattica_core::schema::{AUTHOR_KEY_SEPARATOR, CHANGED_BY, UNKNOWN_AUTHOR};
use lattica_core::{Change, DiagnosticObserver, ElemId, Element, Value};
use lattica_store::{ElementSource, RemoteMap};

use crate::errors::Result;
use crate::runner::refresh_changes;

pub const CHANGED_BY_INDEX_VERSION: u32 = 1;
pub const CHANGED_BY_INDEX_KEY: &str = "changed_by_index";

/// Index key attributing an element state to its author in an environment
fn author_key(env_name: &str, element: &Element) -> String {
    let author = element
        .annotations()
        .get(CHANGED_BY)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_AUTHOR);
    format!("{}{}{}", env_name, AUTHOR_KEY_SEPARATOR, author)
}

fn apply_addition(
    after: &Element,
    env_name: &str,
    index: &mut dyn RemoteMap<Vec<ElemId>>,
) -> Result<()> {
    let key = author_key(env_name, after);
    let mut element_ids = index.get(&key)?.unwrap_or_default();
    if !element_ids.contains(after.elem_id()) {
        element_ids.push(after.elem_id().clone());
        index.set(&key, element_ids)?;
    }
    Ok(())
}

fn apply_removal(
    before: &Element,
    env_name: &str,
    index: &mut dyn RemoteMap<Vec<ElemId>>,
) -> Result<()> {
    // Attribution is read from the removed state, never re-resolved
    let key = author_key(env_name, before);
    if let Some(mut element_ids) = index.get(&key)? {
        element_ids.retain(|elem_id| elem_id != before.elem_id());
        index.set(&key, element_ids)?;
    }
    Ok(())
}

fn apply_change(
    change: &Change,
    env_name: &str,
    index: &mut dyn RemoteMap<Vec<ElemId>>,
) -> Result<()> {
    match change {
        Change::Addition { after } => apply_addition(after, env_name, index),
        Change::Removal { before } => apply_removal(before, env_name, index),
        // Each side computes its own author key, so an element moving
        // between authors is re-registered under the new one
        Change::Modification { before, after } => {
            apply_addition(after, env_name, index)?;
            apply_removal(before, env_name, index)
        }
    }
}

/// Apply a change batch to the changed-by index
///
/// Follows the versioned update protocol: a stored-version mismatch widens
/// the batch to every element in `source` and clears the map first;
/// an invalid cache clears the map and replays only the supplied batch.
///
/// # Errors
///
/// Propagates backing-store failures; a failed call leaves the bookkeeping
/// such that the next call rebuilds.
#[allow(clippy::too_many_arguments)]
pub fn update_changed_by_index(
    changes: Vec<Change>,
    index: &mut dyn RemoteMap<Vec<ElemId>>,
    versions: &mut dyn RemoteMap<u32>,
    source: &dyn ElementSource,
    is_cache_valid: bool,
    env_name: &str,
    observer: &mut dyn DiagnosticObserver,
) -> Result<()> {
    let relevant_changes = refresh_changes(
        CHANGED_BY_INDEX_KEY,
        CHANGED_BY_INDEX_VERSION,
        changes,
        index,
        versions,
        source,
        is_cache_valid,
        observer,
    )?;
    for change in &relevant_changes {
        apply_change(change, env_name, index)?;
    }
    tracing::debug!(
        index = CHANGED_BY_INDEX_KEY,
        changes = relevant_changes.len(),
        "updated changed by index"
    );
    Ok(())
}

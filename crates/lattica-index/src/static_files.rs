//! Static-file reference index
//!
//! Maps an element's full name to the de-duplicated list of static file
//! paths referenced anywhere in its value tree. Elements without references
//! have no entry - an empty list is never stored.

use lattica_core::{Change, DiagnosticObserver, Element, Value, WalkStep};
use lattica_store::{ElementSource, RemoteMap};

use crate::errors::Result;
use crate::runner::refresh_changes;

pub const STATIC_FILES_INDEX_VERSION: u32 = 1;
pub const STATIC_FILES_INDEX_KEY: &str = "static_files_index";

/// File paths referenced by static-file placeholders anywhere in `element`
///
/// First-seen order, duplicates dropped. Pure function of the element, so
/// callers are free to compute paths for independent elements in parallel.
pub fn static_file_paths(element: &Element) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    element.walk_values(&mut |value| {
        if let Value::StaticFile(file) = value {
            if !paths.contains(&file.filepath) {
                paths.push(file.filepath.clone());
            }
        }
        WalkStep::Recurse
    });
    paths
}

fn apply_changes(
    changes: &[Change],
    index: &mut dyn RemoteMap<Vec<String>>,
) -> Result<()> {
    let mut to_set = Vec::new();
    let mut to_delete = Vec::new();
    for change in changes {
        if change.is_addition_or_modification() {
            let element = change.data();
            let paths = static_file_paths(element);
            let key = element.elem_id().full_name();
            if paths.is_empty() {
                to_delete.push(key);
            } else {
                to_set.push((key, paths));
            }
        } else if let Some(before) = change.before() {
            // Removals always drop the entry, whatever its last paths were
            to_delete.push(before.elem_id().full_name());
        }
    }
    index.set_all(to_set)?;
    index.delete_all(to_delete)?;
    Ok(())
}

/// Apply a change batch to the static-file reference index
///
/// Follows the versioned update protocol; see
/// [`crate::runner::refresh_changes`].
///
/// # Errors
///
/// Propagates backing-store failures; a failed call leaves the bookkeeping
/// such that the next call rebuilds.
pub fn update_static_files_index(
    changes: Vec<Change>,
    index: &mut dyn RemoteMap<Vec<String>>,
    versions: &mut dyn RemoteMap<u32>,
    source: &dyn ElementSource,
    is_cache_valid: bool,
    observer: &mut dyn DiagnosticObserver,
) -> Result<()> {
    let relevant_changes = refresh_changes(
        STATIC_FILES_INDEX_KEY,
        STATIC_FILES_INDEX_VERSION,
        changes,
        index,
        versions,
        source,
        is_cache_valid,
        observer,
    )?;
    apply_changes(&relevant_changes, index)?;
    tracing::debug!(
        index = STATIC_FILES_INDEX_KEY,
        changes = relevant_changes.len(),
        "updated static files index"
    );
    Ok(())
}

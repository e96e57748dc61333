//! Versioned index update protocol
//!
//! Every persisted index carries a schema version in a shared version map.
//! On version mismatch the supplied change batch is widened to cover every
//! element in the source; on mismatch or an invalid cache the index map is
//! cleared and the version rewritten - strictly before any rebuild write, so
//! an interrupted rebuild is never mistaken for a current index.

use lattica_core::{Change, DiagnosticObserver, RebuildReason};
use lattica_store::{ElementSource, RemoteMap};

use crate::errors::Result;

/// Every element in the source reprojected as an Addition, followed by the
/// originally supplied changes so in-flight changes still apply last
fn all_element_changes(
    current_changes: Vec<Change>,
    source: &dyn ElementSource,
) -> Result<Vec<Change>> {
    let mut changes = Vec::new();
    for element in source.get_all()? {
        changes.push(Change::Addition { after: element? });
    }
    changes.extend(current_changes);
    Ok(changes)
}

/// Decide what an index update has to process, maintaining its bookkeeping
///
/// Returns the change list the caller must apply: the supplied batch when
/// the stored version matches and the cache is valid, otherwise the widened
/// rebuild batch. Clearing and the version bump happen here, never after the
/// caller starts writing.
#[allow(clippy::too_many_arguments)]
pub fn refresh_changes<V>(
    index_name: &str,
    current_version: u32,
    changes: Vec<Change>,
    index: &mut dyn RemoteMap<V>,
    versions: &mut dyn RemoteMap<u32>,
    source: &dyn ElementSource,
    is_cache_valid: bool,
    observer: &mut dyn DiagnosticObserver,
) -> Result<Vec<Change>> {
    let stored = versions.get(index_name)?;
    let is_version_match = stored == Some(current_version);
    if is_version_match && is_cache_valid {
        return Ok(changes);
    }

    let relevant_changes = if is_version_match {
        changes
    } else {
        observer.index_rebuild(
            index_name,
            &RebuildReason::VersionMismatch {
                stored,
                current: current_version,
            },
        );
        all_element_changes(changes, source)?
    };
    if !is_cache_valid {
        observer.index_rebuild(index_name, &RebuildReason::CacheInvalid);
    }

    index.clear()?;
    versions.set(index_name, current_version)?;
    Ok(relevant_changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattica_core::{ElemId, Element, InstanceElement, RecordingObserver, Value};
    use lattica_store::{InMemoryElementSource, InMemoryRemoteMap};

    fn instance(name: &str) -> Element {
        Element::from(
            InstanceElement::new(name, &ElemId::new("test", "obj"), Value::empty_map()).unwrap(),
        )
    }

    fn addition(name: &str) -> Change {
        Change::Addition {
            after: instance(name),
        }
    }

    #[test]
    fn test_matching_version_and_valid_cache_passes_changes_through() {
        let mut index: InMemoryRemoteMap<u32> = InMemoryRemoteMap::new();
        let mut versions = InMemoryRemoteMap::new();
        versions.set("idx", 3).unwrap();
        index.set("stale", 9).unwrap();
        let source = InMemoryElementSource::new(vec![instance("in_source")]);
        let mut observer = RecordingObserver::default();

        let relevant = refresh_changes(
            "idx",
            3,
            vec![addition("supplied")],
            &mut index,
            &mut versions,
            &source,
            true,
            &mut observer,
        )
        .unwrap();

        assert_eq!(relevant.len(), 1);
        assert!(observer.rebuilds.is_empty());
        // Neither cleared nor rewritten
        assert_eq!(index.get("stale").unwrap(), Some(9));
    }

    #[test]
    fn test_version_mismatch_widens_changes_and_resets_bookkeeping() {
        let mut index: InMemoryRemoteMap<u32> = InMemoryRemoteMap::new();
        index.set("stale", 9).unwrap();
        let mut versions = InMemoryRemoteMap::new();
        versions.set("idx", 0).unwrap();
        let source =
            InMemoryElementSource::new(vec![instance("first"), instance("second")]);
        let mut observer = RecordingObserver::default();

        let relevant = refresh_changes(
            "idx",
            1,
            vec![addition("supplied")],
            &mut index,
            &mut versions,
            &source,
            true,
            &mut observer,
        )
        .unwrap();

        // Full element set first, supplied changes last
        assert_eq!(relevant.len(), 3);
        assert_eq!(
            relevant[2].data().elem_id().full_name(),
            "test.obj.instance.supplied"
        );
        assert_eq!(index.get("stale").unwrap(), None);
        assert_eq!(versions.get("idx").unwrap(), Some(1));
        assert_eq!(observer.rebuilds.len(), 1);
    }

    #[test]
    fn test_invalid_cache_clears_without_rescanning_source() {
        let mut index: InMemoryRemoteMap<u32> = InMemoryRemoteMap::new();
        index.set("stale", 9).unwrap();
        let mut versions = InMemoryRemoteMap::new();
        versions.set("idx", 1).unwrap();
        let source = InMemoryElementSource::new(vec![instance("in_source")]);
        let mut observer = RecordingObserver::default();

        let relevant = refresh_changes(
            "idx",
            1,
            vec![addition("supplied")],
            &mut index,
            &mut versions,
            &source,
            false,
            &mut observer,
        )
        .unwrap();

        // Only the supplied batch is reapplied over the cleared map
        assert_eq!(relevant.len(), 1);
        assert_eq!(index.get("stale").unwrap(), None);
        assert_eq!(versions.get("idx").unwrap(), Some(1));
        assert!(matches!(
            observer.rebuilds[0].1,
            lattica_core::RebuildReason::CacheInvalid
        ));
    }

    #[test]
    fn test_missing_version_counts_as_mismatch() {
        let mut index: InMemoryRemoteMap<u32> = InMemoryRemoteMap::new();
        let mut versions = InMemoryRemoteMap::new();
        let source = InMemoryElementSource::new(vec![instance("in_source")]);
        let mut observer = RecordingObserver::default();

        let relevant = refresh_changes(
            "idx",
            1,
            Vec::new(),
            &mut index,
            &mut versions,
            &source,
            true,
            &mut observer,
        )
        .unwrap();

        assert_eq!(relevant.len(), 1);
        assert_eq!(versions.get("idx").unwrap(), Some(1));
    }
}

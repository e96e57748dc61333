// Integration tests for the static-file reference index
// Covers path extraction by recursive walk, the no-empty-entry rule,
// removals, idempotent re-application, and the rebuild protocol.

use lattica_core::{
    Change, ElemId, Element, InstanceElement, NullObserver, StaticFileRef, Value,
};
use lattica_index::{static_file_paths, update_static_files_index, STATIC_FILES_INDEX_KEY};
use lattica_store::{InMemoryElementSource, InMemoryRemoteMap, RemoteMap};

fn instance_with_value(name: &str, value: Value) -> Element {
    Element::from(
        InstanceElement::new(name, &ElemId::new("salesforce", "Report"), value).unwrap(),
    )
}

fn update(
    changes: Vec<Change>,
    index: &mut InMemoryRemoteMap<Vec<String>>,
    versions: &mut InMemoryRemoteMap<u32>,
    source: &InMemoryElementSource,
) {
    update_static_files_index(changes, index, versions, source, true, &mut NullObserver)
        .unwrap();
}

#[test]
fn test_paths_found_anywhere_in_the_value_tree_deduplicated() {
    let mut element = instance_with_value(
        "report",
        Value::from_entries([
            (
                "attachments",
                Value::List(vec![
                    Value::StaticFile(StaticFileRef::new("logo.png", "h1")),
                    Value::StaticFile(StaticFileRef::new("body.html", "h2")),
                ]),
            ),
            (
                "layout",
                Value::from_entries([(
                    "header",
                    Value::StaticFile(StaticFileRef::new("logo.png", "h1")),
                )]),
            ),
        ]),
    );
    element.annotations_mut().insert(
        "template".to_string(),
        Value::StaticFile(StaticFileRef::new("template.xml", "h3")),
    );

    assert_eq!(
        static_file_paths(&element),
        vec![
            "template.xml".to_string(),
            "logo.png".to_string(),
            "body.html".to_string(),
        ]
    );
}

#[test]
fn test_addition_without_static_files_creates_no_entry() {
    let mut index = InMemoryRemoteMap::new();
    let mut versions = InMemoryRemoteMap::new();
    let source = InMemoryElementSource::default();
    let element = instance_with_value(
        "plain",
        Value::from_entries([("title", Value::from("no files here"))]),
    );
    let key = element.elem_id().full_name();

    update(
        vec![Change::Addition { after: element }],
        &mut index,
        &mut versions,
        &source,
    );

    assert_eq!(index.get(&key).unwrap(), None);
}

#[test]
fn test_modification_adding_a_file_creates_the_entry() {
    let mut index = InMemoryRemoteMap::new();
    let mut versions = InMemoryRemoteMap::new();
    let source = InMemoryElementSource::default();
    let before = instance_with_value("report", Value::empty_map());
    let key = before.elem_id().full_name();

    update(
        vec![Change::Addition {
            after: before.clone(),
        }],
        &mut index,
        &mut versions,
        &source,
    );
    assert_eq!(index.get(&key).unwrap(), None);

    let after = instance_with_value(
        "report",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("chart.png", "h1")),
        )]),
    );
    update(
        vec![Change::Modification { before, after }],
        &mut index,
        &mut versions,
        &source,
    );

    assert_eq!(
        index.get(&key).unwrap(),
        Some(vec!["chart.png".to_string()])
    );
}

#[test]
fn test_modification_dropping_all_files_deletes_the_entry() {
    let mut index = InMemoryRemoteMap::new();
    let mut versions = InMemoryRemoteMap::new();
    let source = InMemoryElementSource::default();
    let before = instance_with_value(
        "report",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("chart.png", "h1")),
        )]),
    );
    let key = before.elem_id().full_name();

    update(
        vec![Change::Addition {
            after: before.clone(),
        }],
        &mut index,
        &mut versions,
        &source,
    );
    assert!(index.get(&key).unwrap().is_some());

    let after = instance_with_value("report", Value::empty_map());
    update(
        vec![Change::Modification { before, after }],
        &mut index,
        &mut versions,
        &source,
    );

    // An element with no references has no entry, not an empty list
    assert_eq!(index.get(&key).unwrap(), None);
}

#[test]
fn test_removal_deletes_the_entry_regardless_of_paths() {
    let mut index = InMemoryRemoteMap::new();
    let mut versions = InMemoryRemoteMap::new();
    let source = InMemoryElementSource::default();
    let element = instance_with_value(
        "report",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("chart.png", "h1")),
        )]),
    );
    let key = element.elem_id().full_name();

    update(
        vec![Change::Addition {
            after: element.clone(),
        }],
        &mut index,
        &mut versions,
        &source,
    );
    update(
        vec![Change::Removal { before: element }],
        &mut index,
        &mut versions,
        &source,
    );

    assert_eq!(index.get(&key).unwrap(), None);
}

#[test]
fn test_reapplying_a_batch_leaves_the_index_unchanged() {
    let mut index = InMemoryRemoteMap::new();
    let mut versions = InMemoryRemoteMap::new();
    let source = InMemoryElementSource::default();
    let element = instance_with_value(
        "report",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("chart.png", "h1")),
        )]),
    );
    let key = element.elem_id().full_name();
    let batch = vec![Change::Addition {
        after: element,
    }];

    update(batch.clone(), &mut index, &mut versions, &source);
    let after_first = index.get(&key).unwrap();
    update(batch, &mut index, &mut versions, &source);

    assert_eq!(index.get(&key).unwrap(), after_first);
}

#[test]
fn test_version_mismatch_rebuilds_from_the_element_source() {
    let mut index = InMemoryRemoteMap::new();
    index.set("stale.key", vec!["gone.txt".to_string()]).unwrap();
    let mut versions = InMemoryRemoteMap::new();
    versions.set(STATIC_FILES_INDEX_KEY, 0).unwrap();

    let indexed = instance_with_value(
        "existing",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("old.png", "h1")),
        )]),
    );
    let source = InMemoryElementSource::new(vec![indexed.clone()]);
    let supplied = instance_with_value(
        "incoming",
        Value::from_entries([(
            "attachment",
            Value::StaticFile(StaticFileRef::new("new.png", "h2")),
        )]),
    );

    update(
        vec![Change::Addition {
            after: supplied.clone(),
        }],
        &mut index,
        &mut versions,
        &source,
    );

    assert_eq!(index.get("stale.key").unwrap(), None);
    assert_eq!(versions.get(STATIC_FILES_INDEX_KEY).unwrap(), Some(1));
    assert_eq!(
        index.get(&indexed.elem_id().full_name()).unwrap(),
        Some(vec!["old.png".to_string()])
    );
    assert_eq!(
        index.get(&supplied.elem_id().full_name()).unwrap(),
        Some(vec!["new.png".to_string()])
    );
}

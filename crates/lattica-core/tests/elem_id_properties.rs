// Property tests for the identifier grammar
// The dotted full name must be a lossless encoding for every well-formed id,
// and nesting must be undone exactly by taking the parent.

use proptest::prelude::*;

use lattica_core::{ElemId, ElemIdKind};

fn sub_kind() -> impl Strategy<Value = ElemIdKind> {
    prop_oneof![
        Just(ElemIdKind::Field),
        Just(ElemIdKind::Instance),
        Just(ElemIdKind::Attr),
    ]
}

proptest! {
    #[test]
    fn type_and_config_ids_round_trip(
        namespace in "[a-z][a-z0-9_]{0,8}",
        type_name in "[a-z][a-z0-9_]{0,8}",
    ) {
        let type_id = ElemId::new(&namespace, &type_name);
        prop_assert_eq!(
            ElemId::from_full_name(&type_id.full_name()).unwrap(),
            type_id
        );

        let config_id = ElemId::config(&namespace);
        prop_assert_eq!(
            ElemId::from_full_name(&config_id.full_name()).unwrap(),
            config_id
        );
    }

    #[test]
    fn nested_ids_round_trip(
        namespace in "[a-z][a-z0-9_]{0,8}",
        type_name in "[a-z][a-z0-9_]{0,8}",
        kind in sub_kind(),
        parts in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..4),
    ) {
        let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let nested = ElemId::new(&namespace, &type_name)
            .create_nested_id(kind, &part_refs)
            .unwrap();
        prop_assert_eq!(
            ElemId::from_full_name(&nested.full_name()).unwrap(),
            nested
        );
    }

    #[test]
    fn nesting_is_undone_by_parent(
        namespace in "[a-z][a-z0-9_]{0,8}",
        type_name in "[a-z][a-z0-9_]{0,8}",
        kind in sub_kind(),
        top_name in "[a-z][a-z0-9_]{0,8}",
        nested_name in "[a-z][a-z0-9_]{0,8}",
    ) {
        let top = ElemId::new(&namespace, &type_name)
            .create_nested_id(kind, &[&top_name])
            .unwrap();
        let nested = top.create_nested_id(kind, &[&nested_name]).unwrap();
        prop_assert_eq!(nested.create_parent_id(), top);
    }

    #[test]
    fn top_level_parent_reassembles_the_id(
        namespace in "[a-z][a-z0-9_]{0,8}",
        type_name in "[a-z][a-z0-9_]{0,8}",
        parts in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 2..5),
    ) {
        let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let id = ElemId::new(&namespace, &type_name)
            .create_nested_id(ElemIdKind::Instance, &part_refs)
            .unwrap();
        let (parent, path) = id.create_top_level_parent_id();
        prop_assert!(parent.is_top_level());
        prop_assert_eq!(path.len(), parts.len() - 1);
        let path_refs: Vec<&str> = path.iter().map(String::as_str).collect();
        prop_assert_eq!(
            parent.create_nested_id(ElemIdKind::Instance, &path_refs).unwrap(),
            id
        );
    }
}

use cldownload_core::contract::RemoteNode;
use cldownload_core::error::TreeError;
use cldownload_core::identity::{canonical_id, IdentityMode};
use cldownload_core::tree::Tree;

/// The hierarchy used across these tests:
///
/// Notes (F1)
///   doc1 (A)
///   doc2 (B)        empty folder
///   Archive (F2)
///     old (C)
/// solo (X)
fn sample(mode: IdentityMode) -> Tree {
    Tree::from_remote(
        Some("/out/".into()),
        vec![
            RemoteNode::folder(
                "F1",
                "Notes",
                vec![
                    RemoteNode::file("A", "doc1"),
                    RemoteNode::folder("B", "doc2", vec![]),
                    RemoteNode::folder("F2", "Archive", vec![RemoteNode::file("C", "old")]),
                ],
            ),
            RemoteNode::file("X", "solo"),
        ],
        mode,
    )
}

#[test]
fn path_segments_follow_name_mode() {
    let tree = sample(IdentityMode::ByName);
    let found = tree.find_node("old").expect("old should be found");
    assert_eq!(found.segments, vec!["Notes", "Archive", "old"]);
    assert_eq!(found.node.id(), Some("C"));
}

#[test]
fn path_segments_follow_id_mode() {
    let tree = sample(IdentityMode::ById);
    let found = tree.find_node("C").expect("C should be found");
    assert_eq!(found.segments, vec!["F1", "F2", "C"]);
    assert!(tree.find_node("old").is_err(), "names are not keys in id mode");
}

#[test]
fn segment_count_equals_depth() {
    let tree = sample(IdentityMode::ByName);
    let cases = [("Notes", 1), ("solo", 1), ("doc1", 2), ("doc2", 2), ("Archive", 2), ("old", 3)];
    for (identifier, depth) in cases {
        let found = tree.find_node(identifier).unwrap();
        assert_eq!(found.segments.len(), depth, "depth of {identifier}");
        assert_eq!(found.segments.last().map(String::as_str), Some(identifier));
        assert_eq!(canonical_id(found.node, tree.mode()), identifier);
    }
}

#[test]
fn root_is_found_by_its_label_with_no_segments() {
    let tree = sample(IdentityMode::ByName);
    let found = tree.find_node("/out/").unwrap();
    assert!(found.segments.is_empty());
    assert_eq!(found.node.children().len(), 2);
    assert_eq!(tree.root_label(), Some("/out/"));
}

#[test]
fn missing_identifier_is_not_found() {
    let tree = sample(IdentityMode::ByName);
    match tree.find_node("nowhere") {
        Err(TreeError::NotFound { identifier }) => assert_eq!(identifier, "nowhere"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn empty_folder_is_found_and_stays_a_folder() {
    let tree = sample(IdentityMode::ByName);
    let found = tree.find_node("doc2").unwrap();
    assert!(found.node.is_folder());
    assert!(found.node.children().is_empty());
}

#[test]
fn duplicate_keys_resolve_to_first_pre_order_match() {
    let tree = Tree::from_remote(
        None,
        vec![
            RemoteNode::folder("F1", "Outer", vec![RemoteNode::file("A", "dup")]),
            RemoteNode::file("B", "dup"),
        ],
        IdentityMode::ByName,
    );
    let found = tree.find_node("dup").unwrap();
    assert_eq!(found.node.id(), Some("A"));
    assert_eq!(found.segments, vec!["Outer", "dup"]);
}

#[test]
fn parent_is_tested_before_its_children() {
    let tree = Tree::from_remote(
        None,
        vec![RemoteNode::folder("F1", "same", vec![RemoteNode::file("A", "same")])],
        IdentityMode::ByName,
    );
    let found = tree.find_node("same").unwrap();
    assert!(found.node.is_folder());
    assert_eq!(found.segments, vec!["same"]);
}

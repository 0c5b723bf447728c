use callform::{Component, Dimension, NodePath, ParamType, Raw, TreeError, ValueTree};
use serde_json::json;

fn path(s: &str) -> NodePath {
    s.parse().expect("path")
}

fn text(tree: &ValueTree, at: &str) -> String {
    tree.get(&path(at))
        .and_then(|node| node.as_scalar())
        .map(|leaf| leaf.raw().to_string())
        .expect("leaf")
}

#[test]
fn fixed_array_seed_is_padded_to_declared_length() {
    let mut tree = ValueTree::from_type("uint256[5]", &[], Some(&json!(["1", "2", "3"])));
    let array = tree.root().as_array().expect("array");
    assert_eq!(array.len(), 5);
    assert_eq!(text(&tree, "[0]"), "1");
    assert_eq!(text(&tree, "[2]"), "3");
    assert_eq!(text(&tree, "[3]"), "");
    assert_eq!(text(&tree, "[4]"), "");

    tree.validate_all();
    assert_eq!(tree.validity(), Some(false), "two items still empty");
    tree.set_leaf(&path("[3]"), "4").expect("set");
    tree.set_leaf(&path("[4]"), "5").expect("set");
    assert!(tree.is_ready());
}

#[test]
fn fixed_array_seed_is_truncated() {
    let tree = ValueTree::from_type("bool[2]", &[], Some(&json!([true, false, true])));
    assert_eq!(tree.root().as_array().expect("array").len(), 2);
}

#[test]
fn untouched_tuple_field_keeps_tuple_invalid() {
    let components = vec![
        Component::new("owner", "address"),
        Component::new("active", "bool"),
    ];
    let mut tree = ValueTree::from_type("tuple", &components, None);
    assert_eq!(tree.get(&path("active")).and_then(|n| n.validity()), None);

    tree.set_leaf(&path("owner"), format!("0x{}", "ab".repeat(20)))
        .expect("set owner");
    assert_eq!(tree.validity(), Some(false));

    tree.report_validity(&path("active"), true).expect("report");
    assert_eq!(tree.validity(), Some(true));
}

#[test]
fn removal_by_id_leaves_other_items_alone() {
    let mut tree = ValueTree::from_type("string[]", &[], Some(&json!(["a", "b", "c"])));
    let ids = tree.root().as_array().expect("array").ids();

    assert!(tree.remove_item(&NodePath::root(), ids[1]).expect("remove"));
    assert!(!tree.remove_item(&NodePath::root(), ids[1]).expect("remove again"));

    let array = tree.root().as_array().expect("array");
    assert_eq!(array.ids(), vec![ids[0], ids[2]]);
    assert_eq!(text(&tree, &format!("[{}]", ids[2])), "c");

    let added = tree
        .add_item(&NodePath::root())
        .expect("add")
        .expect("dynamic array grows");
    assert!(!ids.contains(&added));
}

#[test]
fn fixed_arrays_do_not_grow_or_shrink() {
    let mut tree = ValueTree::from_type("uint8[2]", &[], None);
    assert_eq!(tree.add_item(&NodePath::root()).expect("add"), None);
    let first = tree.root().as_array().expect("array").ids()[0];
    assert!(!tree.remove_item(&NodePath::root(), first).expect("remove"));
}

#[test]
fn nested_edits_reaggregate_every_ancestor() {
    let components = vec![
        Component::new("id", "uint256"),
        Component::new("tags", "bytes4[]"),
    ];
    let seed = json!([{"id": "7", "tags": ["0x01020304"]}]);
    let mut tree = ValueTree::from_type("tuple[]", &components, Some(&seed));
    tree.validate_all();
    assert!(tree.is_ready());

    tree.set_leaf(&path("[0].tags[0]"), "0x0102").expect("set");
    assert_eq!(tree.get(&path("[0].tags")).and_then(|n| n.validity()), Some(false));
    assert_eq!(tree.get(&path("[0]")).and_then(|n| n.validity()), Some(false));
    assert!(!tree.is_ready());

    tree.set_leaf(&path("[0].tags[0]"), "0xffffffff").expect("set");
    assert!(tree.is_ready());
}

#[test]
fn resize_pads_and_truncates() {
    let mut tree = ValueTree::from_type("uint256[2]", &[], Some(&json!(["1", "2"])));
    tree.resize(&NodePath::root(), Dimension::Fixed(4)).expect("grow");
    assert_eq!(tree.root().as_array().expect("array").len(), 4);
    assert_eq!(text(&tree, "[1]"), "2");

    tree.resize(&NodePath::root(), Dimension::Fixed(1)).expect("shrink");
    assert_eq!(tree.root().as_array().expect("array").len(), 1);
    assert_eq!(tree.param_type(), ParamType::resolve("uint256[1]", &[]));
}

#[test]
fn retype_replaces_a_tuple_field() {
    let components = vec![Component::new("value", "uint256")];
    let mut tree = ValueTree::from_type("tuple", &components, Some(&json!({"value": "9"})));
    tree.retype(&path("value"), &ParamType::resolve("bool", &[]))
        .expect("retype field");
    let leaf = tree.get(&path("value")).and_then(|n| n.as_scalar()).expect("leaf");
    assert_eq!(leaf.raw(), &Raw::Bool(false));

    let mut list = ValueTree::from_type("uint256[]", &[], Some(&json!(["1"])));
    let err = list
        .retype(&path("[0]"), &ParamType::resolve("bool", &[]))
        .expect_err("items follow their array");
    assert!(matches!(err, TreeError::RetypeArrayItem(_)));
}

#[test]
fn dynamic_seed_is_capped_by_limits() {
    let limits = callform::Limits {
        max_dynamic_len: 2,
        ..Default::default()
    };
    let mut tree = ValueTree::build(
        &ParamType::resolve("uint256[]", &[]),
        Some(&json!(["1", "2", "3"])),
        limits,
    );
    assert_eq!(tree.root().as_array().expect("array").len(), 2);
    assert_eq!(tree.add_item(&NodePath::root()).expect("add"), None);
}

#[test]
fn placeholder_field_keys_stay_distinct() {
    let components = vec![
        Component::new("", "uint256"),
        Component::new("field0", "bool"),
    ];
    let mut tree = ValueTree::from_type("tuple", &components, Some(&json!(["5", true])));
    let tuple = tree.root().as_tuple().expect("tuple");
    assert_eq!(tuple.len(), 2);
    assert_eq!(tuple.names().collect::<Vec<_>>(), vec!["field0_1", "field0"]);

    tree.validate_all();
    assert!(tree.is_ready());
    assert_eq!(text(&tree, "field0_1"), "5");
    assert_eq!(text(&tree, "field0"), "true");
}

#[test]
fn resize_to_dynamic_keeps_items_and_allows_growth() {
    let mut tree = ValueTree::from_type("uint256[2]", &[], Some(&json!(["1", "2"])));
    assert_eq!(tree.add_item(&NodePath::root()).expect("add"), None);

    tree.resize(&NodePath::root(), Dimension::Dynamic).expect("resize");
    let array = tree.root().as_array().expect("array");
    assert!(!array.is_fixed());
    assert_eq!(array.len(), 2);
    assert_eq!(text(&tree, "[1]"), "2");

    assert!(tree.add_item(&NodePath::root()).expect("add").is_some());
    assert_eq!(tree.root().as_array().expect("array").len(), 3);
}

#[test]
fn reported_failure_invalidates_the_root() {
    let mut tree = ValueTree::from_type("string[]", &[], Some(&json!(["a", "b"])));
    tree.validate_all();
    assert!(tree.is_ready());

    tree.report_validity(&path("[1]"), false).expect("report");
    assert_eq!(tree.validity(), Some(false));
    assert!(!tree.is_ready());

    tree.report_validity(&path("[1]"), true).expect("report");
    assert!(tree.is_ready());
}

//! Parser/reassembly laws for type descriptors.

use callform_abi::{element_type, is_array_type, parse, Component, Dimension, ParamType};

const TYPES: &[&str] = &[
    "uint256",
    "address[]",
    "bytes32[5]",
    "uint256[][3]",
    "uint256[3][2]",
    "address[2][3][4]",
    "tuple[]",
    "tuple[2][]",
    "string[][][]",
    "bool[1][][7]",
];

#[test]
fn fixed_dimensions_are_outermost_first() {
    let desc = parse("uint256[3][2]");
    assert_eq!(desc.base_type, "uint256");
    assert_eq!(desc.dimensions, vec![Dimension::Fixed(2), Dimension::Fixed(3)]);
    assert_eq!(element_type("uint256[3][2]"), "uint256[3]");
}

#[test]
fn dynamic_inner_dimension_keeps_its_place() {
    let desc = parse("uint256[][3]");
    assert_eq!(desc.dimensions, vec![Dimension::Fixed(3), Dimension::Dynamic]);
    assert_eq!(element_type("uint256[][3]"), "uint256[]");
}

#[test]
fn reassembly_inverts_parsing() {
    for ty in TYPES {
        let reassembled = parse(ty).to_string();
        assert_eq!(&reassembled, ty, "display must re-emit {ty}");
        assert_eq!(element_type(&reassembled), element_type(ty));
    }
}

#[test]
fn element_type_is_stable_under_reparse() {
    for ty in TYPES {
        let elem = element_type(ty);
        assert_eq!(element_type(&parse(&elem).to_string()), element_type(&elem));
    }
}

#[test]
fn stripping_every_dimension_reaches_the_base() {
    for ty in TYPES {
        let mut current = ty.to_string();
        let depth = parse(ty).dimensions.len();
        for _ in 0..depth {
            assert!(is_array_type(&current));
            current = element_type(&current);
        }
        assert!(!is_array_type(&current));
        assert_eq!(current, parse(ty).base_type);
    }
}

#[test]
fn array_of_tuples_resolves_fields_per_item() {
    let components = vec![
        Component::new("", "address"),
        Component::new("amounts", "uint256[2]"),
    ];
    let ty = ParamType::resolve("tuple[]", &components);
    let ParamType::Array { element, len } = ty else {
        panic!("expected array");
    };
    assert_eq!(len, None);
    let ParamType::Tuple(fields) = *element else {
        panic!("expected tuple element");
    };
    assert_eq!(fields[0].name, "field0");
    assert_eq!(fields[1].name, "amounts");
    assert_eq!(fields[1].ty.dimension(), Some(Dimension::Fixed(2)));
}

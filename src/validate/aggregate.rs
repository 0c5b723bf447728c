//! Composite validity.
//!
//! Only `Some(true)` counts as valid. A leaf that was never evaluated
//! holds `None` and keeps every ancestor invalid until it is checked.

use crate::value::{ArrayNode, TupleNode, ValueNode};

use super::leaf::validate_leaf;

/// Whether a root with this validity may be assembled.
pub fn is_ready(validity: Option<bool>) -> bool {
    validity == Some(true)
}

/// Recompute a composite node from its direct children.
///
/// Leaves keep their last verdict.
pub fn refresh(node: &mut ValueNode) {
    let validity = match node {
        ValueNode::Scalar(leaf) => leaf.validity,
        ValueNode::Array(array) => Some(array_valid(array)),
        ValueNode::Tuple(tuple) => Some(tuple_valid(tuple)),
    };
    node.set_validity(validity);
}

/// Run the leaf validators over every leaf below `node`, then aggregate.
pub fn evaluate(node: &mut ValueNode) {
    match node {
        ValueNode::Scalar(leaf) => {
            let verdict = validate_leaf(&leaf.raw, leaf.kind, &leaf.type_name);
            leaf.validity = Some(verdict.valid);
            leaf.message = verdict.message;
        }
        ValueNode::Array(array) => {
            for item in &mut array.items {
                evaluate(&mut item.value);
            }
        }
        ValueNode::Tuple(tuple) => {
            for field in tuple.fields.values_mut() {
                evaluate(field);
            }
        }
    }
    refresh(node);
}

fn array_valid(array: &ArrayNode) -> bool {
    if let Some(n) = array.len {
        if array.items.len() != n {
            return false;
        }
    }
    array.items.iter().all(|item| item.value.is_valid())
}

fn tuple_valid(tuple: &TupleNode) -> bool {
    tuple.fields.values().all(ValueNode::is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{build, Limits};
    use callform_abi::ParamType;

    #[test]
    fn empty_dynamic_array_is_valid() {
        let node = build(&ParamType::resolve("address[]", &[]), None, &Limits::default());
        assert_eq!(node.validity(), Some(true));
    }

    #[test]
    fn unevaluated_leaves_keep_parents_invalid() {
        let mut node = build(&ParamType::resolve("bool[2]", &[]), None, &Limits::default());
        assert_eq!(node.validity(), Some(false));
        evaluate(&mut node);
        assert_eq!(node.validity(), Some(true));
    }

    #[test]
    fn wrong_fixed_length_is_invalid() {
        let mut node = build(&ParamType::resolve("bool[2]", &[]), None, &Limits::default());
        evaluate(&mut node);
        if let ValueNode::Array(array) = &mut node {
            array.items.pop();
        }
        refresh(&mut node);
        assert!(!node.is_valid());
    }
}

//! Default value synthesis and seeded construction.

use callform_abi::{ParamType, ScalarKind};
use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

use super::node::{ArrayNode, Raw, ScalarNode, TupleNode, ValueNode};
use super::Limits;
use crate::validate::aggregate;

/// A seed value whose shape does not fit the type it seeds.
///
/// Never surfaced: the builder falls back to defaults.
#[derive(Debug, Error)]
#[error("seed shape mismatch: expected {expected}, found {found}")]
pub struct ShapeError {
    pub expected: String,
    pub found: &'static str,
}

impl ShapeError {
    fn new(ty: &ParamType, seed: &Json) -> Self {
        Self {
            expected: ty.type_string(),
            found: json_kind(seed),
        }
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// The zero value for a leaf kind: `false` for bool, the empty
/// "not yet entered" sentinel for everything else.
pub fn default_raw(kind: ScalarKind) -> Raw {
    if kind.is_bool() {
        Raw::Bool(false)
    } else {
        Raw::Text(String::new())
    }
}

/// The unpopulated shape for a type: leaves get [`default_raw`], arrays start
/// empty, tuples start with no fields.
pub fn default_value(ty: &ParamType) -> ValueNode {
    match ty {
        ParamType::Scalar { kind, name } => ValueNode::Scalar(ScalarNode {
            kind: *kind,
            type_name: name.clone(),
            raw: default_raw(*kind),
            message: None,
            validity: None,
        }),
        ParamType::Array { element, len } => {
            ValueNode::Array(ArrayNode::new((**element).clone(), *len))
        }
        ParamType::Tuple(_) => ValueNode::Tuple(TupleNode::new()),
    }
}

/// Build a full node tree for `ty`, taking values from `seed` where the seed
/// shape fits.
///
/// Fixed arrays are padded with defaults or truncated to their declared
/// length; tuples always receive exactly their declared fields. Leaves start
/// unevaluated, composites are aggregated from them.
pub fn build(ty: &ParamType, seed: Option<&Json>, limits: &Limits) -> ValueNode {
    build_at(ty, seed, limits, 0)
}

fn build_at(ty: &ParamType, seed: Option<&Json>, limits: &Limits, depth: usize) -> ValueNode {
    let seed = match seed {
        Some(Json::Null) | None => None,
        Some(_) if depth > limits.max_depth => {
            debug!(depth, ty = %ty.type_string(), "seed deeper than limit, using defaults");
            None
        }
        Some(seed) => Some(seed),
    };

    let mut node = default_value(ty);
    match (&mut node, ty) {
        (ValueNode::Scalar(leaf), _) => {
            if let Some(seed) = seed {
                match seed_raw(leaf.kind, seed) {
                    Some(raw) => leaf.raw = raw,
                    None => log_shape(ShapeError::new(ty, seed)),
                }
            }
        }
        (ValueNode::Array(array), ParamType::Array { element, len }) => {
            let items: &[Json] = match seed {
                Some(Json::Array(items)) => items.as_slice(),
                Some(other) => {
                    log_shape(ShapeError::new(ty, other));
                    &[]
                }
                None => &[],
            };

            let keep = match len {
                Some(n) => items.len().min(*n),
                None => items.len().min(limits.max_dynamic_len),
            };
            if keep < items.len() {
                debug!(
                    ty = %ty.type_string(),
                    seeded = items.len(),
                    kept = keep,
                    "truncating array seed"
                );
            }
            for item in &items[..keep] {
                array.push(build_at(element, Some(item), limits, depth + 1));
            }
            if let Some(n) = len {
                while array.len() < *n {
                    array.push(build_at(element, None, limits, depth + 1));
                }
            }
        }
        (ValueNode::Tuple(tuple), ParamType::Tuple(fields)) => {
            if let Some(other) = seed.filter(|s| !s.is_object() && !s.is_array()) {
                log_shape(ShapeError::new(ty, other));
            }
            for (index, field) in fields.iter().enumerate() {
                let child_seed = field_seed(seed, index, &field.name);
                let child = build_at(&field.ty, child_seed, limits, depth + 1);
                tuple.fields.insert(field.name.clone(), child);
            }
        }
        _ => {}
    }

    aggregate::refresh(&mut node);
    node
}

/// Tuple seeds are objects keyed by field name or positional arrays.
fn field_seed<'a>(seed: Option<&'a Json>, index: usize, name: &str) -> Option<&'a Json> {
    match seed {
        Some(Json::Object(map)) => map.get(name),
        Some(Json::Array(items)) => items.get(index),
        _ => None,
    }
}

/// Convert a JSON seed into leaf content for `kind`.
fn seed_raw(kind: ScalarKind, seed: &Json) -> Option<Raw> {
    match (kind, seed) {
        (ScalarKind::Bool, Json::Bool(b)) => Some(Raw::Bool(*b)),
        (ScalarKind::Bool, Json::String(s)) => match s.trim() {
            "true" => Some(Raw::Bool(true)),
            "false" => Some(Raw::Bool(false)),
            _ => None,
        },
        (ScalarKind::Bool, _) => None,
        (_, Json::String(s)) => Some(Raw::Text(s.clone())),
        // Integers beyond 64 bits arrive as floats; seed those as strings.
        (ScalarKind::Uint { .. } | ScalarKind::Int { .. }, Json::Number(n))
            if n.is_u64() || n.is_i64() =>
        {
            Some(Raw::Text(n.to_string()))
        }
        _ => None,
    }
}

fn log_shape(err: ShapeError) {
    debug!(%err, "discarding seed, synthesizing defaults");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_per_kind() {
        assert_eq!(default_raw(ScalarKind::Bool), Raw::Bool(false));
        assert_eq!(
            default_raw(ScalarKind::Uint { bits: 8 }),
            Raw::Text(String::new())
        );
        assert!(default_value(&ParamType::resolve("uint8[3]", &[]))
            .as_array()
            .expect("array")
            .is_empty());
    }

    #[test]
    fn numbers_seed_integer_leaves_only() {
        assert_eq!(
            seed_raw(ScalarKind::Uint { bits: 256 }, &json!(42)),
            Some(Raw::Text("42".to_string()))
        );
        assert!(seed_raw(ScalarKind::Address, &json!(42)).is_none());
        assert_eq!(
            seed_raw(ScalarKind::Int { bits: 64 }, &json!(-7)),
            Some(Raw::Text("-7".to_string()))
        );
        assert!(seed_raw(ScalarKind::Uint { bits: 256 }, &json!(1e30)).is_none());
        assert!(seed_raw(ScalarKind::Uint { bits: 256 }, &json!(1.5)).is_none());
        assert!(seed_raw(ScalarKind::Bool, &json!("yes")).is_none());
    }

    #[test]
    fn mismatched_seed_falls_back_to_default() {
        let ty = ParamType::resolve("uint256[2]", &[]);
        let node = build(&ty, Some(&json!({"not": "an array"})), &Limits::default());
        let array = node.as_array().expect("array");
        assert_eq!(array.len(), 2);
        for item in array.items() {
            let leaf = item.value.as_scalar().expect("leaf");
            assert_eq!(leaf.raw(), &Raw::Text(String::new()));
        }
    }

    #[test]
    fn seeds_deeper_than_limit_are_ignored() {
        let ty = ParamType::resolve("uint256[][]", &[]);
        let limits = Limits {
            max_depth: 0,
            ..Limits::default()
        };
        let node = build(&ty, Some(&json!([["1"]])), &limits);
        let outer = node.as_array().expect("array");
        let inner = outer.items()[0].value.as_array().expect("inner");
        assert!(inner.is_empty());
    }
}

//! Turning ready value trees into call arguments.

use callform_abi::{FunctionAbi, ScalarKind};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::value::{Raw, ValueNode, ValueTree};

/// One argument value in the shape an encoder consumes.
///
/// Numbers, addresses, byte strings and strings stay textual; the encoder
/// coerces them against the declared type. Numeric, address and byte input
/// is trimmed, string input is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Text(String),
    Bool(bool),
    List(Vec<ArgValue>),
    /// Tuple fields in declaration order.
    Record(IndexMap<String, ArgValue>),
}

impl ArgValue {
    pub fn from_node(node: &ValueNode) -> Self {
        match node {
            ValueNode::Scalar(leaf) => match leaf.raw() {
                // Free-form text is passed through as typed.
                Raw::Text(text) if leaf.kind == ScalarKind::String => {
                    ArgValue::Text(text.clone())
                }
                Raw::Text(text) => ArgValue::Text(text.trim().to_string()),
                Raw::Bool(b) => ArgValue::Bool(*b),
            },
            ValueNode::Array(array) => ArgValue::List(
                array
                    .items()
                    .iter()
                    .map(|item| ArgValue::from_node(&item.value))
                    .collect(),
            ),
            ValueNode::Tuple(tuple) => ArgValue::Record(
                tuple
                    .fields()
                    .map(|(name, field)| (name.to_string(), ArgValue::from_node(field)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            ArgValue::Text(text) => Json::String(text.clone()),
            ArgValue::Bool(b) => Json::Bool(*b),
            ArgValue::List(items) => Json::Array(items.iter().map(ArgValue::to_json).collect()),
            ArgValue::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

/// Arguments of one call, positionally and by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub ordered: Vec<ArgValue>,
    pub named: Map<String, Json>,
}

impl Assembly {
    pub fn json_pretty(&self) -> String {
        // A map of plain JSON values always serializes.
        serde_json::to_string_pretty(&self.named).unwrap_or_default()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Arguments not ready: {}", pending.join(", "))]
pub struct NotReady {
    /// Display names of the inputs that are not valid yet.
    pub pending: Vec<String>,
}

/// Collect the arguments for `function` from its per-input trees.
///
/// `roots` are in declared input order. Fails unless every root is ready;
/// a missing root counts as pending.
pub fn assemble(function: &FunctionAbi, roots: &[ValueTree]) -> Result<Assembly, NotReady> {
    let names = function.input_names();
    let pending: Vec<String> = names
        .iter()
        .enumerate()
        .filter(|(i, _)| !roots.get(*i).is_some_and(ValueTree::is_ready))
        .map(|(_, name)| name.clone())
        .collect();
    if !pending.is_empty() {
        return Err(NotReady { pending });
    }

    let ordered: Vec<ArgValue> = roots
        .iter()
        .take(names.len())
        .map(|tree| ArgValue::from_node(tree.root()))
        .collect();
    let named = names
        .into_iter()
        .zip(ordered.iter().map(ArgValue::to_json))
        .collect();

    Ok(Assembly { ordered, named })
}

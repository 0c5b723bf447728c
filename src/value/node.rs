//! Value tree nodes
//!
//! A node mirrors one resolved [`ParamType`]: scalars hold raw user input,
//! arrays hold identified items, tuples hold their declared fields in order.
//! Every node carries `validity`; `None` means "not yet evaluated".

use std::fmt;

use callform_abi::{Dimension, ParamType, ScalarKind, TupleField};
use indexmap::IndexMap;

/// Raw leaf content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raw {
    Text(String),
    Bool(bool),
}

impl Raw {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Raw::Text(s) => Some(s),
            Raw::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Raw::Bool(b) => Some(*b),
            Raw::Text(_) => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Raw::Bool(_))
    }
}

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Raw::Text(s.to_string())
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Raw::Text(s)
    }
}

impl From<bool> for Raw {
    fn from(b: bool) -> Self {
        Raw::Bool(b)
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raw::Text(s) => f.write_str(s),
            Raw::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Identity of an array item, stable for the item's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-array id allocator. Ids are never reused within one array.
#[derive(Debug, Clone, Default)]
pub struct ItemIds {
    next: u32,
}

impl ItemIds {
    pub fn issue(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone)]
pub struct ScalarNode {
    pub kind: ScalarKind,
    /// Base type as written in the schema, used in messages.
    pub type_name: String,
    pub(crate) raw: Raw,
    pub(crate) message: Option<String>,
    pub(crate) validity: Option<bool>,
}

impl ScalarNode {
    pub fn raw(&self) -> &Raw {
        &self.raw
    }

    /// Last validation message, if the leaf was rejected with one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn placeholder(&self) -> String {
        self.kind.placeholder(&self.type_name)
    }
}

#[derive(Debug, Clone)]
pub struct ArrayItem {
    pub id: ItemId,
    pub value: ValueNode,
}

#[derive(Debug, Clone)]
pub struct ArrayNode {
    pub(crate) element: ParamType,
    pub(crate) len: Option<usize>,
    pub(crate) items: Vec<ArrayItem>,
    pub(crate) ids: ItemIds,
    pub(crate) validity: Option<bool>,
}

impl ArrayNode {
    pub(crate) fn new(element: ParamType, len: Option<usize>) -> Self {
        Self {
            element,
            len,
            items: Vec::new(),
            ids: ItemIds::default(),
            validity: None,
        }
    }

    pub fn element(&self) -> &ParamType {
        &self.element
    }

    /// Declared length, `None` for dynamic arrays.
    pub fn declared_len(&self) -> Option<usize> {
        self.len
    }

    pub fn dimension(&self) -> Dimension {
        self.len.map_or(Dimension::Dynamic, Dimension::Fixed)
    }

    pub fn is_fixed(&self) -> bool {
        self.len.is_some()
    }

    pub fn items(&self) -> &[ArrayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&ValueNode> {
        self.items.iter().find(|item| item.id == id).map(|item| &item.value)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut ValueNode> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| &mut item.value)
    }

    pub(crate) fn push(&mut self, value: ValueNode) -> ItemId {
        let id = self.ids.issue();
        self.items.push(ArrayItem { id, value });
        id
    }

    pub(crate) fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }
}

#[derive(Debug, Clone)]
pub struct TupleNode {
    pub(crate) fields: IndexMap<String, ValueNode>,
    pub(crate) validity: Option<bool>,
}

impl TupleNode {
    pub(crate) fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            validity: None,
        }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ValueNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn field(&self, name: &str) -> Option<&ValueNode> {
        self.fields.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One node of a value tree.
#[derive(Debug, Clone)]
pub enum ValueNode {
    Scalar(ScalarNode),
    Array(ArrayNode),
    Tuple(TupleNode),
}

impl ValueNode {
    pub fn validity(&self) -> Option<bool> {
        match self {
            ValueNode::Scalar(node) => node.validity,
            ValueNode::Array(node) => node.validity,
            ValueNode::Tuple(node) => node.validity,
        }
    }

    pub(crate) fn set_validity(&mut self, validity: Option<bool>) {
        match self {
            ValueNode::Scalar(node) => node.validity = validity,
            ValueNode::Array(node) => node.validity = validity,
            ValueNode::Tuple(node) => node.validity = validity,
        }
    }

    /// Exactly `Some(true)`; unevaluated nodes are not valid.
    pub fn is_valid(&self) -> bool {
        self.validity() == Some(true)
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            ValueNode::Scalar(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            ValueNode::Array(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&TupleNode> {
        match self {
            ValueNode::Tuple(node) => Some(node),
            _ => None,
        }
    }

    /// Reconstruct the resolved type this node was built for.
    pub fn param_type(&self) -> ParamType {
        match self {
            ValueNode::Scalar(node) => ParamType::Scalar {
                kind: node.kind,
                name: node.type_name.clone(),
            },
            ValueNode::Array(node) => ParamType::Array {
                element: Box::new(node.element.clone()),
                len: node.len,
            },
            ValueNode::Tuple(node) => ParamType::Tuple(
                node.fields
                    .iter()
                    .map(|(name, child)| TupleField {
                        name: name.clone(),
                        ty: child.param_type(),
                    })
                    .collect(),
            ),
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + match self {
            ValueNode::Scalar(_) => 0,
            ValueNode::Array(node) => node.items.iter().map(|i| i.value.node_count()).sum(),
            ValueNode::Tuple(node) => node.fields.values().map(ValueNode::node_count).sum(),
        }
    }
}

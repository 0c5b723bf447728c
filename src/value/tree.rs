//! The value tree of one argument and its mutation operations.
//!
//! Every mutation is routed down the unique owning path to its target and
//! re-aggregates validity on the way back up, so an edit touches the nodes
//! along one path only.

use std::fmt;

use callform_abi::{Component, Dimension, ParamType};
use serde_json::Value as Json;
use tracing::{debug, trace};

use super::defaults::build;
use super::node::{ItemId, Raw, ValueNode};
use super::path::{NodePath, Step};
use super::{Limits, TreeError};
use crate::validate::{self, aggregate, Verdict};

/// A problem to show next to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: NodePath,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValueTree {
    root: ValueNode,
    limits: Limits,
}

impl ValueTree {
    /// An unseeded tree with default limits.
    pub fn new(ty: &ParamType) -> Self {
        Self::build(ty, None, Limits::default())
    }

    pub fn build(ty: &ParamType, seed: Option<&Json>, limits: Limits) -> Self {
        Self {
            root: build(ty, seed, &limits),
            limits,
        }
    }

    /// Build from a raw type string and its tuple components.
    pub fn from_type(ty: &str, components: &[Component], seed: Option<&Json>) -> Self {
        Self::build(&ParamType::resolve(ty, components), seed, Limits::default())
    }

    pub fn root(&self) -> &ValueNode {
        &self.root
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn param_type(&self) -> ParamType {
        self.root.param_type()
    }

    pub fn validity(&self) -> Option<bool> {
        self.root.validity()
    }

    /// Whether the whole argument may be assembled.
    pub fn is_ready(&self) -> bool {
        aggregate::is_ready(self.root.validity())
    }

    pub fn get(&self, path: &NodePath) -> Option<&ValueNode> {
        path.steps()
            .iter()
            .try_fold(&self.root, |node, step| child(node, step))
    }

    /// Replace one leaf's raw value and re-validate it.
    pub fn set_leaf(&mut self, path: &NodePath, raw: impl Into<Raw>) -> Result<Verdict, TreeError> {
        let raw = raw.into();
        apply(&mut self.root, path.steps(), path, |node| match node {
            ValueNode::Scalar(leaf) => {
                if leaf.kind.is_bool() != raw.is_bool() {
                    return Err(TreeError::RawKindMismatch {
                        path: path.to_string(),
                        expected: raw_kind(leaf.kind.is_bool()),
                        got: raw_kind(raw.is_bool()),
                    });
                }
                trace!(%path, raw = %raw, "set leaf");
                leaf.raw = raw;
                let verdict = validate::validate_leaf(&leaf.raw, leaf.kind, &leaf.type_name);
                leaf.validity = Some(verdict.valid);
                leaf.message = verdict.message.clone();
                Ok(verdict)
            }
            _ => Err(TreeError::NotALeaf(path.to_string())),
        })
    }

    /// Store a verdict computed outside the tree (a leaf widget's own check).
    ///
    /// Any message left by an earlier verdict is dropped.
    pub fn report_validity(&mut self, path: &NodePath, valid: bool) -> Result<(), TreeError> {
        apply(&mut self.root, path.steps(), path, |node| match node {
            ValueNode::Scalar(leaf) => {
                leaf.validity = Some(valid);
                leaf.message = None;
                Ok(())
            }
            _ => Err(TreeError::NotALeaf(path.to_string())),
        })
    }

    /// Append a default item. `None` when the array is fixed-size or full.
    pub fn add_item(&mut self, path: &NodePath) -> Result<Option<ItemId>, TreeError> {
        let limits = self.limits;
        apply(&mut self.root, path.steps(), path, |node| match node {
            ValueNode::Array(array) => {
                if array.is_fixed() {
                    debug!(%path, "add_item ignored on fixed-size array");
                    return Ok(None);
                }
                if array.len() >= limits.max_dynamic_len {
                    debug!(%path, max = limits.max_dynamic_len, "add_item ignored, array full");
                    return Ok(None);
                }
                let item = build(&array.element, None, &limits);
                Ok(Some(array.push(item)))
            }
            _ => Err(TreeError::NotAnArray(path.to_string())),
        })
    }

    /// Remove the item with `id`. `false` when the array is fixed-size or
    /// holds no such item.
    pub fn remove_item(&mut self, path: &NodePath, id: ItemId) -> Result<bool, TreeError> {
        apply(&mut self.root, path.steps(), path, |node| match node {
            ValueNode::Array(array) => {
                if array.is_fixed() {
                    debug!(%path, "remove_item ignored on fixed-size array");
                    return Ok(false);
                }
                Ok(array.remove(id))
            }
            _ => Err(TreeError::NotAnArray(path.to_string())),
        })
    }

    /// Change an array's outermost dimension, padding or truncating items.
    pub fn resize(&mut self, path: &NodePath, dimension: Dimension) -> Result<(), TreeError> {
        let limits = self.limits;
        apply(&mut self.root, path.steps(), path, |node| match node {
            ValueNode::Array(array) => {
                debug!(%path, from = %array.dimension(), to = %dimension, "resize array");
                array.len = dimension.fixed_len();
                if let Some(n) = array.len {
                    array.items.truncate(n);
                    while array.len() < n {
                        let item = build(&array.element, None, &limits);
                        array.push(item);
                    }
                }
                Ok(())
            }
            _ => Err(TreeError::NotAnArray(path.to_string())),
        })
    }

    /// Discard the subtree at `path` and rebuild it, unseeded, for `ty`.
    pub fn retype(&mut self, path: &NodePath, ty: &ParamType) -> Result<(), TreeError> {
        let limits = self.limits;
        debug!(%path, ty = %ty.type_string(), "retype subtree");

        let Some((parent, last)) = path.split_last() else {
            self.root = build(ty, None, &limits);
            return Ok(());
        };

        apply(&mut self.root, parent.steps(), path, |node| match (node, last) {
            (ValueNode::Tuple(tuple), Step::Field(name)) => {
                let slot = tuple
                    .fields
                    .get_mut(name)
                    .ok_or_else(|| TreeError::PathNotFound(path.to_string()))?;
                *slot = build(ty, None, &limits);
                Ok(())
            }
            (ValueNode::Array(_), _) => Err(TreeError::RetypeArrayItem(path.to_string())),
            _ => Err(TreeError::PathNotFound(path.to_string())),
        })
    }

    pub fn retype_str(
        &mut self,
        path: &NodePath,
        ty: &str,
        components: &[Component],
    ) -> Result<(), TreeError> {
        self.retype(path, &ParamType::resolve(ty, components))
    }

    /// Evaluate every leaf once, as widgets do when they mount.
    pub fn validate_all(&mut self) {
        validate::evaluate(&mut self.root);
    }

    /// Evaluate every leaf below `path` and re-aggregate its ancestors.
    pub fn validate_at(&mut self, path: &NodePath) -> Result<(), TreeError> {
        apply(&mut self.root, path.steps(), path, |node| {
            validate::evaluate(node);
            Ok(())
        })
    }

    /// Rejected leaves, unfilled leaves and wrongly sized arrays.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        collect_issues(&self.root, NodePath::root(), &mut issues);
        issues
    }
}

fn raw_kind(is_bool: bool) -> &'static str {
    if is_bool {
        "a boolean"
    } else {
        "text"
    }
}

fn child<'a>(node: &'a ValueNode, step: &Step) -> Option<&'a ValueNode> {
    match (node, step) {
        (ValueNode::Tuple(tuple), Step::Field(name)) => tuple.fields.get(name),
        (ValueNode::Array(array), Step::Index(i)) => array.items.get(*i).map(|item| &item.value),
        (ValueNode::Array(array), Step::Item(id)) => array.get(*id),
        (ValueNode::Array(array), Step::Field(s)) => s
            .parse::<usize>()
            .ok()
            .and_then(|i| array.items.get(i))
            .map(|item| &item.value),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut ValueNode, step: &Step) -> Option<&'a mut ValueNode> {
    match (node, step) {
        (ValueNode::Tuple(tuple), Step::Field(name)) => tuple.fields.get_mut(name),
        (ValueNode::Array(array), Step::Index(i)) => {
            array.items.get_mut(*i).map(|item| &mut item.value)
        }
        (ValueNode::Array(array), Step::Item(id)) => array.get_mut(*id),
        (ValueNode::Array(array), Step::Field(s)) => s
            .parse::<usize>()
            .ok()
            .and_then(|i| array.items.get_mut(i))
            .map(|item| &mut item.value),
        _ => None,
    }
}

/// Run `f` on the node at `steps`, then re-aggregate that node and each of
/// its ancestors from their direct children.
fn apply<R>(
    node: &mut ValueNode,
    steps: &[Step],
    path: &NodePath,
    f: impl FnOnce(&mut ValueNode) -> Result<R, TreeError>,
) -> Result<R, TreeError> {
    let out = match steps.split_first() {
        None => f(node)?,
        Some((step, rest)) => {
            let next = child_mut(node, step)
                .ok_or_else(|| TreeError::PathNotFound(path.to_string()))?;
            apply(next, rest, path, f)?
        }
    };
    aggregate::refresh(node);
    Ok(out)
}

fn collect_issues(node: &ValueNode, path: NodePath, out: &mut Vec<Issue>) {
    match node {
        ValueNode::Scalar(leaf) => {
            if leaf.validity == Some(true) {
                return;
            }
            let message = match (&leaf.message, &leaf.raw) {
                (Some(message), _) => message.clone(),
                (None, Raw::Text(text)) if text.trim().is_empty() => "Value required".to_string(),
                (None, _) => "Invalid value".to_string(),
            };
            out.push(Issue { path, message });
        }
        ValueNode::Array(array) => {
            if let Some(n) = array.len {
                if array.len() != n {
                    out.push(Issue {
                        path: path.clone(),
                        message: format!("Required: {n} items"),
                    });
                }
            }
            for (i, item) in array.items.iter().enumerate() {
                collect_issues(&item.value, path.clone().index(i), out);
            }
        }
        ValueNode::Tuple(tuple) => {
            for (name, field) in &tuple.fields {
                collect_issues(field, path.clone().field(name.clone()), out);
            }
        }
    }
}

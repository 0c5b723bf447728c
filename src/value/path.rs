//! Paths into a value tree.
//!
//! Textual form: `order.items[2].amount` where `[n]` addresses an array item
//! by position and `[#n]` by its stable id.

use std::fmt;
use std::str::FromStr;

use super::node::ItemId;
use crate::TreeError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// A tuple field, or an argument name at the top of a call.
    Field(String),
    /// An array item by current position.
    Index(usize),
    /// An array item by stable id.
    Item(ItemId),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Field(name) => f.write_str(name),
            Step::Index(i) => write!(f, "[{i}]"),
            Step::Item(id) => write!(f, "[{id}]"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<Step>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, step: Step) {
        self.0.push(step);
    }

    pub fn join(&self, step: Step) -> Self {
        let mut path = self.clone();
        path.push(step);
        path
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        self.join(Step::Field(name.into()))
    }

    pub fn index(self, index: usize) -> Self {
        self.join(Step::Index(index))
    }

    pub fn item(self, id: ItemId) -> Self {
        self.join(Step::Item(id))
    }

    /// Split off the first step, used to pick the argument of a call.
    pub fn split_first(&self) -> Option<(&Step, NodePath)> {
        let (first, rest) = self.0.split_first()?;
        Some((first, NodePath(rest.to_vec())))
    }

    /// Split off the last step, used to address a node through its parent.
    pub fn split_last(&self) -> Option<(NodePath, &Step)> {
        let (last, rest) = self.0.split_last()?;
        Some((NodePath(rest.to_vec()), last))
    }
}

impl From<Vec<Step>> for NodePath {
    fn from(steps: Vec<Step>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 && matches!(step, Step::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TreeError::InvalidPath(s.to_string());
        let mut steps = Vec::new();
        let mut rest = s.trim();

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(invalid)?;
                let inner = after[..close].trim();
                let step = match inner.strip_prefix('#') {
                    Some(id) => Step::Item(ItemId(id.parse().map_err(|_| invalid())?)),
                    None => Step::Index(inner.parse().map_err(|_| invalid())?),
                };
                steps.push(step);
                rest = &after[close + 1..];
            } else if let Some(after) = rest.strip_prefix('.') {
                if after.is_empty() || after.starts_with('.') || steps.is_empty() {
                    return Err(invalid());
                }
                rest = after;
            } else {
                let end = rest.find(['.', '[']).unwrap_or(rest.len());
                let name = rest[..end].trim();
                if name.is_empty() || name.contains(']') {
                    return Err(invalid());
                }
                steps.push(Step::Field(name.to_string()));
                rest = &rest[end..];
            }
        }

        Ok(Self(steps))
    }
}

//! Value model: the mutable tree behind one function argument.

pub mod defaults;
pub mod node;
pub mod path;
pub mod tree;

pub use defaults::{build, default_raw, default_value, ShapeError};
pub use node::{ArrayItem, ArrayNode, ItemId, ItemIds, Raw, ScalarNode, TupleNode, ValueNode};
pub use path::{NodePath, Step};
pub use tree::{Issue, ValueTree};

use thiserror::Error;

/// Bounds applied to user-driven growth of a tree.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Most items a dynamic array may hold via seeds or `add_item`.
    pub max_dynamic_len: usize,
    /// Deepest nesting level from which seed values are still read.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dynamic_len: 4096,
            max_depth: 64,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("No node at path: {0}")]
    PathNotFound(String),

    #[error("Expected a leaf at {0}")]
    NotALeaf(String),

    #[error("Expected an array at {0}")]
    NotAnArray(String),

    #[error("Leaf at {path} holds {expected}, got {got}")]
    RawKindMismatch {
        path: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Cannot retype a single array item at {0}; retype the array instead")]
    RetypeArrayItem(String),

    #[error("No function selected")]
    NoFunctionSelected,

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

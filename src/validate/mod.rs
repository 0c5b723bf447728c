//! Leaf validation and bottom-up validity aggregation.

pub mod aggregate;
pub mod leaf;

pub use aggregate::{evaluate, is_ready, refresh};
pub use leaf::{validate_leaf, Verdict};

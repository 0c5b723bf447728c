//! callform-abi: schema model for contract calls
//!
//! - `descriptor` - type string parsing (`uint256[][3]` -> base + dimensions)
//! - `kind`       - resolved parameter types and scalar kinds
//! - `schema`     - functions and components loaded from JSON ABI

pub mod descriptor;
pub mod kind;
pub mod schema;

pub use descriptor::{element_type, is_array_type, parse, Dimension, TypeDescriptor};
pub use kind::{ParamType, ScalarKind, TupleField, DEFAULT_INT_BITS};
pub use schema::{unique_names, Component, ContractAbi, FunctionAbi, StateMutability};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No ABI entries found (expected an array or an object with an `abi` key)")]
    MissingAbi,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Function name '{name}' is overloaded ({count} candidates); use a full signature")]
    AmbiguousFunction { name: String, count: usize },
}

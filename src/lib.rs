//! Callform: an editable value model for contract function calls
//!
//! Given a JSON ABI, callform builds one mutable value tree per function
//! input, validates every leaf as it is edited, aggregates validity up to
//! each argument, and assembles an ordered argument list once everything is
//! valid. Byte-level encoding is delegated to a [`CallEncoder`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              CallBuilder                │
//! │                                         │
//! │  value     - trees, paths, defaults     │
//! │  validate  - leaf checks, aggregation   │
//! │  assemble  - ordered + named arguments  │
//! │  encode    - CallEncoder adapter        │
//! │                                         │
//! ├─────────────────────────────────────────┤
//! │   callform-abi (descriptors, schema)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Paths
//!
//! Nodes are addressed with dotted paths. `[n]` selects an array item by
//! position and `[#n]` by its stable id:
//!
//! ```text
//! order.items[2].amount
//! recipients[#7]
//! ```

pub mod assemble;
pub mod builder;
pub mod encode;
pub mod validate;
pub mod value;

pub use assemble::{assemble, ArgValue, Assembly, NotReady};
pub use builder::{CallBuilder, Snapshot};
pub use encode::{selector, AlloyEncoder, CallEncoder, EncodingError};
pub use validate::{validate_leaf, Verdict};
pub use value::{
    Issue, ItemId, Limits, NodePath, Raw, Step, TreeError, ValueNode, ValueTree,
};

pub use callform_abi::{
    element_type, is_array_type, parse, Component, ContractAbi, Dimension, FunctionAbi, ParamType,
    ScalarKind, SchemaError, StateMutability, TypeDescriptor,
};

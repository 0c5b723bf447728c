//! Binary encoding of assembled arguments.
//!
//! The value model never produces bytes itself. It hands ordered arguments to
//! a [`CallEncoder`]; [`AlloyEncoder`] is the implementation backed by
//! `alloy-dyn-abi`.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::keccak256;
use callform_abi::{ContractAbi, FunctionAbi};
use thiserror::Error;
use tracing::{debug, warn};

use crate::assemble::ArgValue;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Expected {expected} arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("Unsupported type {ty}: {reason}")]
    UnsupportedType { ty: String, reason: String },

    #[error("Invalid value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },

    #[error("Value for {arg} does not match type {expected}")]
    ShapeMismatch { arg: String, expected: String },
}

/// Produces calldata for one function call.
pub trait CallEncoder {
    /// Encode a call to `function` (a name or signature known to `abi`) with
    /// `args` in declared input order.
    fn encode(
        &self,
        abi: &ContractAbi,
        function: &str,
        args: &[ArgValue],
    ) -> Result<Vec<u8>, EncodingError>;
}

/// Standard ABI encoding: 4-byte selector followed by the encoded arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlloyEncoder;

impl AlloyEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// First four bytes of the keccak-256 hash of the canonical signature.
pub fn selector(function: &FunctionAbi) -> [u8; 4] {
    let hash = keccak256(function.canonical_signature().as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

impl CallEncoder for AlloyEncoder {
    fn encode(
        &self,
        abi: &ContractAbi,
        function: &str,
        args: &[ArgValue],
    ) -> Result<Vec<u8>, EncodingError> {
        let func = abi
            .find(function)
            .map_err(|_| EncodingError::UnknownFunction(function.to_string()))?;

        if func.inputs.len() != args.len() {
            return Err(EncodingError::ArgumentCount {
                expected: func.inputs.len(),
                got: args.len(),
            });
        }

        let names = func.input_names();
        let mut values = Vec::with_capacity(args.len());
        for ((ty, name), arg) in func.param_types().iter().zip(&names).zip(args) {
            let canonical = ty.canonical();
            let sol_type =
                DynSolType::parse(&canonical).map_err(|err| EncodingError::UnsupportedType {
                    ty: canonical.clone(),
                    reason: err.to_string(),
                })?;
            let value = coerce(&sol_type, arg, name).inspect_err(|err| {
                warn!(function = %func.name, arg = %name, %err, "encoder rejected argument");
            })?;
            values.push(value);
        }

        let mut calldata = selector(func).to_vec();
        calldata.extend(DynSolValue::Tuple(values).abi_encode_params());
        debug!(
            signature = %func.canonical_signature(),
            len = calldata.len(),
            "encoded call"
        );
        Ok(calldata)
    }
}

fn coerce(ty: &DynSolType, value: &ArgValue, arg: &str) -> Result<DynSolValue, EncodingError> {
    let mismatch = || EncodingError::ShapeMismatch {
        arg: arg.to_string(),
        expected: ty.sol_type_name().into_owned(),
    };

    match (ty, value) {
        (DynSolType::Bool, ArgValue::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::String, ArgValue::Text(text)) => Ok(DynSolValue::String(text.clone())),
        (DynSolType::Array(inner), ArgValue::List(items)) => {
            let items = coerce_items(inner, items, arg)?;
            Ok(DynSolValue::Array(items))
        }
        (DynSolType::FixedArray(inner, len), ArgValue::List(items)) => {
            if items.len() != *len {
                return Err(mismatch());
            }
            let items = coerce_items(inner, items, arg)?;
            Ok(DynSolValue::FixedArray(items))
        }
        (DynSolType::Tuple(types), ArgValue::Record(fields)) => {
            if types.len() != fields.len() {
                return Err(mismatch());
            }
            let values = types
                .iter()
                .zip(fields)
                .map(|(ty, (name, value))| coerce(ty, value, &format!("{arg}.{name}")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Tuple(values))
        }
        (DynSolType::Tuple(types), ArgValue::List(items)) => {
            if types.len() != items.len() {
                return Err(mismatch());
            }
            let values = types
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (ty, value))| coerce(ty, value, &format!("{arg}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Tuple(values))
        }
        (_, ArgValue::Text(text)) if is_leaf(ty) => {
            ty.coerce_str(text.trim())
                .map_err(|err| EncodingError::InvalidValue {
                    arg: arg.to_string(),
                    reason: err.to_string(),
                })
        }
        _ => Err(mismatch()),
    }
}

fn coerce_items(
    inner: &DynSolType,
    items: &[ArgValue],
    arg: &str,
) -> Result<Vec<DynSolValue>, EncodingError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce(inner, item, &format!("{arg}[{i}]")))
        .collect()
}

fn is_leaf(ty: &DynSolType) -> bool {
    !matches!(
        ty,
        DynSolType::Array(_) | DynSolType::FixedArray(..) | DynSolType::Tuple(_)
    )
}

//! Resolved parameter types
//!
//! Type strings are parsed once and resolved into [`ParamType`], so the
//! value tree and the validators dispatch on tags instead of re-reading
//! type strings on every edit.

use crate::descriptor::{Dimension, TypeDescriptor};
use crate::schema::{unique_names, Component};

/// Bit width used when `uint`/`int` carry no explicit size.
pub const DEFAULT_INT_BITS: usize = 256;

/// The kind of a scalar (leaf) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Uint { bits: usize },
    Int { bits: usize },
    Address,
    /// `bytesN` when `size` is set, dynamic `bytes` otherwise.
    Bytes { size: Option<usize> },
    /// Free-form text; also the fallback for unrecognized base types.
    String,
}

impl ScalarKind {
    /// Resolve a base type (no dimensions) into its scalar kind.
    pub fn from_base_type(base: &str) -> Self {
        let normalized = base.trim().to_ascii_lowercase();

        if normalized == "bool" {
            return ScalarKind::Bool;
        }
        if let Some(width) = normalized.strip_prefix("uint") {
            return ScalarKind::Uint {
                bits: parse_width(width),
            };
        }
        if let Some(width) = normalized.strip_prefix("int") {
            if width.bytes().all(|b| b.is_ascii_digit()) {
                return ScalarKind::Int {
                    bits: parse_width(width),
                };
            }
        }
        if normalized == "address" {
            return ScalarKind::Address;
        }
        if let Some(size) = normalized.strip_prefix("bytes") {
            let size = size
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| size.parse::<usize>().ok())
                .flatten();
            return ScalarKind::Bytes { size };
        }
        ScalarKind::String
    }

    /// Whether the leaf holds a boolean toggle rather than text.
    pub fn is_bool(self) -> bool {
        matches!(self, ScalarKind::Bool)
    }

    /// Input hint shown next to an empty leaf.
    pub fn placeholder(self, type_name: &str) -> String {
        match self {
            ScalarKind::Bool => "false".to_string(),
            ScalarKind::Address => "0x...".to_string(),
            ScalarKind::Bytes { size: Some(n) } => format!("0x{}", "0".repeat(n * 2)),
            ScalarKind::Bytes { size: None } => "0x...".to_string(),
            ScalarKind::Uint { .. } | ScalarKind::Int { .. } | ScalarKind::String => {
                format!("Enter {type_name}")
            }
        }
    }
}

fn parse_width(digits: &str) -> usize {
    if digits.is_empty() {
        return DEFAULT_INT_BITS;
    }
    digits.parse().unwrap_or(DEFAULT_INT_BITS)
}

/// A named field of a resolved tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleField {
    /// Key of the field, unique within its tuple; `field<i>` when unnamed.
    pub name: String,
    pub ty: ParamType,
}

/// A fully resolved parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Scalar {
        kind: ScalarKind,
        /// Base type as written in the schema, e.g. `uint8`.
        name: String,
    },
    Array {
        element: Box<ParamType>,
        /// Declared length of the outermost dimension, `None` when dynamic.
        len: Option<usize>,
    },
    Tuple(Vec<TupleField>),
}

impl ParamType {
    /// Resolve a type string and its tuple components.
    pub fn resolve(ty: &str, components: &[Component]) -> Self {
        Self::from_descriptor(&TypeDescriptor::parse(ty), components)
    }

    pub fn from_descriptor(desc: &TypeDescriptor, components: &[Component]) -> Self {
        if let Some(outer) = desc.outermost() {
            return ParamType::Array {
                element: Box::new(Self::from_descriptor(&desc.element(), components)),
                len: outer.fixed_len(),
            };
        }

        if desc.base_type.trim().eq_ignore_ascii_case("tuple") {
            let fields = components
                .iter()
                .zip(unique_names(components, "field"))
                .map(|(component, name)| TupleField {
                    name,
                    ty: component.param_type(),
                })
                .collect();
            return ParamType::Tuple(fields);
        }

        ParamType::Scalar {
            kind: ScalarKind::from_base_type(&desc.base_type),
            name: desc.base_type.trim().to_string(),
        }
    }

    pub fn scalar(name: &str) -> Self {
        ParamType::Scalar {
            kind: ScalarKind::from_base_type(name),
            name: name.trim().to_string(),
        }
    }

    pub fn array(element: ParamType, len: Option<usize>) -> Self {
        ParamType::Array {
            element: Box::new(element),
            len,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ParamType::Array { .. })
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, ParamType::Tuple(_))
    }

    /// Outermost dimension of an array type.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            ParamType::Array { len: Some(n), .. } => Some(Dimension::Fixed(*n)),
            ParamType::Array { len: None, .. } => Some(Dimension::Dynamic),
            _ => None,
        }
    }

    /// The schema-style type string: tuples are written as `tuple`.
    pub fn type_string(&self) -> String {
        match self {
            ParamType::Scalar { name, .. } => name.clone(),
            ParamType::Array { element, len } => {
                let dim = len.map_or(Dimension::Dynamic, Dimension::Fixed);
                format!("{}{}", element.type_string(), dim)
            }
            ParamType::Tuple(_) => "tuple".to_string(),
        }
    }

    /// The canonical type string used for selectors and encoding, with
    /// tuples expanded to `(t1,t2,...)` and integer aliases widened.
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Scalar { kind, name } => match kind {
                ScalarKind::Uint { bits } => format!("uint{bits}"),
                ScalarKind::Int { bits } => format!("int{bits}"),
                _ => name.to_ascii_lowercase(),
            },
            ParamType::Array { element, len } => {
                let dim = len.map_or(Dimension::Dynamic, Dimension::Fixed);
                format!("{}{}", element.canonical(), dim)
            }
            ParamType::Tuple(fields) => {
                let inner: Vec<String> = fields.iter().map(|f| f.ty.canonical()).collect();
                format!("({})", inner.join(","))
            }
        }
    }
}

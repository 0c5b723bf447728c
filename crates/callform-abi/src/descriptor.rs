//! Type descriptor parsing
//!
//! A Solidity type string such as `uint256[][3]` is split into its base type
//! and its array dimensions. The rightmost bracket group is the outermost
//! array, so dimensions are stored outermost-first:
//!
//! ```text
//! uint256[3][2]   -> base uint256, dims [2, 3]        (2 arrays of 3)
//! uint256[][3]    -> base uint256, dims [3, dynamic]  (3 dynamic arrays)
//! address[2][3][4]-> base address, dims [4, 3, 2]
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// `[n]` - declared cardinality that never changes.
    Fixed(usize),
    /// `[]` - user-adjustable cardinality.
    Dynamic,
}

impl Dimension {
    /// The declared length, `None` for dynamic dimensions.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            Dimension::Fixed(n) => Some(n),
            Dimension::Dynamic => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        matches!(self, Dimension::Fixed(_))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(n) => write!(f, "[{n}]"),
            Dimension::Dynamic => f.write_str("[]"),
        }
    }
}

/// A parsed type string: base type plus dimensions, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub base_type: String,
    pub dimensions: Vec<Dimension>,
}

impl TypeDescriptor {
    /// Parse a type string.
    ///
    /// Trailing `[digits?]` groups are stripped right to left, so the first
    /// dimension pushed is the outermost one. Parsing stops at the first
    /// trailing group that is not a well-formed dimension; the schema is
    /// trusted, so there is no failure path.
    pub fn parse(ty: &str) -> Self {
        let mut dimensions = Vec::new();
        let mut remaining = ty.trim();

        while let Some((rest, dim)) = strip_trailing_dimension(remaining) {
            dimensions.push(dim);
            remaining = rest;
        }

        Self {
            base_type: remaining.to_string(),
            dimensions,
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// The outermost dimension, if any.
    pub fn outermost(&self) -> Option<Dimension> {
        self.dimensions.first().copied()
    }

    /// The descriptor of one element of the outermost array.
    ///
    /// Returns `self` unchanged for non-array types.
    pub fn element(&self) -> TypeDescriptor {
        TypeDescriptor {
            base_type: self.base_type.clone(),
            dimensions: self.dimensions.iter().skip(1).copied().collect(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    /// Re-emits the type string. Dimensions are written innermost first,
    /// which inverts the storage order used by [`TypeDescriptor::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_type)?;
        for dim in self.dimensions.iter().rev() {
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}

impl FromStr for TypeDescriptor {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeDescriptor::parse(s))
    }
}

/// Parse a type string into a [`TypeDescriptor`].
pub fn parse(ty: &str) -> TypeDescriptor {
    TypeDescriptor::parse(ty)
}

/// Whether the type string carries at least one array dimension.
pub fn is_array_type(ty: &str) -> bool {
    TypeDescriptor::parse(ty).is_array()
}

/// Remove the outermost dimension of an array type string.
///
/// `bytes32[][3]` becomes `bytes32[]`, `uint256[3][2]` becomes `uint256[3]`.
/// Non-array types are returned unchanged.
pub fn element_type(ty: &str) -> String {
    let desc = TypeDescriptor::parse(ty);
    if !desc.is_array() {
        return ty.to_string();
    }
    desc.element().to_string()
}

/// Split one well-formed `[digits?]` group off the end of `s`.
fn strip_trailing_dimension(s: &str) -> Option<(&str, Dimension)> {
    let body = s.strip_suffix(']')?;
    let open = body.rfind('[')?;
    let size = &body[open + 1..];

    let dim = if size.is_empty() {
        Dimension::Dynamic
    } else if size.bytes().all(|b| b.is_ascii_digit()) {
        Dimension::Fixed(size.parse().ok()?)
    } else {
        return None;
    };

    Some((&body[..open], dim))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_has_no_dimensions() {
        let desc = parse("uint256");
        assert_eq!(desc.base_type, "uint256");
        assert!(desc.dimensions.is_empty());
        assert!(!desc.is_array());
    }

    #[test]
    fn rightmost_bracket_is_outermost() {
        let desc = parse("address[2][3][4]");
        assert_eq!(desc.base_type, "address");
        assert_eq!(
            desc.dimensions,
            vec![Dimension::Fixed(4), Dimension::Fixed(3), Dimension::Fixed(2)]
        );
    }

    #[test]
    fn malformed_group_stops_parsing() {
        let desc = parse("uint256[x][2]");
        assert_eq!(desc.base_type, "uint256[x]");
        assert_eq!(desc.dimensions, vec![Dimension::Fixed(2)]);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let desc = parse("  bool[] ");
        assert_eq!(desc.base_type, "bool");
        assert_eq!(desc.dimensions, vec![Dimension::Dynamic]);
    }

    #[test]
    fn element_of_scalar_is_identity() {
        assert_eq!(element_type("string"), "string");
        assert_eq!(element_type("address[5]"), "address");
        assert_eq!(element_type("bytes32[][3]"), "bytes32[]");
    }
}

//! Type-specific checks for leaf input.

use alloy_primitives::U256;
use callform_abi::ScalarKind;

use crate::value::Raw;

const ADDRESS_LEN: usize = 42;

/// Outcome of checking one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    /// Why the input was rejected. `None` for valid and for untouched input.
    pub message: Option<String>,
}

impl Verdict {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// Invalid without a message: the leaf has not been filled in yet.
    pub fn empty() -> Self {
        Self {
            valid: false,
            message: None,
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Check `raw` against the rules for `kind`. `type_name` is the base type as
/// written in the schema and only appears in messages.
pub fn validate_leaf(raw: &Raw, kind: ScalarKind, type_name: &str) -> Verdict {
    let text = match raw {
        Raw::Bool(_) => return Verdict::ok(),
        Raw::Text(text) => text.trim(),
    };

    match kind {
        ScalarKind::Bool | ScalarKind::String => Verdict::ok(),
        _ if text.is_empty() => Verdict::empty(),
        ScalarKind::Uint { bits } => check_uint(text, bits, type_name),
        ScalarKind::Int { bits } => check_int(text, bits, type_name),
        ScalarKind::Address => check_address(text),
        ScalarKind::Bytes { size } => check_bytes(text, size, type_name),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// `2^bits`, or `None` when it does not fit in 256 bits.
fn pow2(bits: usize) -> Option<U256> {
    (bits < 256).then(|| U256::from(1u64) << bits)
}

fn clamp_bits(bits: usize) -> usize {
    bits.clamp(1, 256)
}

fn check_uint(text: &str, bits: usize, type_name: &str) -> Verdict {
    if !is_digits(text) {
        return Verdict::reject("Must be a positive integer");
    }
    let bits = clamp_bits(bits);
    let max = pow2(bits).map_or(U256::MAX, |p| p - U256::from(1u64));
    match U256::from_str_radix(text, 10) {
        Ok(value) if value <= max => Verdict::ok(),
        _ => Verdict::reject(format!("Exceeds max value for {type_name}: {max}")),
    }
}

fn check_int(text: &str, bits: usize, type_name: &str) -> Verdict {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if !is_digits(digits) {
        return Verdict::reject("Must be a valid integer");
    }

    // |min| = 2^(bits-1), max = 2^(bits-1) - 1
    let half = pow2(clamp_bits(bits) - 1).unwrap_or(U256::MAX);
    let max = half - U256::from(1u64);
    let magnitude = U256::from_str_radix(digits, 10).ok();

    if negative {
        match magnitude {
            Some(m) if m <= half => Verdict::ok(),
            _ => Verdict::reject(format!("Below min value for {type_name}: -{half}")),
        }
    } else {
        match magnitude {
            Some(m) if m <= max => Verdict::ok(),
            _ => Verdict::reject(format!("Exceeds max value for {type_name}: {max}")),
        }
    }
}

fn check_address(text: &str) -> Verdict {
    let Some(hex) = text.strip_prefix("0x") else {
        return Verdict::reject("Address must start with 0x");
    };
    if text.len() != ADDRESS_LEN {
        return Verdict::reject("Address must be 42 characters (0x + 40 hex)");
    }
    if !is_hex(hex) {
        return Verdict::reject("Address must contain only hexadecimal characters");
    }
    Verdict::ok()
}

fn check_bytes(text: &str, size: Option<usize>, type_name: &str) -> Verdict {
    let Some(hex) = text.strip_prefix("0x") else {
        return Verdict::reject("Hex string must start with 0x");
    };
    if !is_hex(hex) {
        return Verdict::reject("Must contain only hexadecimal characters");
    }
    match size {
        Some(n) if hex.len() != n * 2 => Verdict::reject(format!(
            "{type_name} requires exactly {} hex characters (got {})",
            n * 2,
            hex.len()
        )),
        _ => Verdict::ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(kind: &str, input: &str) -> Verdict {
        validate_leaf(&Raw::from(input), ScalarKind::from_base_type(kind), kind)
    }

    #[test]
    fn empty_is_untouched_except_for_strings() {
        assert_eq!(check("uint256", "  "), Verdict::empty());
        assert_eq!(check("bytes", ""), Verdict::empty());
        assert_eq!(check("string", ""), Verdict::ok());
    }

    #[test]
    fn small_widths() {
        assert!(check("uint8", "255").valid);
        assert_eq!(
            check("uint8", "256").message.as_deref(),
            Some("Exceeds max value for uint8: 255")
        );
        assert!(check("int8", "-128").valid);
        assert_eq!(
            check("int8", "-129").message.as_deref(),
            Some("Below min value for int8: -128")
        );
        assert_eq!(
            check("int8", "128").message.as_deref(),
            Some("Exceeds max value for int8: 127")
        );
    }

    #[test]
    fn signs_and_garbage() {
        assert_eq!(
            check("uint256", "-1").message.as_deref(),
            Some("Must be a positive integer")
        );
        assert_eq!(
            check("int256", "1.5").message.as_deref(),
            Some("Must be a valid integer")
        );
        assert!(!check("int256", "-").valid);
        assert!(check("uint", " 42 ").valid);
    }

    #[test]
    fn bytes_rules() {
        assert!(check("bytes", "0x").valid);
        assert!(check("bytes4", "0xdeadbeef").valid);
        assert_eq!(
            check("bytes4", "0xdead").message.as_deref(),
            Some("bytes4 requires exactly 8 hex characters (got 4)")
        );
        assert_eq!(
            check("bytes", "0xzz").message.as_deref(),
            Some("Must contain only hexadecimal characters")
        );
        assert_eq!(
            check("bytes", "dead").message.as_deref(),
            Some("Hex string must start with 0x")
        );
    }

    #[test]
    fn bools_are_always_valid() {
        assert!(validate_leaf(&Raw::Bool(false), ScalarKind::Bool, "bool").valid);
    }
}

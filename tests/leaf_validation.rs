use alloy_primitives::U256;
use callform::{validate_leaf, Raw, ScalarKind};

fn valid(ty: &str, input: &str) -> bool {
    validate_leaf(&Raw::from(input), ScalarKind::from_base_type(ty), ty).valid
}

fn message(ty: &str, input: &str) -> Option<String> {
    validate_leaf(&Raw::from(input), ScalarKind::from_base_type(ty), ty).message
}

#[test]
fn uint256_bounds() {
    assert!(valid("uint256", &U256::MAX.to_string()));
    assert!(valid("uint256", "0"));
    // 2^256
    let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
    assert!(!valid("uint256", over));
    assert_eq!(
        message("uint256", over).as_deref(),
        Some(format!("Exceeds max value for uint256: {}", U256::MAX).as_str())
    );
    assert!(!valid("uint256", ""));
    assert_eq!(message("uint256", ""), None);
}

#[test]
fn int256_bounds() {
    let half: U256 = U256::from(1u64) << 255;
    let max = half - U256::from(1u64);
    assert!(valid("int256", &format!("-{half}")));
    assert!(valid("int256", &max.to_string()));
    assert!(!valid("int256", &format!("-{}", half + U256::from(1u64))));
    assert!(!valid("int256", &half.to_string()));
    assert!(valid("int", "-1"));
}

#[test]
fn address_rules() {
    assert!(valid("address", &format!("0x{}", "aB".repeat(20))));
    assert_eq!(
        message("address", &format!("0x{}", "a".repeat(41))).as_deref(),
        Some("Address must be 42 characters (0x + 40 hex)")
    );
    assert!(!valid("address", &format!("0x{}", "a".repeat(39))));
    assert_eq!(
        message("address", &format!("0x{}", "a".repeat(43))).as_deref(),
        Some("Address must be 42 characters (0x + 40 hex)")
    );
    assert_eq!(
        message("address", &format!("0x{}", "g".repeat(40))).as_deref(),
        Some("Address must contain only hexadecimal characters")
    );
    assert_eq!(
        message("address", &"a".repeat(42)).as_deref(),
        Some("Address must start with 0x")
    );
}

#[test]
fn bytes32_length() {
    assert!(valid("bytes32", &format!("0x{}", "00".repeat(32))));
    assert!(!valid("bytes32", &format!("0x{}", "00".repeat(31))));
    assert_eq!(
        message("bytes32", &format!("0x{}", "00".repeat(33))).as_deref(),
        Some("bytes32 requires exactly 64 hex characters (got 66)")
    );
}

#[test]
fn unknown_types_are_free_text() {
    assert_eq!(ScalarKind::from_base_type("fixed128x18"), ScalarKind::String);
    assert!(valid("fixed128x18", "anything"));
    assert!(valid("string", ""));
}

// tests/unit_client_test.rs

use numset::NumsetError;
use numset::client::{parse_number, validate_number};

#[test]
fn test_parse_number_accepts_positive_integers() {
    assert_eq!(parse_number("42").unwrap(), 42);
    assert_eq!(parse_number("  7\n").unwrap(), 7);
    assert_eq!(parse_number(&u64::MAX.to_string()).unwrap(), u64::MAX);
}

#[test]
fn test_parse_number_rejects_bad_input() {
    for raw in ["", "abc", "-1", "1.5", "0", "99999999999999999999999999"] {
        let err = parse_number(raw).unwrap_err();
        assert!(
            matches!(err, NumsetError::InvalidNumber),
            "expected InvalidNumber for {raw:?}, got {err:?}"
        );
    }
}

#[test]
fn test_validate_number_rejects_zero() {
    assert!(validate_number(0).is_err());
    assert!(validate_number(1).is_ok());
}

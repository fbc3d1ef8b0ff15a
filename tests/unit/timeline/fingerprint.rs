use super::*;
use crate::foundation::core::PropertyKey;

fn values(pairs: &[(&str, &str, f64)]) -> ResolvedValues {
    pairs
        .iter()
        .map(|(t, p, v)| (PropertyKey::new(*t, *p), *v))
        .collect()
}

#[test]
fn equal_values_hash_equal() {
    let a = values(&[("#a", "y", 1.5), ("#b", "opacity", 0.25)]);
    let b = values(&[("#b", "opacity", 0.25), ("#a", "y", 1.5)]);
    assert_eq!(fingerprint_values(&a), fingerprint_values(&b));
}

#[test]
fn any_value_change_changes_hash() {
    let a = values(&[("#a", "y", 1.5)]);
    let b = values(&[("#a", "y", 1.5000001)]);
    let c = values(&[("#a", "x", 1.5)]);
    assert_ne!(fingerprint_values(&a), fingerprint_values(&b));
    assert_ne!(fingerprint_values(&a), fingerprint_values(&c));
}

#[test]
fn signed_zero_is_normalized() {
    let a = values(&[("#a", "y", 0.0)]);
    let b = values(&[("#a", "y", -0.0)]);
    assert_eq!(fingerprint_values(&a), fingerprint_values(&b));
}

#[test]
fn display_is_32_hex_digits() {
    let s = fingerprint_values(&ResolvedValues::new()).to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

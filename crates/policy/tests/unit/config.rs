//! # Configuration Tests
//!
//! Defaults, JSON deserialization, policy names, and geometry validation.

use blkcache_policy::config::{CacheConfig, PolicyKind};
use blkcache_policy::PolicyError;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = CacheConfig::default();
    assert_eq!(config.size, 65_536);
    assert_eq!(config.assoc, 256);
    assert_eq!(config.policy, PolicyKind::Lifo);
}

#[test]
fn test_default_geometry_is_valid() {
    let geometry = CacheConfig::default().geometry().unwrap();
    assert_eq!(geometry.num_sets(), 256);
    assert_eq!(geometry.consecutive_shift(), 8);
}

#[test]
fn test_from_json_full() {
    let config = CacheConfig::from_json(r#"{"size": 1024, "assoc": 16, "policy": "LIFO"}"#)
        .unwrap();
    assert_eq!(config.size, 1024);
    assert_eq!(config.assoc, 16);
    assert_eq!(config.policy, PolicyKind::Lifo);
}

#[test]
fn test_from_json_missing_fields_use_defaults() {
    let config = CacheConfig::from_json(r#"{"assoc": 64}"#).unwrap();
    assert_eq!(config.size, 65_536);
    assert_eq!(config.assoc, 64);
    assert_eq!(config.policy, PolicyKind::Lifo);
}

#[rstest]
#[case("LIFO", PolicyKind::Lifo)]
#[case("Lifo", PolicyKind::Lifo)]
#[case("lifo", PolicyKind::Lifo)]
#[case("LRU", PolicyKind::Lru)]
#[case("Fifo", PolicyKind::Fifo)]
fn test_policy_aliases(#[case] name: &str, #[case] expected: PolicyKind) {
    let json = format!(r#"{{"size": 64, "assoc": 4, "policy": "{name}"}}"#);
    assert_eq!(CacheConfig::from_json(&json).unwrap().policy, expected);
}

#[test]
fn test_unknown_policy_is_config_error() {
    let err = CacheConfig::from_json(r#"{"policy": "MRU"}"#).unwrap_err();
    assert!(matches!(err, PolicyError::Config(_)), "got {err:?}");
}

#[test]
fn test_malformed_json_is_config_error() {
    let err = CacheConfig::from_json("{size: 1").unwrap_err();
    assert!(matches!(err, PolicyError::Config(_)), "got {err:?}");
}

#[rstest]
#[case(r#"{"size": 1024, "assoc": 0}"#)]
#[case(r#"{"size": 1024, "assoc": 12}"#)]
#[case(r#"{"size": 1000, "assoc": 16}"#)]
#[case(r#"{"size": 0, "assoc": 16}"#)]
fn test_bad_geometry_rejected(#[case] json: &str) {
    let err = CacheConfig::from_json(json).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidGeometry(_)), "got {err:?}");
}

#[test]
fn test_policy_kind_round_trips_through_strings() {
    for kind in [PolicyKind::Lifo, PolicyKind::Lru, PolicyKind::Fifo] {
        assert_eq!(kind.to_string().parse::<PolicyKind>().unwrap(), kind);
    }
    assert_eq!("lru".parse::<PolicyKind>().unwrap(), PolicyKind::Lru);
}

#[test]
fn test_policy_kind_parse_unknown() {
    assert_eq!(
        "ARC".parse::<PolicyKind>().unwrap_err(),
        PolicyError::UnknownPolicy("ARC".to_owned())
    );
}

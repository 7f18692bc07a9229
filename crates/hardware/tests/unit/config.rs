//! # Configuration Tests
//!
//! Verifies the built-in defaults, JSON deserialization with partial documents, and that
//! per-level geometry validation surfaces through the config types.

use cachesim_core::common::ConfigError;
use cachesim_core::config::{HierarchyConfig, L1Config, L2Config, MemoryConfig, defaults};
use pretty_assertions::assert_eq;

#[test]
fn defaults_describe_the_reference_hierarchy() {
    let config = HierarchyConfig::default();
    assert_eq!(
        config.l1,
        L1Config {
            size_log2: 8,
            block_log2: 4,
            assoc_log2: 0,
            latency: 1,
            write_allocate: true,
        }
    );
    assert_eq!(
        config.l2,
        L2Config {
            size_log2: 10,
            block_log2: 4,
            assoc_log2: 1,
            latency: 10,
        }
    );
    assert_eq!(config.memory, MemoryConfig { latency: 100 });
    assert_eq!(config.memory.latency, defaults::MEMORY_LATENCY);
}

#[test]
fn empty_document_yields_defaults() {
    assert_eq!(HierarchyConfig::from_json("{}").unwrap(), HierarchyConfig::default());
}

#[test]
fn partial_level_keeps_other_defaults() {
    let config = HierarchyConfig::from_json(r#"{ "l2": { "assoc_log2": 3 } }"#).unwrap();
    assert_eq!(config.l2.assoc_log2, 3);
    assert_eq!(config.l2.size_log2, defaults::L2_SIZE_LOG2);
    assert_eq!(config.l1, L1Config::default());
}

#[test]
fn full_document_round_trips_every_field() {
    let json = r#"{
        "l1": { "size_log2": 12, "block_log2": 6, "assoc_log2": 2, "latency": 2, "write_allocate": false },
        "l2": { "size_log2": 18, "block_log2": 6, "assoc_log2": 3, "latency": 14 },
        "memory": { "latency": 250 }
    }"#;
    let config = HierarchyConfig::from_json(json).unwrap();
    assert_eq!(config.l1.block_log2, 6);
    assert!(!config.l1.write_allocate);
    assert_eq!(config.l2.size_log2, 18);
    assert_eq!(config.l2.latency, 14);
    assert_eq!(config.memory.latency, 250);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(HierarchyConfig::from_json(r#"{ "l3": {} }"#).is_err());
    assert!(HierarchyConfig::from_json(r#"{ "l2": { "write_allocate": true } }"#).is_err());
}

#[test]
fn malformed_values_are_rejected() {
    assert!(HierarchyConfig::from_json(r#"{ "l1": { "latency": -1 } }"#).is_err());
    assert!(HierarchyConfig::from_json(r#"{ "l1": { "size_log2": "big" } }"#).is_err());
    assert!(HierarchyConfig::from_json("not json").is_err());
}

#[test]
fn negative_exponent_deserializes_but_fails_geometry() {
    let config = HierarchyConfig::from_json(r#"{ "l1": { "block_log2": -3 } }"#).unwrap();
    assert_eq!(
        config.l1.geometry(),
        Err(ConfigError::NegativeExponent {
            field: "block size",
            value: -3,
        })
    );
}

#[test]
fn level_geometry_matches_exponents() {
    let geometry = L2Config::default().geometry().unwrap();
    assert_eq!(geometry.size_bytes(), 1024);
    assert_eq!(geometry.block_bytes(), 16);
    assert_eq!(geometry.associativity(), 2);

    let uneven = L1Config {
        size_log2: 4,
        block_log2: 4,
        assoc_log2: 1,
        ..L1Config::default()
    };
    assert!(matches!(uneven.geometry(), Err(ConfigError::UnevenSets { .. })));
}

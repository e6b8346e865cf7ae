use std::collections::HashMap;

use ini_tree::{parse, ConfigNode, ConfigTree, IniError, Reader};

const SIMPLE: &str = include_str!("configs/simple.ini");
const INHERITANCE: &str = include_str!("configs/inheritance.ini");
const FULL: &str = include_str!("configs/full.ini");

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn to_json(tree: &ConfigTree) -> serde_json::Value {
    serde_json::to_value(tree).unwrap()
}

#[test]
fn test_simple_section() {
    let config = parse(SIMPLE).unwrap();

    assert_eq!(
        to_json(&config),
        serde_json::json!({"testSection": {"optionA": "1"}})
    );
}

#[test]
fn test_simple_inheritance() {
    let config = parse(INHERITANCE).unwrap();

    assert_eq!(
        to_json(&config),
        serde_json::json!({
            "sectionA": {"optionA": "1"},
            "sectionB": {"optionA": "1", "optionB": "2"}
        })
    );
}

#[test]
fn test_inline_inheritance() {
    let config = parse("[base]\nx=1\n[child:base]\ny=2").unwrap();

    assert_eq!(
        to_json(&config),
        serde_json::json!({"base": {"x": "1"}, "child": {"x": "1", "y": "2"}})
    );
}

#[test]
fn test_full_production() {
    let lookup = vars(&[("TARGET", "production"), ("REGION", "eu")]);
    let config = Reader::new().with_lookup(lookup).parse(FULL).unwrap();

    assert_eq!(
        config.keys().collect::<Vec<_>>(),
        vec!["name", "version", "defaults", "staging", "production", "monitoring"]
    );
    assert_eq!(config.get("version"), Some(&ConfigNode::from("1.4")));
    assert_eq!(
        to_json(&config)["production"],
        serde_json::json!({
            "db": {"host": "db.internal", "port": "5432"},
            "log": {"level": "warn"}
        })
    );
    assert_eq!(
        to_json(&config)["monitoring"],
        serde_json::json!({"endpoint": "https://metrics.internal", "interval": "30"})
    );
}

#[test]
fn test_full_staging() {
    let lookup = vars(&[("TARGET", "staging")]);
    let config = Reader::new().with_lookup(lookup).parse(FULL).unwrap();

    assert!(config.get("monitoring").is_none());
    assert_eq!(
        config.get_path("debug.trace", "."),
        Some(&ConfigNode::from("on"))
    );
    assert_eq!(
        config.get_path("staging.db.port", "."),
        Some(&ConfigNode::from("5432"))
    );
}

#[test]
fn test_skipped_section_leaks_nothing() {
    let config = parse(FULL).unwrap();
    let json = serde_json::to_string(&config).unwrap();

    assert!(!json.contains("metrics.internal"));
    assert!(!json.contains("trace"));
}

#[test]
fn test_unterminated_bracket() {
    let err = parse("[section\nkey = value\n").unwrap_err();

    assert!(matches!(err, IniError::MalformedInput(_)));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_parse_is_repeatable() {
    let reader = Reader::new().with_lookup(vars(&[("TARGET", "production"), ("REGION", "us")]));

    assert_eq!(reader.parse(FULL).unwrap(), reader.parse(FULL).unwrap());
}

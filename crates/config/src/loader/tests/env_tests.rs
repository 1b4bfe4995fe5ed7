//! Environment variable override tests for the configuration loader.
//!
//! Responsibilities:
//! - Test that environment variables override defaults and file values.
//! - Test case sensitivity, prefixes and section-qualified names.
//! - Test coercion of environment strings to the default's kind.
//! - Test that empty/whitespace-only env vars are ignored.

use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;

use super::{env_lock, write_config};
use crate::loader::{ConfigError, ConfigLoader, FileFormat};
use crate::{Environment, Registry, SectionSchema, Value};

fn foo_bar_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register(SectionSchema::root().key("foo", 1).key("bar", 2).build())
        .unwrap();
    registry
}

#[test]
fn test_env_overrides_default() {
    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("FOO", "5")]))
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(5)));
    assert_eq!(config.get(None, "bar"), Some(&Value::Integer(2)));
}

#[test]
fn test_env_overrides_conf_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(temp_dir.path(), FileFormat::Toml, None, json!({"foo": 5, "bar": 6}));

    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_file(&path)
        .with_env(Environment::from_pairs([("BAR", "7")]))
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(5)));
    assert_eq!(config.get(None, "bar"), Some(&Value::Integer(7)));
}

#[test]
fn test_env_case_sensitive() {
    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("FOO", "5"), ("bar", "6")]))
        .case_sensitive(true)
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(1)));
    assert_eq!(config.get(None, "bar"), Some(&Value::Integer(6)));
}

#[test]
fn test_env_prefix() {
    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("APP_FOO", "5"), ("BAR", "6")]))
        .with_env_prefix("APP_")
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(5)));
    assert_eq!(config.get(None, "bar"), Some(&Value::Integer(2)));
}

#[test]
fn test_env_converts_types() {
    let registry = Registry::new();
    registry
        .register(
            SectionSchema::root()
                .key("verbose", false)
                .key("retries", 3)
                .key("ratio", 0.5)
                .key("name", "default")
                .key("tags", vec!["a"])
                .build(),
        )
        .unwrap();

    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([
            ("VERBOSE", "Yes"),
            ("RETRIES", "10"),
            ("RATIO", "0.25"),
            ("NAME", "  custom  "),
            ("TAGS", r#"["x", "y"]"#),
        ]))
        .load()
        .unwrap();
    assert_eq!(config.get(None, "verbose"), Some(&Value::Bool(true)));
    assert_eq!(config.get(None, "retries"), Some(&Value::Integer(10)));
    assert_eq!(config.get(None, "ratio"), Some(&Value::Float(0.25)));
    assert_eq!(config.get(None, "name"), Some(&Value::from("custom")));
    assert_eq!(config.get(None, "tags"), Some(&Value::from(vec!["x", "y"])));
}

#[test]
fn test_env_falsy_bool() {
    for raw in ["n", "no", "f", "false", "off", "0", "OFF"] {
        let registry = Registry::new();
        registry
            .register(SectionSchema::root().key("verbose", true).build())
            .unwrap();
        let config = ConfigLoader::new(&registry)
            .with_env(Environment::from_pairs([("VERBOSE", raw)]))
            .load()
            .unwrap();
        assert_eq!(config.get(None, "verbose"), Some(&Value::Bool(false)), "{raw}");
    }
}

#[test]
fn test_env_types_mismatch() {
    let registry = foo_bar_registry();
    let err = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("BAR", "six")]))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    assert_eq!(err.key(), Some("bar"));
    assert_eq!(err.value(), Some(&Value::from("six")));
}

#[test]
fn test_env_unparseable_number_fails_without_type_check() {
    let registry = Registry::new();
    registry
        .register(SectionSchema::root().key("port", 8080).build())
        .unwrap();
    let err = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("PORT", "abc")]))
        .type_check(false)
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    assert_eq!(err.key(), Some("port"));
    assert_eq!(err.value(), Some(&Value::from("abc")));
    assert!(!registry.is_resolved(None));
}

#[test]
fn test_env_unparseable_bool_kept_without_type_check() {
    let registry = Registry::new();
    registry
        .register(SectionSchema::root().key("verbose", false).build())
        .unwrap();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("VERBOSE", "maybe")]))
        .type_check(false)
        .load()
        .unwrap();
    assert_eq!(config.get(None, "verbose"), Some(&Value::from("maybe")));
}

#[test]
fn test_env_unparseable_bool_is_mismatch() {
    let registry = Registry::new();
    registry
        .register(SectionSchema::root().key("verbose", false).build())
        .unwrap();
    let err = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("VERBOSE", "maybe")]))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
}

#[test]
fn test_env_empty_value_is_ignored() {
    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("FOO", "   "), ("BAR", "")]))
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(1)));
    assert_eq!(config.get(None, "bar"), Some(&Value::Integer(2)));
}

#[test]
fn test_env_section_qualified_names() {
    let registry = Registry::new();
    registry
        .register(SectionSchema::named("db").key("port", 5432).build())
        .unwrap();
    registry
        .register(SectionSchema::named("cache").key("port", 6379).build())
        .unwrap();

    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("DB__PORT", "6000")]))
        .load()
        .unwrap();
    assert_eq!(config.get(Some("db"), "port"), Some(&Value::Integer(6000)));
    assert_eq!(config.get(Some("cache"), "port"), Some(&Value::Integer(6379)));
}

#[test]
fn test_env_bare_name_applies_to_all_sections() {
    let registry = Registry::new();
    registry
        .register(SectionSchema::named("db").key("port", 5432).build())
        .unwrap();
    registry
        .register(SectionSchema::named("cache").key("port", 6379).build())
        .unwrap();

    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("PORT", "7000"), ("CACHE__PORT", "7001")]))
        .load()
        .unwrap();
    assert_eq!(config.get(Some("db"), "port"), Some(&Value::Integer(7000)));
    assert_eq!(config.get(Some("cache"), "port"), Some(&Value::Integer(7001)));
}

#[test]
fn test_env_custom_parser() {
    let registry = foo_bar_registry();
    let config = ConfigLoader::new(&registry)
        .with_env(Environment::from_pairs([("FOO", "0x10")]))
        .with_env_parser(|_name, raw, _default| {
            let digits = raw.trim_start_matches("0x");
            i64::from_str_radix(digits, 16)
                .map(Value::Integer)
                .map_err(|_| ConfigError::DotenvUnknown)
        })
        .load()
        .unwrap();
    assert_eq!(config.get(None, "foo"), Some(&Value::Integer(16)));
}

#[test]
#[serial]
fn test_process_env_overrides_default() {
    let _lock = env_lock().lock().unwrap();
    temp_env::with_vars(
        [("CONFIX_TEST_FOO", Some("42")), ("CONFIX_TEST_BAR", None)],
        || {
            let registry = foo_bar_registry();
            let config = ConfigLoader::new(&registry)
                .from_env()
                .with_env_prefix("CONFIX_TEST_")
                .load()
                .unwrap();
            assert_eq!(config.get(None, "foo"), Some(&Value::Integer(42)));
            assert_eq!(config.get(None, "bar"), Some(&Value::Integer(2)));
        },
    );
}

#[test]
#[serial]
fn test_process_env_whitespace_is_unset() {
    let _lock = env_lock().lock().unwrap();
    temp_env::with_vars([("CONFIX_TEST_FOO", Some("  \t "))], || {
        let registry = foo_bar_registry();
        let config = ConfigLoader::new(&registry)
            .from_env()
            .with_env_prefix("CONFIX_TEST_")
            .load()
            .unwrap();
        assert_eq!(config.get(None, "foo"), Some(&Value::Integer(1)));
    });
}

//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test file loading across formats against a registry.
//! - Test environment variable handling and precedence.
//! - Test `.env` loading and its `DOTENV_DISABLED` gate.
//! - Test schema validation through the full loader path.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::loader::FileFormat;

pub mod env_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Write a flat JSON object to `dir` in the given format and return the path.
///
/// INI output places every key under `[section]` when one is given.
pub fn write_config(
    dir: &Path,
    format: FileFormat,
    section: Option<&str>,
    values: serde_json::Value,
) -> PathBuf {
    let path = dir.join(format!("config.{}", format.extensions()[0]));
    let values = match section {
        Some(name) => serde_json::json!({ name: values }),
        None => values,
    };
    let text = match format {
        FileFormat::Json => serde_json::to_string_pretty(&values).unwrap(),
        FileFormat::Yaml => serde_yaml::to_string(&values).unwrap(),
        FileFormat::Toml => toml::to_string(&values).unwrap(),
        FileFormat::Ini => to_ini(&values),
    };
    std::fs::write(&path, text).unwrap();
    path
}

fn to_ini(values: &serde_json::Value) -> String {
    let mut out = String::new();
    let object = values.as_object().unwrap();
    for (key, value) in object {
        if !value.is_object() {
            out.push_str(&format!("{key} = {}\n", ini_literal(value)));
        }
    }
    for (key, value) in object {
        if let Some(inner) = value.as_object() {
            out.push_str(&format!("[{key}]\n"));
            for (k, v) in inner {
                out.push_str(&format!("{k} = {}\n", ini_literal(v)));
            }
        }
    }
    out
}

fn ini_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

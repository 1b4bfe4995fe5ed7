//! TOML formatter implementation.
//!
//! Responsibilities:
//! - Format resolved configurations as TOML, the inverse of loading a `.toml` file.
//!
//! Does NOT handle:
//! - Other output formats.
//!
//! Invariants:
//! - Null values are omitted, including nulls nested inside lists and maps.

use crate::formatters::{FormatInfo, FormatList, Formatter};
use anyhow::{Context, Result};
use confix::{Mapping, Value};

/// TOML formatter.
pub struct TomlFormatter;

/// Drop nulls recursively, since TOML cannot represent them.
fn strip_nulls(mapping: &Mapping) -> Mapping {
    mapping
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), strip_value(value)))
        .collect()
}

fn strip_value(value: &Value) -> Value {
    match value {
        Value::Map(inner) => Value::Map(strip_nulls(inner)),
        Value::List(items) => Value::List(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(strip_value)
                .collect(),
        ),
        other => other.clone(),
    }
}

impl Formatter for TomlFormatter {
    fn format_config(&self, config: &Mapping) -> Result<String> {
        ::toml::to_string(&strip_nulls(config))
            .context("Failed to serialize configuration as TOML")
    }

    fn format_formats(&self, formats: &[FormatInfo]) -> Result<String> {
        Ok(::toml::to_string(&FormatList { formats })?)
    }
}

//! Environment variable matching and coercion.
//!
//! Responsibilities:
//! - Capture environment variables (process or injected) in an `Environment`.
//! - Match variables against declared keys, bare (`PORT`) or section-qualified (`DATABASE__PORT`).
//! - Coerce matched string values to the kind of the declared default.
//!
//! Does NOT handle:
//! - Loading `.env` files (see `ConfigLoader::load_dotenv`).
//! - Type checking or validation of coerced values (see `merge::engine`).
//!
//! Invariants:
//! - Only declared keys are matched; every other variable is ignored.
//! - Empty or whitespace-only variables are treated as unset; values are trimmed.
//! - Section-qualified names outrank bare names.
//! - A bare name matching keys in several sections applies to all of them and logs a warning.

use std::collections::BTreeMap;

use super::engine::ResolveOptions;
use crate::constants::{ENV_FALSY, ENV_SECTION_SEPARATOR, ENV_TRUTHY};
use crate::loader::ConfigError;
use crate::section::{SectionLabel, SectionSchema};
use crate::value::{Mapping, Value};

/// A snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment. Non-UTF-8 variables are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Look up `name`, returning the matched variable name and trimmed value.
    ///
    /// Exact matches win over case-insensitive ones.
    pub fn get(&self, name: &str, case_sensitive: bool) -> Option<(&str, &str)> {
        let found = match self.vars.get_key_value(name) {
            Some(pair) => Some(pair),
            None if !case_sensitive => self
                .vars
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name)),
            None => None,
        };
        found.and_then(|(k, v)| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some((k.as_str(), trimmed))
            }
        })
    }
}

/// Coerce a raw environment string to the kind of `default`.
///
/// Values that cannot be coerced are returned unchanged as strings.
/// [`collect_env_overrides`] rejects such strings for numeric defaults; for
/// other kinds the engine's type check reports them.
pub fn coerce_env_value(raw: &str, default: Option<&Value>) -> Value {
    let coerced = match default {
        Some(Value::Bool(_)) => {
            let lower = raw.to_ascii_lowercase();
            if ENV_TRUTHY.contains(&lower.as_str()) {
                Some(Value::Bool(true))
            } else if ENV_FALSY.contains(&lower.as_str()) {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        Some(Value::Integer(_)) => raw.parse::<i64>().ok().map(Value::Integer),
        Some(Value::Float(_)) => raw.parse::<f64>().ok().map(Value::Float),
        Some(Value::List(_)) | Some(Value::Map(_)) => serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .map(Value::from)
            .filter(|value| Some(value.kind()) == default.map(Value::kind)),
        _ => None,
    };
    coerced.unwrap_or_else(|| Value::String(raw.to_string()))
}

fn env_name(prefix: Option<&str>, section: Option<&str>, key: &str) -> String {
    let mut name = prefix.unwrap_or_default().to_string();
    if let Some(section) = section {
        name.push_str(section);
        name.push_str(ENV_SECTION_SEPARATOR);
    }
    name.push_str(key);
    name
}

/// Collect coerced environment overrides for every declared key of `sections`.
///
/// The result maps each section name to the keys matched for it.
pub fn collect_env_overrides(
    env: &Environment,
    sections: &[&SectionSchema],
    options: &ResolveOptions,
) -> Result<BTreeMap<Option<String>, Mapping>, ConfigError> {
    let prefix = options.env_prefix.as_deref();
    let mut bare_hits: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();
    let mut out: BTreeMap<Option<String>, Mapping> = BTreeMap::new();

    for section in sections {
        for (key, schema) in section.keys() {
            let qualified = section
                .name()
                .map(|name| env_name(prefix, Some(name), key))
                .and_then(|name| env.get(&name, options.case_sensitive));

            let matched = match qualified {
                Some(hit) => Some(hit),
                None => {
                    let hit = env.get(&env_name(prefix, None, key), options.case_sensitive);
                    if let Some((var, _)) = hit {
                        bare_hits
                            .entry(var.to_string())
                            .or_default()
                            .push(section.name().map(str::to_string));
                    }
                    hit
                }
            };

            let Some((var, raw)) = matched else {
                continue;
            };

            let value = match &options.env_parser {
                Some(parser) => parser(var, raw, schema.default_value())?,
                None => {
                    let value = coerce_env_value(raw, schema.default_value());
                    // A number that does not parse is rejected even without type checking.
                    if let Some(default @ (Value::Integer(_) | Value::Float(_))) =
                        schema.default_value()
                        && matches!(value, Value::String(_))
                    {
                        return Err(ConfigError::TypeMismatch {
                            section: section.name().map(str::to_string),
                            key: key.to_string(),
                            default: default.clone(),
                            value,
                        });
                    }
                    value
                }
            };
            tracing::debug!(
                section = %section.label(),
                key,
                env_var = var,
                kind = %value.kind(),
                "matched environment variable"
            );
            out.entry(section.name().map(str::to_string))
                .or_default()
                .insert(key.to_string(), value);
        }
    }

    for (var, hit_sections) in bare_hits {
        if hit_sections.len() > 1 {
            let labels = hit_sections
                .iter()
                .map(|s| SectionLabel(s.as_deref()).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                env_var = %var,
                sections = %labels,
                "environment variable matches a key in several sections; applying to all of them \
                 (use SECTION{}KEY to target one)",
                ENV_SECTION_SEPARATOR
            );
        }
    }

    Ok(out)
}

//! The override-and-validate merge engine.
//!
//! Responsibilities:
//! - Resolve one section from its declared schema, its file overrides and its
//!   environment overrides.
//! - Enforce strict-schema semantics: unknown keys, type drift, validators and
//!   required keys.
//!
//! Does NOT handle:
//! - Resolved-state bookkeeping or locking (see `registry`).
//! - Parsing files or scanning the environment (see `loader` and `merge::env`).
//!
//! Invariants:
//! - Precedence per key is environment > file > declared default.
//! - Type checks only apply to overridden values whose default and new value are both non-null.
//! - Required keys are checked after every declared key has been processed.
//! - A failed resolve has no side effects.

use std::fmt;
use std::sync::Arc;

use crate::loader::ConfigError;
use crate::resolved::ResolvedSection;
use crate::section::SectionSchema;
use crate::value::{Mapping, Value};

/// Custom environment coercion: `(variable name, raw value, declared default)`.
pub type EnvParser =
    Arc<dyn Fn(&str, &str, Option<&Value>) -> Result<Value, ConfigError> + Send + Sync>;

/// Options controlling a resolve call.
#[derive(Clone)]
pub struct ResolveOptions {
    /// Reject overrides whose kind differs from the default's kind.
    pub type_check: bool,
    /// Match environment variable names case-sensitively.
    pub case_sensitive: bool,
    /// Prefix prepended to every environment variable name that is looked up.
    pub env_prefix: Option<String>,
    /// Replaces the built-in environment coercion when set.
    pub env_parser: Option<EnvParser>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            type_check: true,
            case_sensitive: false,
            env_prefix: None,
            env_parser: None,
        }
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("type_check", &self.type_check)
            .field("case_sensitive", &self.case_sensitive)
            .field("env_prefix", &self.env_prefix)
            .field("env_parser", &self.env_parser.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ResolveOptions {
    pub fn with_type_check(mut self, enabled: bool) -> Self {
        self.type_check = enabled;
        self
    }

    pub fn with_case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn with_env_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str, &str, Option<&Value>) -> Result<Value, ConfigError> + Send + Sync + 'static,
    {
        self.env_parser = Some(Arc::new(parser));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Environment,
    File,
    Default,
}

impl Source {
    fn as_str(self) -> &'static str {
        match self {
            Source::Environment => "environment",
            Source::File => "file",
            Source::Default => "default",
        }
    }
}

/// Resolve one section.
///
/// `file` holds the file-derived overrides for this section and `env` the
/// already-coerced environment overrides (see
/// [`collect_env_overrides`](super::collect_env_overrides)).
pub fn resolve_section(
    section: &SectionSchema,
    file: Option<&Mapping>,
    env: Option<&Mapping>,
    options: &ResolveOptions,
) -> Result<ResolvedSection, ConfigError> {
    let section_name = || section.name().map(str::to_string);

    if let Some(file) = file
        && let Some((key, value)) = file.iter().find(|(key, _)| !section.contains_key(key))
    {
        return Err(ConfigError::UnrecognizedKey {
            section: section_name(),
            key: key.clone(),
            value: value.clone(),
        });
    }

    let mut values = Mapping::new();
    let mut missing = Vec::new();

    for (key, schema) in section.keys() {
        let candidate = env
            .and_then(|env| env.get(key))
            .map(|value| (value, Source::Environment))
            .or_else(|| file.and_then(|file| file.get(key)).map(|v| (v, Source::File)))
            .or_else(|| schema.default_value().map(|v| (v, Source::Default)));

        let Some((value, source)) = candidate else {
            missing.push(key);
            continue;
        };

        let type_check = schema.type_check().unwrap_or(options.type_check);
        if source != Source::Default
            && type_check
            && let Some(default) = schema.default_value()
            && !default.is_null()
            && !value.is_null()
            && default.kind() != value.kind()
        {
            return Err(ConfigError::TypeMismatch {
                section: section_name(),
                key: key.to_string(),
                default: default.clone(),
                value: value.clone(),
            });
        }

        if let Err(invalid) = schema.validate(value) {
            return Err(ConfigError::ValidationFailed {
                section: section_name(),
                key: key.to_string(),
                value: value.clone(),
                message: invalid.into_message(),
            });
        }

        tracing::debug!(
            section = %section.label(),
            key,
            source = source.as_str(),
            "resolved key"
        );
        values.insert(key.to_string(), value.clone());
    }

    if let Some(key) = missing.first() {
        return Err(ConfigError::RequiredKeyMissing {
            section: section_name(),
            key: key.to_string(),
        });
    }

    Ok(ResolvedSection::new(section_name(), values))
}

//! Schema declaration files.
//!
//! Responsibilities:
//! - Deserialize a declaration file (TOML, JSON or YAML) describing sections and keys.
//! - Translate declarations into `SectionSchema`s with built-in validators.
//! - Register every declared section in a fresh `Registry`.
//!
//! Does NOT handle:
//! - Resolving configuration (see `commands::check`).
//! - Custom validator code; only the built-in validators can be declared.
//!
//! Invariants:
//! - A key is either `required` or has a `default`, never both.
//! - A key with neither is optional with a null default.
//! - Declaration files are parsed with the same parsers as configuration files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use confix::{
    ConfigError, Registry, Schema, SectionLabel, SectionSchema, Value, ValueKind, validators,
};
use serde::Deserialize;

/// Errors raised while reading or interpreting a declaration file.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("Failed to load schema declaration {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("Invalid schema declaration {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Key '{key}' in section '{section}' is declared both required and with a default")]
    RequiredWithDefault { section: String, key: String },

    #[error("Range validator on key '{key}' has min {min} greater than max {max}")]
    EmptyRange { key: String, min: f64, max: f64 },

    #[error("Failed to register section")]
    Register(#[source] ConfigError),
}

/// Top-level declaration document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    #[serde(default)]
    pub sections: Vec<SectionDecl>,
}

/// One declared section; a missing name declares the root section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDecl {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub keys: BTreeMap<String, KeyDecl>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyDecl {
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub type_check: Option<bool>,
    #[serde(default)]
    pub validators: Vec<ValidatorDecl>,
}

/// Built-in validators that can be named in a declaration.
///
/// `non_empty` is written as a plain string, the others as single-key tables,
/// e.g. `{ range = { min = 1, max = 10 } }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorDecl {
    NonEmpty,
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    OneOf(Vec<Value>),
    Kind(ValueKind),
}

impl Declaration {
    /// Read a declaration file, detecting its format from the extension.
    pub fn load(path: &Path) -> Result<Self, DeclarationError> {
        let mapping = confix::load_file(path).map_err(|source| DeclarationError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let declaration: Declaration = serde_json::from_value(Value::Map(mapping).to_json())
            .map_err(|e| DeclarationError::Invalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!(
            path = %path.display(),
            sections = declaration.sections.len(),
            "loaded schema declaration"
        );
        Ok(declaration)
    }

    /// Build a registry holding every declared section.
    pub fn into_registry(self) -> Result<Registry, DeclarationError> {
        let registry = Registry::new();
        for section in self.sections {
            registry
                .register(section.into_schema()?)
                .map_err(DeclarationError::Register)?;
        }
        Ok(registry)
    }
}

impl SectionDecl {
    fn into_schema(self) -> Result<SectionSchema, DeclarationError> {
        let label = SectionLabel(self.name.as_deref()).to_string();
        let mut builder = match self.name {
            Some(name) => SectionSchema::named(name),
            None => SectionSchema::root(),
        };
        for (key, decl) in self.keys {
            let schema = decl.into_schema(&label, &key)?;
            builder = builder.schema(key, schema);
        }
        Ok(builder.build())
    }
}

impl KeyDecl {
    fn into_schema(self, section: &str, key: &str) -> Result<Schema, DeclarationError> {
        let mut schema = match (self.required, self.default) {
            (true, Some(_)) => {
                return Err(DeclarationError::RequiredWithDefault {
                    section: section.to_string(),
                    key: key.to_string(),
                });
            }
            (true, None) => Schema::required(),
            (false, default) => Schema::new(default.unwrap_or(Value::Null)),
        };
        if let Some(enabled) = self.type_check {
            schema = schema.with_type_check(enabled);
        }
        for validator in self.validators {
            schema = schema.with_validator(validator.build(key)?);
        }
        Ok(schema)
    }
}

impl ValidatorDecl {
    fn build(self, key: &str) -> Result<confix::Validator, DeclarationError> {
        Ok(match self {
            ValidatorDecl::NonEmpty => validators::non_empty(),
            ValidatorDecl::Range { min, max } => {
                let min = min.unwrap_or(f64::NEG_INFINITY);
                let max = max.unwrap_or(f64::INFINITY);
                if min > max {
                    return Err(DeclarationError::EmptyRange {
                        key: key.to_string(),
                        min,
                        max,
                    });
                }
                validators::range(min, max)
            }
            ValidatorDecl::OneOf(allowed) => validators::one_of(allowed),
            ValidatorDecl::Kind(kind) => validators::kind(kind),
        })
    }
}

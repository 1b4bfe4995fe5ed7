//! Error types for configuration loading and resolution.
//!
//! Responsibilities:
//! - Define error variants for every registration, resolution and loading failure.
//! - Carry section, key and received value for user-facing diagnostics.
//!
//! Does NOT handle:
//! - Exit code mapping (see the CLI crate).
//!
//! Invariants:
//! - Key-level variants always include the section (or `None` for the root), the key and the value.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.
//! - Every error aborts the current call; nothing is retried internally.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::section::SectionLabel;
use crate::value::Value;

/// Errors that can occur while registering, loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "config provides key '{}.{key}' with value {value} but '{key}' is not declared",
        SectionLabel(section.as_deref())
    )]
    UnrecognizedKey {
        section: Option<String>,
        key: String,
        value: Value,
    },

    #[error(
        "type mismatch for key '{}.{key}': expected {} (default {default}), got {value}",
        SectionLabel(section.as_deref()),
        default.kind()
    )]
    TypeMismatch {
        section: Option<String>,
        key: String,
        default: Value,
        value: Value,
    },

    #[error(
        "key '{}.{key}' is required but no value was provided",
        SectionLabel(section.as_deref())
    )]
    RequiredKeyMissing { section: Option<String>, key: String },

    #[error(
        "'{}.{key}' {}",
        SectionLabel(section.as_deref()),
        validation_detail(message.as_deref(), value)
    )]
    ValidationFailed {
        section: Option<String>,
        key: String,
        value: Value,
        message: Option<String>,
    },

    #[error("section '{}' is already registered", SectionLabel(section.as_deref()))]
    AlreadyRegistered { section: Option<String> },

    #[error("root key '{name}' has the same name as the section '{name}'")]
    SectionKeyCollision { name: String },

    #[error(
        "section '{}' is already resolved (discard the registry to resolve again)",
        SectionLabel(section.as_deref())
    )]
    AlreadyResolved { section: Option<String> },

    #[error("section '{}' has not been resolved yet", SectionLabel(section.as_deref()))]
    NotYetResolved { section: Option<String> },

    #[error("section '{}' is not registered", SectionLabel(section.as_deref()))]
    UnknownSection { section: Option<String> },

    #[error("no configuration sections are registered")]
    NoSectionsRegistered,

    #[error("don't know how to parse {}: extension not supported", path.display())]
    UnsupportedFileFormat { path: PathBuf },

    #[error("INI files require every registered section to be named")]
    IniRequiresNamedSections,

    #[error("a file format was given but no config file")]
    FormatWithoutFile,

    #[error("Failed to read config file at {}", path.display())]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {message}", path.display())]
    ConfigFileParse { path: PathBuf, message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

fn validation_detail(message: Option<&str>, value: &Value) -> String {
    match message {
        Some(message) => format!("{message} (got {value})"),
        None => format!("value is invalid (got {value})"),
    }
}

impl ConfigError {
    /// The section the error refers to, if any.
    pub fn section(&self) -> Option<&str> {
        match self {
            ConfigError::UnrecognizedKey { section, .. }
            | ConfigError::TypeMismatch { section, .. }
            | ConfigError::RequiredKeyMissing { section, .. }
            | ConfigError::ValidationFailed { section, .. }
            | ConfigError::AlreadyRegistered { section }
            | ConfigError::AlreadyResolved { section }
            | ConfigError::NotYetResolved { section }
            | ConfigError::UnknownSection { section } => section.as_deref(),
            _ => None,
        }
    }

    /// The offending key, for key-level errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::UnrecognizedKey { key, .. }
            | ConfigError::TypeMismatch { key, .. }
            | ConfigError::RequiredKeyMissing { key, .. }
            | ConfigError::ValidationFailed { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The value received for the offending key, when one was received.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ConfigError::UnrecognizedKey { value, .. }
            | ConfigError::TypeMismatch { value, .. }
            | ConfigError::ValidationFailed { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True for errors caused by the content of a configuration source
    /// rather than by how the library was driven.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            ConfigError::UnrecognizedKey { .. }
                | ConfigError::TypeMismatch { .. }
                | ConfigError::RequiredKeyMissing { .. }
                | ConfigError::ValidationFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_without_custom_message_shows_value() {
        let err = ConfigError::ValidationFailed {
            section: None,
            key: "foo".into(),
            value: Value::Integer(5),
            message: None,
        };
        assert_eq!(err.to_string(), "'<root>.foo' value is invalid (got 5)");
    }

    #[test]
    fn test_validation_message_with_custom_message() {
        let err = ConfigError::ValidationFailed {
            section: Some("db".into()),
            key: "port".into(),
            value: Value::Integer(0),
            message: Some("must be positive".into()),
        };
        assert_eq!(err.to_string(), "'db.port' must be positive (got 0)");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = ConfigError::TypeMismatch {
            section: None,
            key: "bar".into(),
            default: Value::Integer(2),
            value: Value::from("6"),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for key '<root>.bar': expected integer (default 2), got \"6\""
        );
    }

    #[test]
    fn test_accessors() {
        let err = ConfigError::UnrecognizedKey {
            section: Some("app".into()),
            key: "apple".into(),
            value: Value::Integer(6),
        };
        assert_eq!(err.section(), Some("app"));
        assert_eq!(err.key(), Some("apple"));
        assert_eq!(err.value(), Some(&Value::Integer(6)));
        assert!(err.is_invalid_config());
        assert!(!ConfigError::NoSectionsRegistered.is_invalid_config());
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = ConfigError::UnsupportedFileFormat {
            path: PathBuf::from("conf.xml"),
        };
        let msg = err.to_string();
        assert!(msg.contains("don't know how to parse"));
        assert!(msg.contains("extension not supported"));
    }
}

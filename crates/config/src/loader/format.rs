//! Configuration file formats.
//!
//! Responsibilities:
//! - Detect the file format from a path's extension.
//! - Parse YAML, JSON, TOML and INI text into a plain `Mapping`.
//!
//! Does NOT handle:
//! - Deciding which keys are valid (see `merge`).
//!
//! Invariants:
//! - Empty or whitespace-only input is an empty mapping for every format.
//! - The document root must be a mapping.
//! - INI properties outside any `[section]` land at the root; sections become nested maps.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::constants::{
    INI_EXTENSIONS, INI_FALSY, INI_TRUTHY, JSON_EXTENSIONS, TOML_EXTENSIONS, YAML_EXTENSIONS,
};
use crate::value::{Mapping, Value};

/// A supported configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
    Ini,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Yaml,
        FileFormat::Json,
        FileFormat::Toml,
        FileFormat::Ini,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FileFormat::Yaml => "yaml",
            FileFormat::Json => "json",
            FileFormat::Toml => "toml",
            FileFormat::Ini => "ini",
        }
    }

    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFormat::Yaml => YAML_EXTENSIONS,
            FileFormat::Json => JSON_EXTENSIONS,
            FileFormat::Toml => TOML_EXTENSIONS,
            FileFormat::Ini => INI_EXTENSIONS,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Detect the format of `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFileFormat` for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ConfigError::UnsupportedFileFormat {
                path: path.to_path_buf(),
            })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| {
            format!(
                "unknown format '{s}' (expected one of: {})",
                Self::ALL.map(FileFormat::name).join(", ")
            )
        })
    }
}

/// Parse `text` as `format`.
pub fn parse_str(format: FileFormat, text: &str) -> Result<Mapping, ConfigError> {
    parse_with_origin(format, text, Path::new("<string>"))
}

/// Read and parse a configuration file, detecting its format from the extension.
pub fn load_file(path: &Path) -> Result<Mapping, ConfigError> {
    let format = FileFormat::from_path(path)?;
    load_file_as(path, format)
}

/// Read and parse a configuration file with an explicit format.
pub fn load_file_as(path: &Path, format: FileFormat) -> Result<Mapping, ConfigError> {
    tracing::debug!(path = %path.display(), %format, "loading config file");
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_origin(format, &text, path)
}

/// Read and parse an already-open configuration source.
pub fn load_reader<R: Read>(mut reader: R, format: FileFormat) -> Result<Mapping, ConfigError> {
    let origin = Path::new("<reader>");
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ConfigError::ConfigFileRead {
            path: origin.to_path_buf(),
            source,
        })?;
    parse_with_origin(format, &text, origin)
}

pub(crate) fn parse_with_origin(
    format: FileFormat,
    text: &str,
    origin: &Path,
) -> Result<Mapping, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let parse_error = |message: String| ConfigError::ConfigFileParse {
        path: origin.to_path_buf(),
        message,
    };

    let root = match format {
        FileFormat::Yaml => {
            let raw: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
            Value::try_from(raw).map_err(parse_error)?
        }
        FileFormat::Json => {
            let raw: serde_json::Value =
                serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?;
            Value::from(raw)
        }
        FileFormat::Toml => {
            let table: toml::Table =
                toml::from_str(text).map_err(|e| parse_error(e.to_string()))?;
            Value::from(toml::Value::Table(table))
        }
        FileFormat::Ini => return parse_ini(text).map_err(parse_error),
    };

    match root {
        Value::Map(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(parse_error(format!(
            "document root must be a mapping, got {}",
            other.kind()
        ))),
    }
}

fn parse_ini(text: &str) -> Result<Mapping, String> {
    let ini = ini::Ini::load_from_str(text).map_err(|e| e.to_string())?;
    let mut out = Mapping::new();

    for (section, properties) in ini.iter() {
        let values: Mapping = properties
            .iter()
            .map(|(key, raw)| (key.to_string(), ini_value(raw)))
            .collect();
        match section {
            None => out.extend(values),
            Some(name) => {
                let entry = out
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Map(Mapping::new()));
                match entry {
                    Value::Map(existing) => existing.extend(values),
                    _ => {
                        return Err(format!(
                            "section [{name}] clashes with a top-level property of the same name"
                        ));
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Type an INI literal: integers, booleans and floats are recognized, anything else is a string.
fn ini_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && let Ok(i) = trimmed.parse::<i64>()
    {
        return Value::Integer(i);
    }
    if INI_TRUTHY.contains(&lower.as_str()) {
        return Value::Bool(true);
    }
    if INI_FALSY.contains(&lower.as_str()) {
        return Value::Bool(false);
    }
    let non_finite = lower.trim_start_matches(['-', '+']);
    if !matches!(non_finite, "inf" | "infinity" | "nan")
        && let Ok(f) = trimmed.parse::<f64>()
    {
        return Value::Float(f);
    }
    Value::String(trimmed.to_string())
}

//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide multiple output formats: JSON, YAML and TOML.
//! - Implement the `Formatter` trait for resolved configurations and the format listing.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings, see `common::output_result`).
//!
//! ## Null Value Handling
//!
//! | Format | Null representation |
//! |--------|---------------------|
//! | JSON | `null` |
//! | YAML | `null` |
//! | TOML | key omitted (TOML has no null) |

use anyhow::Result;
use confix::{FileFormat, Mapping};
use serde::Serialize;

mod common;
mod json;
mod toml;
mod yaml;

pub use common::output_result;
pub use json::JsonFormatter;
pub use toml::TomlFormatter;
pub use yaml::YamlFormatter;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "toml" => Ok(OutputFormat::Toml),
            _ => anyhow::bail!(
                "Invalid output format: {}. Valid options: json, yaml, toml",
                s
            ),
        }
    }
}

/// One supported configuration file format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub name: &'static str,
    pub extensions: Vec<&'static str>,
}

impl From<FileFormat> for FormatInfo {
    fn from(format: FileFormat) -> Self {
        Self {
            name: format.name(),
            extensions: format.extensions().to_vec(),
        }
    }
}

/// Wrapper so table-rooted formats (TOML) can hold the listing.
#[derive(Serialize)]
struct FormatList<'a> {
    formats: &'a [FormatInfo],
}

/// Formatter trait for different output types.
pub trait Formatter {
    /// Format a resolved configuration mapping.
    fn format_config(&self, config: &Mapping) -> Result<String>;

    /// Format the list of supported file formats.
    fn format_formats(&self, formats: &[FormatInfo]) -> Result<String>;
}

/// Get a formatter for the specified output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
        OutputFormat::Toml => Box::new(TomlFormatter),
    }
}

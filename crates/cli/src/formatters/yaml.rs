//! YAML formatter implementation.
//!
//! Responsibilities:
//! - Format resolved configurations as YAML.
//! - Human-friendly configuration export format.
//!
//! Does NOT handle:
//! - Other output formats.

use crate::formatters::{FormatInfo, Formatter};
use anyhow::Result;
use confix::Mapping;

/// YAML formatter.
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format_config(&self, config: &Mapping) -> Result<String> {
        Ok(serde_yaml::to_string(config)?)
    }

    fn format_formats(&self, formats: &[FormatInfo]) -> Result<String> {
        Ok(serde_yaml::to_string(formats)?)
    }
}

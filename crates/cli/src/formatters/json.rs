//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format resolved configurations and format listings as pretty-printed JSON.
//!
//! Does NOT handle:
//! - Other output formats.

use crate::formatters::{FormatInfo, Formatter};
use anyhow::Result;
use confix::Mapping;

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_config(&self, config: &Mapping) -> Result<String> {
        let mut output = serde_json::to_string_pretty(config)?;
        output.push('\n');
        Ok(output)
    }

    fn format_formats(&self, formats: &[FormatInfo]) -> Result<String> {
        let mut output = serde_json::to_string_pretty(formats)?;
        output.push('\n');
        Ok(output)
    }
}

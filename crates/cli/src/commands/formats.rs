//! Formats command: list supported configuration file formats.

use anyhow::Result;
use confix::FileFormat;
use std::path::PathBuf;

use crate::formatters::{FormatInfo, OutputFormat, get_formatter, output_result};

pub fn run(output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let formats: Vec<FormatInfo> = FileFormat::ALL.into_iter().map(FormatInfo::from).collect();
    let output = get_formatter(format).format_formats(&formats)?;
    output_result(&output, format, output_file.as_deref())
}

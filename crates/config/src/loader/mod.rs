//! Configuration loading from files and the environment.
//!
//! Responsibilities:
//! - Parse YAML, JSON, TOML and INI files into plain mappings.
//! - Provide a builder-pattern `ConfigLoader` that resolves a registry from a file and the environment.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Merge and validation rules (see `merge`).
//! - Section declaration (see `section` and `registry`).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over file values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy` is called.

mod builder;
mod error;
mod format;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use error::ConfigError;
pub use format::{FileFormat, load_file, load_file_as, load_reader, parse_str};

//! Centralized constants for the confix workspace.
//!
//! This module contains the literal sets and names shared by the merge
//! engine, the loaders and the CLI.

// =============================================================================
// Schema
// =============================================================================

/// Keys starting with this prefix are never part of a section's schema.
pub const RESERVED_KEY_PREFIX: &str = "_";

// =============================================================================
// Environment
// =============================================================================

/// Separator between section name and key in a section-qualified
/// environment variable (e.g. `DATABASE__PASSWORD`).
pub const ENV_SECTION_SEPARATOR: &str = "__";

/// String literals coerced to `true` when the declared default is a bool.
pub const ENV_TRUTHY: &[&str] = &["y", "yes", "t", "true", "on", "1"];

/// String literals coerced to `false` when the declared default is a bool.
pub const ENV_FALSY: &[&str] = &["n", "no", "f", "false", "off", "0"];

/// Setting this variable to `1` or `true` disables `.env` loading.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// INI
// =============================================================================

/// INI literals typed as `true`. Digit-only values are integers, so `1` is not listed.
pub const INI_TRUTHY: &[&str] = &["yes", "true", "on"];

/// INI literals typed as `false`.
pub const INI_FALSY: &[&str] = &["no", "false", "off"];

// =============================================================================
// File formats
// =============================================================================

pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];
pub const JSON_EXTENSIONS: &[&str] = &["json"];
pub const TOML_EXTENSIONS: &[&str] = &["toml"];
pub const INI_EXTENSIONS: &[&str] = &["ini", "cfg"];

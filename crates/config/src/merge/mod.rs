//! Override merging.
//!
//! Responsibilities:
//! - Split parsed override mappings by section.
//! - Match and coerce environment variables against declared keys.
//! - Resolve each section under strict-schema rules.
//!
//! Does NOT handle:
//! - Resolved-state tracking or locking (see `registry`).
//! - File I/O (see `loader`).
//!
//! Invariants / Assumptions:
//! - Override precedence is environment > file > declared default.
//! - Each section is validated independently.

mod engine;
mod env;
mod overrides;

pub use engine::{EnvParser, ResolveOptions, resolve_section};
pub use env::{Environment, coerce_env_value, collect_env_overrides};
pub use overrides::split_overrides;

//! Shared test utilities for confix CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide fixture writers for schema declarations and config files.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `CONFIX_CONFIG_PATH` and `RUST_LOG` are cleared so the host cannot leak in.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Returns a hermetic `confix` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Host variables that change CLI behavior are cleared.
pub fn confix_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confix");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env_remove("CONFIX_CONFIG_PATH").env_remove("RUST_LOG");

    cmd
}

/// A declaration with a root section and a `database` section.
#[allow(dead_code)]
pub const APP_SCHEMA: &str = r#"
[[sections]]
keys.debug = { default = false }
keys.name = { default = "service", validators = ["non_empty"] }

[[sections]]
name = "database"

[sections.keys.host]
default = "localhost"

[sections.keys.port]
default = 5432
validators = [{ range = { min = 1, max = 65535 } }]

[sections.keys.password]
required = true
"#;

/// A declaration with named sections only, usable with INI files.
#[allow(dead_code)]
pub const NAMED_SCHEMA: &str = r#"
[[sections]]
name = "server"
keys.port = { default = 8080 }
keys.debug = { default = false }
"#;

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

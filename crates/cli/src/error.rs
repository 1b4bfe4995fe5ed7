//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` and `DeclarationError` values to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Declaration problems win over configuration problems when both appear in an error chain.

use confix::ConfigError;

use crate::declaration::DeclarationError;

/// Structured exit codes for confix.
///
/// These codes let scripts tell a bad configuration apart from a bad schema
/// or an unreadable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - configuration resolved.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Invalid configuration - unrecognized key, type mismatch, failed validator
    /// or missing required key.
    ///
    /// Scripts should fix the configuration file or environment.
    InvalidConfig = 2,

    /// Declaration error - the schema declaration itself is unusable.
    DeclarationError = 3,

    /// I/O or parse error - a file could not be read or parsed.
    IoError = 4,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            e if e.is_invalid_config() => ExitCode::InvalidConfig,

            ConfigError::UnsupportedFileFormat { .. }
            | ConfigError::ConfigFileRead { .. }
            | ConfigError::ConfigFileParse { .. }
            | ConfigError::DotenvParse { .. }
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown => ExitCode::IoError,

            // The declared sections cannot be used with the given input.
            ConfigError::IniRequiresNamedSections
            | ConfigError::NoSectionsRegistered
            | ConfigError::AlreadyRegistered { .. }
            | ConfigError::SectionKeyCollision { .. } => ExitCode::DeclarationError,

            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error type is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        if self
            .chain()
            .any(|cause| cause.downcast_ref::<DeclarationError>().is_some())
        {
            return ExitCode::DeclarationError;
        }

        for cause in self.chain() {
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
        }

        ExitCode::GeneralError
    }
}

//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` that feeds a config file and the
//!   environment into a `Registry` and resolves it.
//! - Support explicit file paths, already-open readers and explicit format overrides.
//! - Optionally load a `.env` file into the process environment first.
//!
//! Does NOT handle:
//! - Parsing individual formats (delegated to format.rs).
//! - Merge rules (delegated to the `merge` module via `Registry::resolve`).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over file values, which take precedence over defaults.
//! - `from_env()` snapshots the process environment at `load()` time, after any `.env` loading.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy` is called.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::format::{FileFormat, load_file_as, load_reader};
use crate::constants::DOTENV_DISABLED_VAR;
use crate::merge::{Environment, ResolveOptions};
use crate::registry::Registry;
use crate::resolved::ResolvedConfig;
use crate::value::{Mapping, Value};

enum FileSource {
    Path(PathBuf),
    Parsed(Mapping),
}

enum EnvSource {
    Process,
    Fixed(Environment),
}

/// Caller-supplied file parser: file contents in, override mapping out.
type FileParser = Box<dyn Fn(&str) -> Result<Mapping, ConfigError>>;

/// Loads a configuration file and environment overrides into a registry.
pub struct ConfigLoader<'r> {
    registry: &'r Registry,
    file: Option<FileSource>,
    format: Option<FileFormat>,
    parser: Option<FileParser>,
    env: Option<EnvSource>,
    options: ResolveOptions,
}

impl<'r> ConfigLoader<'r> {
    /// Create a new loader resolving into `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            file: None,
            format: None,
            parser: None,
            env: None,
            options: ResolveOptions::default(),
        }
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from a `.env` file in the current directory, if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the file is not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        Self::map_dotenv_result(dotenvy::dotenv().map(|_| ()))?;
        Ok(self)
    }

    /// Like [`ConfigLoader::load_dotenv`], reading a specific file.
    pub fn load_dotenv_from(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        Self::map_dotenv_result(dotenvy::from_path(path.as_ref()))?;
        Ok(self)
    }

    fn map_dotenv_result(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if Self::is_not_found(&e) => Ok(()),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read overrides from the file at `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSource::Path(path.into()));
        self
    }

    /// Read overrides from an open reader in the given format.
    ///
    /// The reader is consumed immediately.
    pub fn with_reader<R: Read>(mut self, reader: R, format: FileFormat) -> Result<Self, ConfigError> {
        self.file = Some(FileSource::Parsed(load_reader(reader, format)?));
        self.format = Some(format);
        Ok(self)
    }

    /// Use `format` instead of detecting it from the file extension.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Parse the file given to [`ConfigLoader::with_file`] with `parser`
    /// instead of a built-in format, whatever its extension.
    ///
    /// Empty or whitespace-only files still yield an empty mapping without
    /// calling the parser.
    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Result<Mapping, ConfigError> + 'static,
    {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Use an explicit environment (useful for tests and embedding).
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(EnvSource::Fixed(env));
        self
    }

    /// Read overrides from the process environment.
    ///
    /// Variables that are empty or whitespace-only count as unset, so they
    /// neither override a value nor satisfy a required key.
    pub fn from_env(mut self) -> Self {
        self.env = Some(EnvSource::Process);
        self
    }

    /// Only match environment variables carrying this prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options = self.options.with_env_prefix(prefix);
        self
    }

    /// Match environment variable names case-sensitively.
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.options = self.options.with_case_sensitive(enabled);
        self
    }

    /// Enable or disable the global type check (enabled by default).
    pub fn type_check(mut self, enabled: bool) -> Self {
        self.options = self.options.with_type_check(enabled);
        self
    }

    /// Replace the built-in coercion of environment values.
    pub fn with_env_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str, &str, Option<&Value>) -> Result<Value, ConfigError> + Send + Sync + 'static,
    {
        self.options = self.options.with_env_parser(parser);
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve the registry against the configured sources.
    ///
    /// # Errors
    ///
    /// - `ConfigError::FormatWithoutFile` if a format or parser was set without a file.
    /// - `ConfigError::UnsupportedFileFormat` if the format cannot be detected.
    /// - `ConfigError::IniRequiresNamedSections` for INI input with a root section registered.
    /// - Any read, parse or resolution error.
    pub fn load(self) -> Result<ResolvedConfig, ConfigError> {
        let (overrides, format) = match self.file {
            None if self.format.is_some() || self.parser.is_some() => {
                return Err(ConfigError::FormatWithoutFile);
            }
            None => {
                tracing::debug!("no config file specified");
                (Mapping::new(), None)
            }
            Some(FileSource::Parsed(mapping)) => (mapping, self.format),
            Some(FileSource::Path(path)) => match &self.parser {
                Some(parser) => (parse_with(&path, parser.as_ref())?, None),
                None => {
                    let format = match self.format {
                        Some(format) => format,
                        None => FileFormat::from_path(&path)?,
                    };
                    (load_file_as(&path, format)?, Some(format))
                }
            },
        };

        if format == Some(FileFormat::Ini) && self.registry.has_root_section() {
            return Err(ConfigError::IniRequiresNamedSections);
        }

        let env = match self.env {
            Some(EnvSource::Process) => Some(Environment::from_process()),
            Some(EnvSource::Fixed(env)) => Some(env),
            None => None,
        };

        self.registry.resolve(overrides, env.as_ref(), &self.options)
    }
}

fn parse_with(
    path: &Path,
    parser: &dyn Fn(&str) -> Result<Mapping, ConfigError>,
) -> Result<Mapping, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config file with custom parser");
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    parser(&text)
}

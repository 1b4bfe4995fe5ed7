//! Layered configuration loading and validation.
//!
//! An application declares sections of keys with defaults, registers them in
//! a [`Registry`], and resolves the registry against a configuration file
//! and/or environment variables. Resolution is strict: unknown keys, type
//! drift, failed validators and missing required keys are all errors.
//!
//! ```rust,ignore
//! use confix::{ConfigLoader, Registry, Schema, SectionSchema, validators};
//!
//! let registry = Registry::new();
//! registry.register(
//!     SectionSchema::named("database")
//!         .key("host", "localhost")
//!         .schema("port", Schema::new(5432).with_validator(validators::range(1.0, 65535.0)))
//!         .required("password")
//!         .build(),
//! )?;
//!
//! let config = ConfigLoader::new(&registry)
//!     .with_file("app.yaml")
//!     .from_env()
//!     .load()?;
//! let port = config.get(Some("database"), "port");
//! ```

pub mod constants;
mod loader;
pub mod merge;
mod registry;
mod resolved;
pub mod schema;
mod section;
pub mod validators;
pub mod value;

pub use loader::{
    ConfigError, ConfigLoader, FileFormat, load_file, load_file_as, load_reader, parse_str,
};
pub use merge::{Environment, ResolveOptions};
pub use registry::Registry;
pub use resolved::{ResolvedConfig, ResolvedSection};
pub use schema::{Invalid, Schema, Validator};
pub use section::{SectionBuilder, SectionLabel, SectionSchema};
pub use value::{Mapping, Value, ValueKind};

//! Section declarations.
//!
//! Responsibilities:
//! - Group declared keys under a named or anonymous (root) section.
//! - Provide an explicit builder for enumerating keys, defaults and validators.
//!
//! Does NOT handle:
//! - Registration or resolution (see `registry` and `merge`).
//!
//! Invariants:
//! - Key names are unique within a section; re-declaring a key replaces it.
//! - Keys starting with `RESERVED_KEY_PREFIX` never enter the schema.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::RESERVED_KEY_PREFIX;
use crate::schema::Schema;
use crate::value::Value;

/// Display helper for an optional section name.
#[derive(Debug, Clone, Copy)]
pub struct SectionLabel<'a>(pub Option<&'a str>);

impl fmt::Display for SectionLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => f.write_str(name),
            None => f.write_str("<root>"),
        }
    }
}

/// The declared keys of one section.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    name: Option<String>,
    keys: BTreeMap<String, Schema>,
}

impl SectionSchema {
    /// Start declaring the anonymous root section.
    pub fn root() -> SectionBuilder {
        SectionBuilder::new(None)
    }

    /// Start declaring a named section.
    pub fn named(name: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(Some(name.into()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn label(&self) -> SectionLabel<'_> {
        SectionLabel(self.name.as_deref())
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.keys.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Builder for [`SectionSchema`].
#[derive(Debug)]
pub struct SectionBuilder {
    name: Option<String>,
    keys: BTreeMap<String, Schema>,
}

impl SectionBuilder {
    fn new(name: Option<String>) -> Self {
        Self {
            name,
            keys: BTreeMap::new(),
        }
    }

    /// Declare a key with a literal default.
    pub fn key(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.schema(name, Schema::new(default))
    }

    /// Declare a key that must be supplied by an override.
    pub fn required(self, name: impl Into<String>) -> Self {
        self.schema(name, Schema::required())
    }

    /// Declare a key with a full schema descriptor.
    pub fn schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if name.starts_with(RESERVED_KEY_PREFIX) {
            tracing::debug!(
                section = %SectionLabel(self.name.as_deref()),
                key = %name,
                "skipping reserved key"
            );
            return self;
        }
        if self.keys.insert(name.clone(), schema).is_some() {
            tracing::warn!(
                section = %SectionLabel(self.name.as_deref()),
                key = %name,
                "key declared twice, keeping the last declaration"
            );
        }
        self
    }

    pub fn build(self) -> SectionSchema {
        SectionSchema {
            name: self.name,
            keys: self.keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_keys() {
        let section = SectionSchema::named("database")
            .key("host", "localhost")
            .key("port", 5432)
            .required("password")
            .build();

        assert_eq!(section.name(), Some("database"));
        assert_eq!(section.len(), 3);
        assert!(section.get("password").unwrap().is_required());
        assert_eq!(
            section.get("port").unwrap().default_value(),
            Some(&Value::Integer(5432))
        );
    }

    #[test]
    fn test_reserved_prefix_is_excluded() {
        let section = SectionSchema::root()
            .key("_private", 1)
            .key("public", 2)
            .build();
        assert!(!section.contains_key("_private"));
        assert!(section.contains_key("public"));
    }

    #[test]
    fn test_redeclared_key_keeps_last() {
        let section = SectionSchema::root().key("foo", 1).key("foo", "one").build();
        assert_eq!(section.len(), 1);
        assert_eq!(
            section.get("foo").unwrap().default_value(),
            Some(&Value::from("one"))
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(SectionSchema::root().build().label().to_string(), "<root>");
        assert_eq!(SectionSchema::named("db").build().label().to_string(), "db");
    }
}

//! Resolved configuration values.
//!
//! Responsibilities:
//! - Hold the outcome of a resolve call as an immutable value.
//! - Offer mapping-style access (`get`, `Index`) and typed access via serde.
//!
//! Does NOT handle:
//! - Merging or validation (see `merge`).
//!
//! Invariants:
//! - Values are never mutated after construction.
//! - Every declared key of a resolved section has a value.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::ops::Index;

use crate::section::SectionLabel;
use crate::value::{Mapping, Value};

/// The resolved values of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection {
    name: Option<String>,
    values: Mapping,
}

impl ResolvedSection {
    pub(crate) fn new(name: Option<String>, values: Mapping) -> Self {
        Self { name, values }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Deserialize a single key into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, serde_json::Error>> {
        self.values
            .get(key)
            .map(|value| serde_json::from_value(value.to_json()))
    }

    /// Deserialize the whole section into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Map(self.values.clone()).to_json())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_mapping(&self) -> Mapping {
        self.values.clone()
    }
}

impl Index<&str> for ResolvedSection {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.values.get(key) {
            Some(value) => value,
            None => panic!(
                "no key '{key}' in resolved section '{}'",
                SectionLabel(self.name.as_deref())
            ),
        }
    }
}

/// All sections produced by one resolve call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    sections: BTreeMap<Option<String>, ResolvedSection>,
}

impl ResolvedConfig {
    pub(crate) fn from_sections(sections: impl IntoIterator<Item = ResolvedSection>) -> Self {
        Self {
            sections: sections
                .into_iter()
                .map(|section| (section.name.clone(), section))
                .collect(),
        }
    }

    /// The anonymous root section, if one was registered.
    pub fn root(&self) -> Option<&ResolvedSection> {
        self.sections.get(&None)
    }

    pub fn section(&self, name: &str) -> Option<&ResolvedSection> {
        self.sections.get(&Some(name.to_string()))
    }

    /// Look up `key` in `section` (`None` for the root section).
    pub fn get(&self, section: Option<&str>, key: &str) -> Option<&Value> {
        self.sections
            .get(&section.map(str::to_string))
            .and_then(|s| s.get(key))
    }

    pub fn sections(&self) -> impl Iterator<Item = &ResolvedSection> {
        self.sections.values()
    }

    /// Plain mapping view: root keys at the top level, named sections nested.
    pub fn to_mapping(&self) -> Mapping {
        let mut out = self.root().map(ResolvedSection::to_mapping).unwrap_or_default();
        for section in self.sections.values() {
            if let Some(name) = section.name() {
                out.insert(name.to_string(), Value::Map(section.to_mapping()));
            }
        }
        out
    }
}

//! Splitting a parsed override mapping into per-section overrides.
//!
//! A top-level key naming a registered section holds that section's keys;
//! every other top-level key belongs to the root section.

use std::collections::{BTreeMap, BTreeSet};

use crate::loader::ConfigError;
use crate::section::SectionSchema;
use crate::value::{Mapping, Value};

/// Split `mapping` by section. Sections without overrides are absent from the result.
pub fn split_overrides(
    mapping: Mapping,
    sections: &[&SectionSchema],
) -> Result<BTreeMap<Option<String>, Mapping>, ConfigError> {
    let has_root = sections.iter().any(|s| s.name().is_none());
    let named: BTreeSet<&str> = sections.iter().filter_map(|s| s.name()).collect();
    let mut out: BTreeMap<Option<String>, Mapping> = BTreeMap::new();

    for (key, value) in mapping {
        if named.contains(key.as_str()) {
            match value {
                Value::Map(inner) => {
                    out.entry(Some(key)).or_default().extend(inner);
                }
                // An empty YAML block (`database:`) parses as null.
                Value::Null => {
                    out.entry(Some(key)).or_default();
                }
                other => {
                    return Err(ConfigError::TypeMismatch {
                        section: Some(key.clone()),
                        key,
                        default: Value::Map(Mapping::new()),
                        value: other,
                    });
                }
            }
        } else if has_root {
            out.entry(None).or_default().insert(key, value);
        } else {
            return Err(ConfigError::UnrecognizedKey {
                section: None,
                key,
                value,
            });
        }
    }

    Ok(out)
}

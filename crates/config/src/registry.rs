//! Default-configuration registry.
//!
//! Responsibilities:
//! - Own the declared sections of an application, keyed by section name (or none for the root).
//! - Serialize registration and resolution behind a single mutex.
//! - Track which sections have been resolved and reject re-resolution.
//!
//! Does NOT handle:
//! - The merge rules themselves (see `merge::engine`).
//! - Reading files or the process environment (see `loader`).
//!
//! Invariants:
//! - Section names are unique; the root section can be registered once.
//! - A failed resolve leaves every section's resolved state untouched.
//! - `resolve` is all-or-nothing: state is committed only if every section resolved.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::loader::ConfigError;
use crate::merge::{
    Environment, ResolveOptions, collect_env_overrides, resolve_section, split_overrides,
};
use crate::resolved::{ResolvedConfig, ResolvedSection};
use crate::section::{SectionLabel, SectionSchema};
use crate::value::Mapping;

struct Entry {
    schema: SectionSchema,
    resolved: Option<ResolvedSection>,
}

#[derive(Default)]
struct RegistryState {
    sections: BTreeMap<Option<String>, Entry>,
}

impl RegistryState {
    fn schemas(&self) -> Vec<&SectionSchema> {
        self.sections.values().map(|entry| &entry.schema).collect()
    }
}

/// A root key named like a named section would be shadowed by that section in
/// file overrides and in the output mapping.
fn key_collision(state: &RegistryState, section: &SectionSchema) -> Option<String> {
    match section.name() {
        Some(name) => state
            .sections
            .get(&None)
            .filter(|root| root.schema.contains_key(name))
            .map(|_| name.to_string()),
        None => section
            .keys()
            .map(|(key, _)| key)
            .find(|key| state.sections.contains_key(&Some(key.to_string())))
            .map(str::to_string),
    }
}

/// Registry of declared configuration sections.
///
/// Share it across threads with `Arc<Registry>`; every method takes `&self`.
#[derive(Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Registry")
            .field("sections", &state.sections.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyRegistered` if a section with the same name
    /// (or a second root section) is already registered.
    pub fn register(&self, section: SectionSchema) -> Result<(), ConfigError> {
        let mut state = self.lock();
        let name = section.name().map(str::to_string);
        if state.sections.contains_key(&name) {
            return Err(ConfigError::AlreadyRegistered { section: name });
        }
        if let Some(collision) = key_collision(&state, &section) {
            return Err(ConfigError::SectionKeyCollision { name: collision });
        }
        tracing::debug!(
            section = %section.label(),
            keys = section.len(),
            "registering section"
        );
        state.sections.insert(
            name,
            Entry {
                schema: section,
                resolved: None,
            },
        );
        Ok(())
    }

    pub fn section_names(&self) -> Vec<Option<String>> {
        self.lock().sections.keys().cloned().collect()
    }

    pub fn has_root_section(&self) -> bool {
        self.lock().sections.contains_key(&None)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().sections.is_empty()
    }

    pub fn is_resolved(&self, section: Option<&str>) -> bool {
        self.lock()
            .sections
            .get(&section.map(str::to_string))
            .is_some_and(|entry| entry.resolved.is_some())
    }

    /// Resolve a single section.
    ///
    /// Environment variables are matched against the keys of every registered
    /// section, but only this section is validated and marked resolved.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnknownSection` if `section` is not registered.
    /// - `ConfigError::AlreadyResolved` if it was resolved before.
    /// - Any key-level error from the merge engine.
    pub fn resolve_section(
        &self,
        section: Option<&str>,
        overrides: Option<&Mapping>,
        env: Option<&Environment>,
        options: &ResolveOptions,
    ) -> Result<ResolvedSection, ConfigError> {
        let mut state = self.lock();
        let name = section.map(str::to_string);

        let entry = state
            .sections
            .get(&name)
            .ok_or_else(|| ConfigError::UnknownSection {
                section: name.clone(),
            })?;
        if entry.resolved.is_some() {
            return Err(ConfigError::AlreadyResolved { section: name });
        }

        let mut env_overrides = match env {
            Some(env) => collect_env_overrides(env, &state.schemas(), options)?,
            None => BTreeMap::new(),
        };
        let resolved = resolve_section(
            &entry.schema,
            overrides,
            env_overrides.remove(&name).as_ref(),
            options,
        )?;

        if let Some(entry) = state.sections.get_mut(&name) {
            entry.resolved = Some(resolved.clone());
        }
        tracing::info!(section = %SectionLabel(section), "section resolved");
        Ok(resolved)
    }

    /// Resolve every registered section from a (possibly nested) override mapping.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NoSectionsRegistered` if the registry is empty.
    /// - `ConfigError::AlreadyResolved` if any section was resolved before.
    /// - Any error from override splitting or the merge engine.
    pub fn resolve(
        &self,
        overrides: Mapping,
        env: Option<&Environment>,
        options: &ResolveOptions,
    ) -> Result<ResolvedConfig, ConfigError> {
        let mut state = self.lock();
        if state.sections.is_empty() {
            return Err(ConfigError::NoSectionsRegistered);
        }
        if let Some((name, _)) = state
            .sections
            .iter()
            .find(|(_, entry)| entry.resolved.is_some())
        {
            return Err(ConfigError::AlreadyResolved {
                section: name.clone(),
            });
        }

        let schemas = state.schemas();
        let mut file_overrides = split_overrides(overrides, &schemas)?;
        let mut env_overrides = match env {
            Some(env) => collect_env_overrides(env, &schemas, options)?,
            None => BTreeMap::new(),
        };

        let mut resolved = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            let name = schema.name().map(str::to_string);
            resolved.push(resolve_section(
                schema,
                file_overrides.remove(&name).as_ref(),
                env_overrides.remove(&name).as_ref(),
                options,
            )?);
        }

        for section in &resolved {
            let name = section.name().map(str::to_string);
            if let Some(entry) = state.sections.get_mut(&name) {
                entry.resolved = Some(section.clone());
            }
        }
        tracing::info!(sections = resolved.len(), "configuration resolved");
        Ok(ResolvedConfig::from_sections(resolved))
    }

    /// The resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotYetResolved` naming the first unresolved section,
    /// or `ConfigError::NoSectionsRegistered` if the registry is empty.
    pub fn resolved(&self) -> Result<ResolvedConfig, ConfigError> {
        let state = self.lock();
        if state.sections.is_empty() {
            return Err(ConfigError::NoSectionsRegistered);
        }
        let sections = state
            .sections
            .iter()
            .map(|(name, entry)| {
                entry
                    .resolved
                    .clone()
                    .ok_or_else(|| ConfigError::NotYetResolved {
                        section: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResolvedConfig::from_sections(sections))
    }

    /// Plain mapping of the resolved configuration (see [`ResolvedConfig::to_mapping`]).
    pub fn to_mapping(&self) -> Result<Mapping, ConfigError> {
        Ok(self.resolved()?.to_mapping())
    }

    /// Forget every registered section and its resolved state.
    pub fn discard(&self) {
        let mut state = self.lock();
        tracing::debug!(sections = state.sections.len(), "discarding registry");
        state.sections.clear();
    }
}

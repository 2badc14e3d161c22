//! Spec registry: maps type keys to their specs.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::spec::{ArgSpec, ArgType, TypeKey};

/// Mapping from [`TypeKey`] to [`ArgSpec`].
///
/// Each parser owns one. [`SpecRegistry::new`] seeds the built-in types;
/// clone a registry explicitly to share registrations between parsers.
#[derive(Debug, Clone)]
pub struct SpecRegistry {
    specs: HashMap<TypeKey, ArgSpec>,
}

impl Default for SpecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecRegistry {
    /// A registry seeded with the built-in type specs.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::types::register_builtins(&mut registry);
        registry
    }

    /// A registry with no entries.
    pub fn empty() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    /// Register a spec. A later registration for the same key wins; the
    /// replaced spec is returned.
    pub fn register(&mut self, key: impl Into<TypeKey>, spec: ArgSpec) -> Option<ArgSpec> {
        let key = key.into();
        let previous = self.specs.insert(key.clone(), spec);
        if previous.is_some() {
            tracing::debug!(key = %key, "Overriding registered argument spec");
        } else {
            tracing::trace!(key = %key, "Registered argument spec");
        }
        previous
    }

    /// Register a spec for the concrete type `T`.
    pub fn register_type<T: 'static>(&mut self, spec: ArgSpec) -> Option<ArgSpec> {
        self.register(TypeKey::of::<T>(), spec)
    }

    /// Register the same spec under a type and a list of aliases.
    pub fn register_with_aliases<T: 'static>(&mut self, aliases: &[&str], spec: ArgSpec) {
        for alias in aliases {
            self.register(TypeKey::alias(*alias), spec.clone());
        }
        self.register_type::<T>(spec);
    }

    /// Spec registered under `key`.
    pub fn get(&self, key: &TypeKey) -> Option<&ArgSpec> {
        self.specs.get(key)
    }

    /// Whether anything is registered under `key`.
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.specs.contains_key(key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Resolve the spec for a requested type.
    ///
    /// Order: registry entry, spec declared by the type, generated enum
    /// spec, then a spec holding only the type's fallback converter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownType` when none of those exist.
    pub fn resolve(&self, arg_type: &ArgType) -> Result<ArgSpec, ConfigError> {
        if let Some(spec) = self.get(arg_type.key()) {
            return Ok(spec.clone());
        }
        if let Some(spec) = arg_type.declared_spec() {
            return Ok(spec);
        }
        if let Some(spec) = arg_type.generated_spec() {
            return Ok(spec);
        }
        if let Some(converter) = arg_type.fallback() {
            return Ok(ArgSpec::new(converter.clone()));
        }
        Err(ConfigError::UnknownType(arg_type.key().to_string()))
    }
}

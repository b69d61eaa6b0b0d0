//! Type registry - the channel type hierarchy
//!
//! Channel types are plain identifiers resolved against a hierarchy that
//! the host registers at startup. Keeping the subtype relation in an
//! explicit table makes compatibility checks independent of any runtime
//! reflection the host may or may not have.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

/// A resolved channel type with its precomputed ancestor set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    ancestors: HashSet<String>,
}

impl TypeDescriptor {
    /// Name of the type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this type is the same as or derives from `other`
    ///
    /// Reflexive and transitive.
    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.name == other.name || self.ancestors.contains(&other.name)
    }
}

/// One entry of a serde-loadable type catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCatalogEntry {
    /// Type identifier
    pub name: String,
    /// Identifiers of the types this one derives from
    #[serde(default)]
    pub bases: Vec<String>,
}

/// A serde-loadable type hierarchy
///
/// Entries must list bases before the types derived from them.
pub type TypeCatalog = Vec<TypeCatalogEntry>;

/// Registry of channel types and their subtype relationships
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Build a registry from a catalog
    pub fn from_catalog(catalog: &TypeCatalog) -> Result<Self> {
        let mut registry = Self::new();
        for entry in catalog {
            let bases: Vec<&str> = entry.bases.iter().map(String::as_str).collect();
            registry.register_with_bases(&entry.name, &bases)?;
        }
        Ok(registry)
    }

    /// Register a root type with no bases
    pub fn register(&mut self, name: &str) -> Result<()> {
        self.register_with_bases(name, &[])
    }

    /// Register a type deriving from already-registered bases
    ///
    /// Fails with `UnknownType` if a base has not been registered yet and
    /// with `DuplicateType` on re-registration. Ancestor sets are computed
    /// here once; registration order makes cycles unrepresentable.
    pub fn register_with_bases(&mut self, name: &str, bases: &[&str]) -> Result<()> {
        if self.types.contains_key(name) {
            return Err(LinkError::DuplicateType(name.to_string()));
        }

        let mut ancestors = HashSet::new();
        for &base in bases {
            let base = self.resolve(base)?;
            ancestors.insert(base.name.clone());
            ancestors.extend(base.ancestors.iter().cloned());
        }

        log::trace!("registered type '{}' ({} ancestor(s))", name, ancestors.len());
        self.types.insert(
            name.to_string(),
            TypeDescriptor {
                name: name.to_string(),
                ancestors,
            },
        );
        Ok(())
    }

    /// Resolve a type identifier to its descriptor
    pub fn resolve(&self, name: &str) -> Result<&TypeDescriptor> {
        self.types
            .get(name)
            .ok_or_else(|| LinkError::UnknownType(name.to_string()))
    }

    /// Whether a type identifier is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry has no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

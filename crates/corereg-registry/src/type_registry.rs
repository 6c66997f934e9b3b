//! TypeRegistry - name-to-metadata table for runtime-instantiable types.
//!
//! # Storage Model
//!
//! - **Types**: entries stored in a single map keyed by `TypeHash`, which is
//!   computed from the name. Registration order is kept separately.
//! - **Inheritance**: each entry names its parent; a reverse index maps every
//!   type to its direct inheriters.
//!
//! # Ordering
//!
//! Parents must be registered before children. A type naming an unknown
//! parent is rejected, which keeps the parent chain acyclic and makes every
//! entry reachable from a root.
//!
//! # Thread Safety
//!
//! The registry is populated single-threaded during bootstrap and is read-only
//! afterwards, so shared `&TypeRegistry` lookups need no locking.
//!
//! # Example
//!
//! ```
//! use corereg_core::TypeEntry;
//! use corereg_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(TypeEntry::class("Object", None)).unwrap();
//! registry.register(TypeEntry::virtual_class("Script", Some("Object"))).unwrap();
//!
//! assert!(registry.instantiate("Object").is_ok());
//! assert!(registry.instantiate("Script").is_err());
//! ```

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use corereg_core::{Domain, EntryKind, Instance, RegistryError, TypeEntry, TypeHash};

/// Registry of type metadata.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Entries by hash of their name.
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Registration order.
    order: Vec<TypeHash>,
    /// Reverse index: parent -> direct inheriters, in registration order.
    inheriters: FxHashMap<TypeHash, Vec<TypeHash>>,
    /// Set once `unregister_all` ran.
    closed: bool,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type entry.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the name is taken.
    /// - `UnknownParent` if the parent has not been registered yet.
    /// - `ConflictingFlags` if the entry is both virtual and instantiable.
    /// - `DomainClosed` after `unregister_all`.
    pub fn register(&mut self, entry: TypeEntry) -> Result<(), RegistryError> {
        if self.closed {
            return Err(RegistryError::DomainClosed {
                domain: Domain::Types,
            });
        }

        let hash = entry.type_hash;
        if self.types.contains_key(&hash) {
            return Err(RegistryError::duplicate(EntryKind::Type, &*entry.name));
        }
        if entry.has_conflicting_flags() {
            return Err(RegistryError::ConflictingFlags(entry.name.to_string()));
        }

        if let Some(parent) = &entry.parent {
            let parent_hash = TypeHash::from_name(parent);
            if !self.types.contains_key(&parent_hash) {
                return Err(RegistryError::UnknownParent {
                    name: entry.name.to_string(),
                    parent: parent.to_string(),
                });
            }
            self.inheriters.entry(parent_hash).or_default().push(hash);
        }

        self.order.push(hash);
        self.types.insert(hash, entry);
        Ok(())
    }

    /// Remove every entry and close the registry.
    ///
    /// Only valid once; every reference obtained from earlier lookups must be
    /// gone by now (the borrow checker enforces this for `&TypeEntry`).
    ///
    /// Returns the number of entries removed.
    pub fn unregister_all(&mut self) -> Result<usize, RegistryError> {
        if self.closed {
            return Err(RegistryError::DomainClosed {
                domain: Domain::Types,
            });
        }
        let count = self.types.len();
        self.types.clear();
        self.order.clear();
        self.inheriters.clear();
        self.closed = true;
        Ok(count)
    }

    /// Check whether `unregister_all` has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look up a type by name.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn lookup(&self, name: &str) -> Result<&TypeEntry, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::not_found(EntryKind::Type, name))
    }

    /// Get a type by name, if registered.
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(&TypeHash::from_name(name))
    }

    /// Get a type by hash, if registered.
    pub fn get_by_hash(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Check if a type exists.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&TypeHash::from_name(name))
    }

    /// Check whether `instantiate(name)` would succeed.
    pub fn can_instantiate(&self, name: &str) -> bool {
        self.get(name).is_some_and(|entry| {
            entry.is_instantiable() && (entry.constructor.is_some() || !entry.is_custom_instance())
        })
    }

    // ==========================================================================
    // Instantiation
    // ==========================================================================

    /// Create an instance of a registered type.
    ///
    /// Uses the entry's custom constructor when present; plain classes without
    /// one get an empty payload.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the type is not registered.
    /// - `NotInstantiable` if the type is virtual, not instantiable, or a
    ///   custom-instance type without a constructor.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn instantiate(&self, name: &str) -> Result<Instance, RegistryError> {
        let entry = self.lookup(name)?;
        if !entry.is_instantiable() {
            return Err(RegistryError::NotInstantiable(name.to_string()));
        }

        let data: Box<dyn Any + Send + Sync> = match entry.constructor {
            Some(constructor) => constructor(),
            None if entry.is_custom_instance() => {
                return Err(RegistryError::NotInstantiable(name.to_string()));
            }
            None => Box::new(()),
        };
        Ok(Instance::new(entry.type_hash, Arc::clone(&entry.name), data))
    }

    // ==========================================================================
    // Inheritance
    // ==========================================================================

    /// Check whether `ancestor` is `name` or one of its ancestors.
    pub fn is_parent_type(&self, name: &str, ancestor: &str) -> bool {
        let target = TypeHash::from_name(ancestor);
        let mut current = self.get(name);
        while let Some(entry) = current {
            if entry.type_hash == target {
                return true;
            }
            current = entry.parent_hash().and_then(|p| self.types.get(&p));
        }
        false
    }

    /// Names of every ancestor of `name`, nearest first.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&str>, RegistryError> {
        let mut entry = self.lookup(name)?;
        let mut chain = Vec::new();
        while let Some(parent) = entry.parent_hash().and_then(|p| self.types.get(&p)) {
            chain.push(&*parent.name);
            entry = parent;
        }
        Ok(chain)
    }

    /// Names of the direct inheriters of `name`, in registration order.
    pub fn inheriters(&self, name: &str) -> Vec<&str> {
        self.inheriters
            .get(&TypeHash::from_name(name))
            .into_iter()
            .flatten()
            .filter_map(|h| self.types.get(h))
            .map(|e| &*e.name)
            .collect()
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    /// Iterate over all types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.order.iter().filter_map(|h| self.types.get(h))
    }

    /// Get the number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

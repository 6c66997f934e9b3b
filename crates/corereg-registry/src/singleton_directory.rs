//! SingletonDirectory - name resolution for process-wide services.
//!
//! The directory maps a unique name to a shared service handle. It performs
//! no dispatch: callers (including the reflection layer) resolve a name and
//! then talk to the service directly.
//!
//! Removal is deliberately not idempotent. Removing a name twice fails with
//! `NotFound`, so a double teardown shows up as an error instead of passing
//! silently.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use corereg_core::{EntryKind, RegistryError, Singleton, TypeHash};

/// Directory of published singletons.
#[derive(Debug, Default)]
pub struct SingletonDirectory {
    /// Records by hash of their name.
    records: FxHashMap<TypeHash, Singleton>,
    /// Publication order.
    order: Vec<TypeHash>,
}

impl SingletonDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a singleton.
    ///
    /// # Errors
    ///
    /// `DuplicateName` if the name is taken. A name may be reused once the
    /// previous record was removed.
    pub fn add(&mut self, singleton: Singleton) -> Result<(), RegistryError> {
        let hash = singleton.name_hash();
        if self.records.contains_key(&hash) {
            return Err(RegistryError::duplicate(EntryKind::Singleton, &*singleton.name));
        }
        self.order.push(hash);
        self.records.insert(hash, singleton);
        Ok(())
    }

    /// Resolve a singleton by name.
    pub fn get(&self, name: &str) -> Result<&Singleton, RegistryError> {
        self.records
            .get(&TypeHash::from_singleton(name))
            .ok_or_else(|| RegistryError::not_found(EntryKind::Singleton, name))
    }

    /// Resolve a singleton and downcast it to its service type.
    ///
    /// Returns `NotFound` both when the name is unknown and when the service
    /// is of a different type.
    pub fn get_as<T: std::any::Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.get(name)?
            .downcast::<T>()
            .ok_or_else(|| RegistryError::not_found(EntryKind::Singleton, name))
    }

    /// Check if a name is published.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(&TypeHash::from_singleton(name))
    }

    /// Unpublish a singleton and hand back its record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the name is not published, including on a second removal.
    pub fn remove(&mut self, name: &str) -> Result<Singleton, RegistryError> {
        let hash = TypeHash::from_singleton(name);
        let record = self
            .records
            .remove(&hash)
            .ok_or_else(|| RegistryError::not_found(EntryKind::Singleton, name))?;
        self.order.retain(|h| *h != hash);
        Ok(record)
    }

    /// Iterate over records in publication order.
    pub fn iter(&self) -> impl Iterator<Item = &Singleton> {
        self.order.iter().filter_map(|h| self.records.get(h))
    }

    /// Published names in publication order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|s| &*s.name).collect()
    }

    /// Number of published singletons.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is published.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marshalls;

    fn record(name: &str) -> Singleton {
        Singleton::new(name, Arc::new(Marshalls))
    }

    #[test]
    fn add_and_get() {
        let mut dir = SingletonDirectory::new();
        dir.add(record("Marshalls")).unwrap();
        assert_eq!(&*dir.get("Marshalls").unwrap().name, "Marshalls");
        assert!(dir.get_as::<Marshalls>("Marshalls").is_ok());
        assert!(dir.contains("Marshalls"));
    }

    #[test]
    fn duplicate_name_error() {
        let mut dir = SingletonDirectory::new();
        dir.add(record("OS")).unwrap();
        assert!(matches!(
            dir.add(record("OS")),
            Err(RegistryError::DuplicateName { kind: EntryKind::Singleton, .. })
        ));
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = SingletonDirectory::new();
        assert!(matches!(
            dir.get("Engine"),
            Err(RegistryError::NotFound { kind: EntryKind::Singleton, .. })
        ));
    }

    #[test]
    fn get_as_wrong_type_is_not_found() {
        let mut dir = SingletonDirectory::new();
        dir.add(record("JSON")).unwrap();
        assert!(dir.get_as::<String>("JSON").is_err());
    }

    #[test]
    fn second_remove_fails() {
        let mut dir = SingletonDirectory::new();
        dir.add(record("Input")).unwrap();
        let removed = dir.remove("Input").unwrap();
        assert_eq!(&*removed.name, "Input");
        assert!(dir.get("Input").is_err());
        assert!(matches!(
            dir.remove("Input"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn name_reusable_after_remove() {
        let mut dir = SingletonDirectory::new();
        dir.add(record("IP")).unwrap();
        dir.remove("IP").unwrap();
        dir.add(record("IP")).unwrap();
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn iterates_in_publication_order() {
        let mut dir = SingletonDirectory::new();
        for name in ["ProjectSettings", "IP", "OS"] {
            dir.add(record(name)).unwrap();
        }
        dir.remove("IP").unwrap();
        assert_eq!(dir.names(), vec!["ProjectSettings", "OS"]);
    }
}

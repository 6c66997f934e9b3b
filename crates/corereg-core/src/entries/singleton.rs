//! Singleton directory records.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::TypeHash;

/// A process-wide service published under a unique name.
///
/// The instance is shared between the directory and the reflection layer;
/// cloning the record clones the handle, not the service.
#[derive(Clone)]
pub struct Singleton {
    /// Published name.
    pub name: Arc<str>,
    /// Registered type of the service, if it has one.
    pub class_name: Option<Arc<str>>,
    /// The service itself.
    pub instance: Arc<dyn Any + Send + Sync>,
}

impl Singleton {
    /// Create a record for `instance`.
    pub fn new(name: impl Into<Arc<str>>, instance: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            name: name.into(),
            class_name: None,
            instance,
        }
    }

    /// Record the registered type of the service.
    pub fn with_class(mut self, class_name: impl Into<Arc<str>>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Hash of the published name.
    pub fn name_hash(&self) -> TypeHash {
        TypeHash::from_singleton(&self.name)
    }

    /// Typed handle to the service.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }

    /// Check whether two records share the same service.
    pub fn same_instance(&self, other: &Singleton) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl fmt::Debug for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

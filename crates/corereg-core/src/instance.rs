//! Instances produced by the type registry.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::TypeHash;
use crate::object_db::{ObjectGuard, ObjectId};

/// Custom constructor attached to a type entry.
pub type Constructor = fn() -> Box<dyn Any + Send + Sync>;

/// Constructor for any `Default` payload, usable as a [`Constructor`].
///
/// ```
/// use corereg_core::{Constructor, construct_default};
///
/// let ctor: Constructor = construct_default::<Vec<u8>>;
/// assert!(ctor().downcast_ref::<Vec<u8>>().is_some());
/// ```
pub fn construct_default<T: Default + Any + Send + Sync>() -> Box<dyn Any + Send + Sync> {
    Box::new(T::default())
}

/// A live object of a registered type.
pub struct Instance {
    type_hash: TypeHash,
    type_name: Arc<str>,
    data: Box<dyn Any + Send + Sync>,
    guard: Option<ObjectGuard>,
}

impl Instance {
    /// Create an instance carrying `data`.
    pub fn new(type_hash: TypeHash, type_name: Arc<str>, data: Box<dyn Any + Send + Sync>) -> Self {
        Self {
            type_hash,
            type_name,
            data,
            guard: None,
        }
    }

    /// Hash of the instance's type.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Name of the instance's type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Identity in the object table, once tracked.
    pub fn id(&self) -> Option<ObjectId> {
        self.guard.as_ref().map(ObjectGuard::id)
    }

    /// Attach the object-table guard. Replaces any previous guard.
    pub fn attach(&mut self, guard: ObjectGuard) {
        self.guard = Some(guard);
    }

    /// Check whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }

    /// Borrow the payload as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Mutably borrow the payload as a `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.downcast_mut::<T>()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_db::ObjectDb;

    #[derive(Default)]
    struct Counter(u32);

    #[test]
    fn downcast_payload() {
        let mut inst = Instance::new(
            TypeHash::from_name("Counter"),
            Arc::from("Counter"),
            construct_default::<Counter>(),
        );
        assert!(inst.is::<Counter>());
        inst.downcast_mut::<Counter>().unwrap().0 += 1;
        assert_eq!(inst.downcast_ref::<Counter>().unwrap().0, 1);
        assert!(inst.downcast_ref::<String>().is_none());
    }

    #[test]
    fn attach_assigns_identity() {
        let db = ObjectDb::new();
        let hash = TypeHash::from_name("Object");
        let mut inst = Instance::new(hash, Arc::from("Object"), Box::new(()));
        assert!(inst.id().is_none());

        inst.attach(db.track(hash));
        let id = inst.id().unwrap();
        assert!(db.contains(id));

        drop(inst);
        assert!(!db.contains(id));
    }
}

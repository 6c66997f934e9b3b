//! Object identity tracking.
//!
//! Every instance created through the registry is given an [`ObjectId`] and an
//! [`ObjectGuard`]. The guard removes the id from the table when the instance
//! drops, so at shutdown the table holds exactly the instances that leaked.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::TypeHash;

/// Process-unique id of a live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

#[derive(Default)]
struct ObjectTable {
    next_id: u64,
    live: FxHashMap<ObjectId, TypeHash>,
    closed: bool,
}

/// Table of live objects, shared with the guards it hands out.
#[derive(Clone, Default)]
pub struct ObjectDb {
    table: Arc<Mutex<ObjectTable>>,
}

impl ObjectDb {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new object of type `type_hash`.
    ///
    /// After [`cleanup`](Self::cleanup) ids are still allocated but no longer
    /// tracked.
    pub fn track(&self, type_hash: TypeHash) -> ObjectGuard {
        let mut table = self.table.lock();
        table.next_id += 1;
        let id = ObjectId(table.next_id);
        if !table.closed {
            table.live.insert(id, type_hash);
        }
        ObjectGuard {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    /// Number of tracked objects still alive.
    pub fn live_count(&self) -> usize {
        self.table.lock().live.len()
    }

    /// Check whether `id` is alive.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.table.lock().live.contains_key(&id)
    }

    /// Stop tracking and return every object still alive, sorted by id.
    pub fn cleanup(&self) -> Vec<(ObjectId, TypeHash)> {
        let mut table = self.table.lock();
        table.closed = true;
        let mut leaked: Vec<_> = table.live.drain().collect();
        leaked.sort_by_key(|(id, _)| *id);
        leaked
    }
}

impl fmt::Debug for ObjectDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDb")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Scoped registration of one object; unregisters on drop.
pub struct ObjectGuard {
    id: ObjectId,
    table: Weak<Mutex<ObjectTable>>,
}

impl ObjectGuard {
    /// The tracked id.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Drop for ObjectGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.lock().live.remove(&self.id);
        }
    }
}

impl fmt::Debug for ObjectGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectGuard").field(&self.id).finish()
    }
}

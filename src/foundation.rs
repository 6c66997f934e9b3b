//! Foundational global state: the name interner and the object identity table.
//!
//! The foundation is the first thing a context sets up and the last thing it
//! releases. Anything still alive at release time outlived the registry and
//! is reported as a leak.

use std::sync::Arc;

use tracing::{debug, warn};

use corereg_core::{ObjectDb, ObjectGuard, StringTable, TypeHash};

/// What releasing the foundation found still alive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundationLeaks {
    /// Objects whose guards were still alive.
    pub objects: usize,
    /// Interned names still referenced outside the interner.
    pub names: Vec<Arc<str>>,
}

impl FoundationLeaks {
    /// Check if nothing leaked.
    pub fn is_empty(&self) -> bool {
        self.objects == 0 && self.names.is_empty()
    }
}

/// Interned names and live object identities.
#[derive(Debug, Default)]
pub struct Foundation {
    strings: StringTable,
    objects: ObjectDb,
}

impl Foundation {
    /// Set up empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared copy of `name`.
    pub fn intern(&mut self, name: &str) -> Arc<str> {
        self.strings.intern(name)
    }

    /// Start tracking a new object of `type_hash`.
    pub fn track(&self, type_hash: TypeHash) -> ObjectGuard {
        self.objects.track(type_hash)
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn objects(&self) -> &ObjectDb {
        &self.objects
    }

    /// Clear both tables, warning about anything that outlived them.
    pub fn release(mut self) -> FoundationLeaks {
        let leaked_objects = self.objects.cleanup();
        for (id, type_hash) in &leaked_objects {
            warn!(%id, %type_hash, "object still alive at foundation release");
        }

        let names = self.strings.cleanup();
        if !names.is_empty() {
            warn!(count = names.len(), first = %names[0], "interned names still referenced at foundation release");
        }

        debug!(objects = leaked_objects.len(), names = names.len(), "foundation released");
        FoundationLeaks {
            objects: leaked_objects.len(),
            names,
        }
    }
}

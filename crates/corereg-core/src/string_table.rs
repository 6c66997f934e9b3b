//! String interning.
//!
//! Type and singleton names are interned once and shared as `Arc<str>`, so
//! every table referring to `"Resource"` holds the same allocation.

use std::sync::Arc;

use rustc_hash::FxHashSet;

/// Set of interned names.
#[derive(Debug, Default)]
pub struct StringTable {
    names: FxHashSet<Arc<str>>,
}

impl StringTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared copy of `name`, interning it on first use.
    pub fn intern(&mut self, name: &str) -> Arc<str> {
        if let Some(existing) = self.names.get(name) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(name);
        self.names.insert(Arc::clone(&interned));
        interned
    }

    /// Look up an already-interned name.
    pub fn get(&self, name: &str) -> Option<Arc<str>> {
        self.names.get(name).cloned()
    }

    /// Number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Drop every interned name.
    ///
    /// Returns the names still referenced outside the table, sorted.
    pub fn cleanup(&mut self) -> Vec<Arc<str>> {
        let mut still_used: Vec<Arc<str>> = self
            .names
            .drain()
            .filter(|name| Arc::strong_count(name) > 1)
            .collect();
        still_used.sort();
        still_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_shares_allocation() {
        let mut table = StringTable::new();
        let a = table.intern("Resource");
        let b = table.intern("Resource");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_does_not_intern() {
        let mut table = StringTable::new();
        assert!(table.get("Image").is_none());
        table.intern("Image");
        assert_eq!(table.get("Image").as_deref(), Some("Image"));
    }

    #[test]
    fn cleanup_reports_outstanding_names() {
        let mut table = StringTable::new();
        let held = table.intern("Held");
        table.intern("Released");

        let outstanding = table.cleanup();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(&*outstanding[0], "Held");
        assert!(table.is_empty());
        drop(held);
    }
}

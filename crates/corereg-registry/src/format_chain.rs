//! FormatChain - ordered list of format handlers probed first-match.
//!
//! Handlers are probed in registration order and the first whose `recognize`
//! predicate accepts the input wins. Registration order therefore encodes
//! priority: a generic handler registered before a specific one shadows it,
//! so callers register the most specific handlers first.
//!
//! ```text
//! add(A) add(B) add(C)      resolve(x): A? no -> B? yes -> B
//! remove(B) add(B)          order is now A, C, B
//! finalize()                every later add/resolve -> DomainClosed
//! ```

use std::fmt;
use std::sync::Arc;

use corereg_core::{
    Domain, EntryKind, FormatHandler, HandlerId, HandlerKind, Probe, RegistryError,
};

struct ChainEntry<H: ?Sized> {
    id: HandlerId,
    handler: Arc<H>,
}

/// Ordered, extensible list of handlers of one kind.
///
/// The chain exclusively owns its `Arc`s once registered; removing a handler
/// just drops the chain's reference.
pub struct FormatChain<H: ?Sized> {
    kind: HandlerKind,
    entries: Vec<ChainEntry<H>>,
    next_id: u64,
    closed: bool,
}

impl<H: FormatHandler + ?Sized> FormatChain<H> {
    /// Create an empty chain for `kind`.
    pub fn new(kind: HandlerKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            next_id: 0,
            closed: false,
        }
    }

    /// Which kind of handler this chain holds.
    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    fn ensure_open(&self) -> Result<(), RegistryError> {
        if self.closed {
            return Err(RegistryError::DomainClosed {
                domain: Domain::from(self.kind),
            });
        }
        Ok(())
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Append a handler; it is probed after every handler already present.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if this exact handler is already in the chain.
    /// - `DomainClosed` after `finalize`.
    pub fn add(&mut self, handler: Arc<H>) -> Result<HandlerId, RegistryError> {
        self.ensure_open()?;
        if self.contains(&handler) {
            return Err(RegistryError::duplicate(EntryKind::Handler, handler.name()));
        }
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.entries.push(ChainEntry { id, handler });
        Ok(id)
    }

    /// Remove a handler by reference and return the id it was added under.
    /// The order of the others is unchanged.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the handler is not currently in the chain.
    pub fn remove(&mut self, handler: &Arc<H>) -> Result<HandlerId, RegistryError> {
        match self.entries.iter().position(|e| Arc::ptr_eq(&e.handler, handler)) {
            Some(index) => Ok(self.entries.remove(index).id),
            None => Err(RegistryError::NotRegistered {
                kind: self.kind,
                name: handler.name().to_string(),
            }),
        }
    }

    /// Remove a handler by the id `add` returned.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if no entry has this id.
    pub fn remove_id(&mut self, id: HandlerId) -> Result<(), RegistryError> {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                Ok(())
            }
            None => Err(RegistryError::NotRegistered {
                kind: self.kind,
                name: id.to_string(),
            }),
        }
    }

    /// Remove every handler, keeping the chain open. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Close the chain for good, dropping any handler still present.
    ///
    /// Returns how many handlers were still registered.
    ///
    /// # Errors
    ///
    /// `DomainClosed` if the chain is already finalized.
    pub fn finalize(&mut self) -> Result<usize, RegistryError> {
        self.ensure_open()?;
        let remaining = self.clear();
        self.closed = true;
        Ok(remaining)
    }

    /// Check whether `finalize` has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Return the first handler, in registration order, that recognizes `probe`.
    ///
    /// # Errors
    ///
    /// - `NoHandlerFound` if no handler accepts the probe.
    /// - `DomainClosed` after `finalize`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, probe: &Probe<'_>) -> Result<&Arc<H>, RegistryError> {
        self.ensure_open()?;
        self.entries
            .iter()
            .find(|e| e.handler.recognize(probe))
            .map(|e| &e.handler)
            .ok_or_else(|| RegistryError::NoHandlerFound {
                kind: self.kind,
                input: probe.to_string(),
            })
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Check whether this exact handler is in the chain.
    pub fn contains(&self, handler: &Arc<H>) -> bool {
        self.entries.iter().any(|e| Arc::ptr_eq(&e.handler, handler))
    }

    /// Check whether an entry with this id is in the chain.
    pub fn contains_id(&self, id: HandlerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Iterate over handlers in probe order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<H>> {
        self.entries.iter().map(|e| &e.handler)
    }

    /// Iterate over `(id, handler)` pairs in probe order.
    pub fn entries(&self) -> impl Iterator<Item = (HandlerId, &Arc<H>)> {
        self.entries.iter().map(|e| (e.id, &e.handler))
    }

    /// Handler names in probe order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.handler.name()).collect()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: FormatHandler + ?Sized> fmt::Debug for FormatChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatChain")
            .field("kind", &self.kind)
            .field("handlers", &self.names())
            .field("closed", &self.closed)
            .finish()
    }
}

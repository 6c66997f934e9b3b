//! Error types for the registry.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistryError
//! ├── registration-time (fatal at startup)
//! │   DuplicateName, UnknownParent, ConflictingFlags, InvalidPhase
//! ├── resolution-time (recoverable)
//! │   NotFound, NotInstantiable, NoHandlerFound, Handler, Setting
//! └── removal / shutdown
//!     NotRegistered, DomainClosed
//! ```
//!
//! Registration errors mean the bootstrap itself is misconfigured and a
//! partially-populated registry cannot be trusted. Resolution errors are
//! ordinary conditions ("no loader recognizes this file") that callers handle.

use std::fmt;

use thiserror::Error;

use crate::format::HandlerKind;
use crate::lifecycle::LifecyclePhase;
use crate::setting::SettingError;

// ============================================================================
// Kinds
// ============================================================================

/// What kind of named entry an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A type in the type registry.
    Type,
    /// A record in the singleton directory.
    Singleton,
    /// A setting description.
    Setting,
    /// A handler in a format chain.
    Handler,
}

impl EntryKind {
    /// Returns a human-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Type => "type",
            EntryKind::Singleton => "singleton",
            EntryKind::Setting => "setting",
            EntryKind::Handler => "format handler",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table that can be closed for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// The type registry.
    Types,
    /// The resource loader chain.
    Loaders,
    /// The resource saver chain.
    Savers,
    /// The singleton directory.
    Singletons,
    /// The settings catalog.
    Settings,
}

impl Domain {
    /// Returns a human-readable name for this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Types => "type registry",
            Domain::Loaders => "resource loader",
            Domain::Savers => "resource saver",
            Domain::Singletons => "singleton directory",
            Domain::Settings => "settings catalog",
        }
    }
}

impl From<HandlerKind> for Domain {
    fn from(kind: HandlerKind) -> Self {
        match kind {
            HandlerKind::Loader => Domain::Loaders,
            HandlerKind::Saver => Domain::Savers,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Handler Errors
// ============================================================================

/// Errors returned by concrete format handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The input did not have the framing the handler expects.
    #[error("malformed input: {reason}")]
    Malformed {
        /// What was wrong with the input.
        reason: String,
    },

    /// The handler recognized the input but cannot process it.
    #[error("unsupported: {reason}")]
    Unsupported {
        /// Why the input is unsupported.
        reason: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Malformed`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        HandlerError::Malformed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`HandlerError::Unsupported`].
    pub fn unsupported(reason: impl Into<String>) -> Self {
        HandlerError::Unsupported {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors produced by the type registry, format chains, singleton directory
/// and lifecycle sequencer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The name is already taken in its table.
    #[error("duplicate {kind}: '{name}' is already registered")]
    DuplicateName {
        /// Which table rejected the name.
        kind: EntryKind,
        /// The duplicated name.
        name: String,
    },

    /// No entry exists under this name.
    #[error("{kind} not found: '{name}'")]
    NotFound {
        /// Which table was searched.
        kind: EntryKind,
        /// The missing name.
        name: String,
    },

    /// A type named a parent that was not registered first.
    #[error("type '{name}' names unknown parent '{parent}'")]
    UnknownParent {
        /// The type being registered.
        name: String,
        /// The parent that does not exist.
        parent: String,
    },

    /// The type is virtual or lacks a constructor.
    #[error("type '{0}' cannot be instantiated")]
    NotInstantiable(String),

    /// No handler in the chain accepted the input.
    #[error("no {kind} recognizes '{input}'")]
    NoHandlerFound {
        /// Which chain was probed.
        kind: HandlerKind,
        /// Description of the probed input.
        input: String,
    },

    /// The handler reference is not currently in the chain.
    #[error("{kind} '{name}' is not registered")]
    NotRegistered {
        /// Which chain was searched.
        kind: HandlerKind,
        /// The handler's name.
        name: String,
    },

    /// The domain was finalized; no further calls are legal.
    #[error("{domain} is closed")]
    DomainClosed {
        /// The finalized domain.
        domain: Domain,
    },

    /// A type was declared both virtual and instantiable.
    #[error("type '{0}' cannot be both virtual and instantiable")]
    ConflictingFlags(String),

    /// A lifecycle-gated operation was called in the wrong phase.
    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        /// The attempted operation.
        operation: &'static str,
        /// The phase the sequencer was in.
        phase: LifecyclePhase,
    },

    /// A concrete handler failed while processing its input.
    #[error("{handler} failed: {source}")]
    Handler {
        /// Name of the failing handler.
        handler: String,
        /// The handler's own error.
        #[source]
        source: HandlerError,
    },

    /// A setting value was rejected by its metadata.
    #[error(transparent)]
    Setting(#[from] SettingError),
}

impl RegistryError {
    /// Shorthand for [`RegistryError::NotFound`].
    pub fn not_found(kind: EntryKind, name: impl Into<String>) -> Self {
        RegistryError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for [`RegistryError::DuplicateName`].
    pub fn duplicate(kind: EntryKind, name: impl Into<String>) -> Self {
        RegistryError::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    /// Check if this error is an ordinary resolution-time condition that the
    /// caller is expected to handle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::NotFound { .. }
                | RegistryError::NotInstantiable(_)
                | RegistryError::NoHandlerFound { .. }
                | RegistryError::Handler { .. }
                | RegistryError::Setting(_)
        )
    }

    /// Check if this error means the bootstrap itself is misconfigured.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            RegistryError::DuplicateName { .. }
                | RegistryError::UnknownParent { .. }
                | RegistryError::ConflictingFlags(_)
                | RegistryError::InvalidPhase { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_display() {
        let err = RegistryError::duplicate(EntryKind::Type, "Image");
        assert_eq!(format!("{err}"), "duplicate type: 'Image' is already registered");
    }

    #[test]
    fn not_found_display() {
        let err = RegistryError::not_found(EntryKind::Singleton, "OS");
        assert_eq!(format!("{err}"), "singleton not found: 'OS'");
    }

    #[test]
    fn unknown_parent_display() {
        let err = RegistryError::UnknownParent {
            name: "Image".to_string(),
            parent: "Resource".to_string(),
        };
        assert_eq!(format!("{err}"), "type 'Image' names unknown parent 'Resource'");
    }

    #[test]
    fn no_handler_display() {
        let err = RegistryError::NoHandlerFound {
            kind: HandlerKind::Loader,
            input: "scene.xyz".to_string(),
        };
        assert_eq!(format!("{err}"), "no resource loader recognizes 'scene.xyz'");
    }

    #[test]
    fn domain_closed_display() {
        let err = RegistryError::DomainClosed {
            domain: Domain::Savers,
        };
        assert_eq!(format!("{err}"), "resource saver is closed");
    }

    #[test]
    fn invalid_phase_display() {
        let err = RegistryError::InvalidPhase {
            operation: "register a type",
            phase: LifecyclePhase::Ready,
        };
        assert_eq!(format!("{err}"), "cannot register a type while ready");
    }

    #[test]
    fn handler_error_display_and_source() {
        use std::error::Error as _;

        let err = RegistryError::Handler {
            handler: "binary loader".to_string(),
            source: HandlerError::malformed("missing RSRC magic"),
        };
        assert_eq!(
            format!("{err}"),
            "binary loader failed: malformed input: missing RSRC magic"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn recoverable_classification() {
        assert!(RegistryError::not_found(EntryKind::Type, "X").is_recoverable());
        assert!(RegistryError::NotInstantiable("X".into()).is_recoverable());
        assert!(
            RegistryError::NoHandlerFound {
                kind: HandlerKind::Saver,
                input: "x".into()
            }
            .is_recoverable()
        );
        assert!(!RegistryError::duplicate(EntryKind::Type, "X").is_recoverable());
        assert!(
            !RegistryError::DomainClosed {
                domain: Domain::Loaders
            }
            .is_recoverable()
        );
    }

    #[test]
    fn registration_classification() {
        assert!(RegistryError::duplicate(EntryKind::Singleton, "OS").is_registration());
        assert!(RegistryError::ConflictingFlags("X".into()).is_registration());
        assert!(!RegistryError::not_found(EntryKind::Type, "X").is_registration());
    }

    #[test]
    fn domain_from_handler_kind() {
        assert_eq!(Domain::from(HandlerKind::Loader), Domain::Loaders);
        assert_eq!(Domain::from(HandlerKind::Saver), Domain::Savers);
    }
}

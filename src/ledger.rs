//! The construction ledger and the teardown stages that consume it.
//!
//! Every construct operation the context performs is recorded as a
//! [`LedgerTarget`]. Teardown walks the fixed [`TeardownStage`] order and,
//! within each stage, consumes that stage's records back to front. A record
//! is consumed exactly once; removals made before teardown strike their
//! record so nothing is released twice.

use std::fmt;
use std::sync::Arc;

use corereg_core::{HandlerId, HandlerKind, RegistryError};

use crate::foundation::FoundationLeaks;

// ============================================================================
// Stages
// ============================================================================

/// Teardown steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeardownStage {
    /// Remove every loader and saver.
    FormatHandlers,
    /// Finalize the loader and saver chains.
    LoaderFacility,
    /// Unpublish every singleton.
    Singletons,
    /// Drop type metadata and setting descriptions.
    TypeDefaults,
    /// Release interned names and object identities.
    Foundation,
}

impl TeardownStage {
    /// All stages in teardown order.
    pub const ALL: [TeardownStage; 5] = [
        TeardownStage::FormatHandlers,
        TeardownStage::LoaderFacility,
        TeardownStage::Singletons,
        TeardownStage::TypeDefaults,
        TeardownStage::Foundation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeardownStage::FormatHandlers => "format handlers",
            TeardownStage::LoaderFacility => "loader facility",
            TeardownStage::Singletons => "singletons",
            TeardownStage::TypeDefaults => "type defaults",
            TeardownStage::Foundation => "foundation",
        }
    }
}

impl fmt::Display for TeardownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Something the context constructed and must release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerTarget {
    /// Interned names and the object table.
    Foundation,
    /// A loader or saver chain as a whole.
    Facility(HandlerKind),
    /// The type registry's contents.
    TypeTable,
    /// The settings catalog's contents.
    SettingsTable,
    /// One registered loader.
    Loader(HandlerId),
    /// One registered saver.
    Saver(HandlerId),
    /// One published singleton.
    Singleton(Arc<str>),
}

impl LedgerTarget {
    /// The teardown stage that releases this target.
    pub fn stage(&self) -> TeardownStage {
        match self {
            LedgerTarget::Loader(_) | LedgerTarget::Saver(_) => TeardownStage::FormatHandlers,
            LedgerTarget::Facility(_) => TeardownStage::LoaderFacility,
            LedgerTarget::Singleton(_) => TeardownStage::Singletons,
            LedgerTarget::TypeTable | LedgerTarget::SettingsTable => TeardownStage::TypeDefaults,
            LedgerTarget::Foundation => TeardownStage::Foundation,
        }
    }
}

impl fmt::Display for LedgerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerTarget::Foundation => f.write_str("foundation"),
            LedgerTarget::Facility(kind) => write!(f, "{kind} chain"),
            LedgerTarget::TypeTable => f.write_str("type table"),
            LedgerTarget::SettingsTable => f.write_str("settings table"),
            LedgerTarget::Loader(id) => write!(f, "loader {id}"),
            LedgerTarget::Saver(id) => write!(f, "saver {id}"),
            LedgerTarget::Singleton(name) => write!(f, "singleton '{name}'"),
        }
    }
}

/// Ordered record of construct operations.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<LedgerTarget>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a construct operation.
    pub fn record(&mut self, target: LedgerTarget) {
        self.records.push(target);
    }

    /// Forget the most recent record of `target`, if any.
    ///
    /// Returns whether a record was struck.
    pub fn strike(&mut self, target: &LedgerTarget) -> bool {
        match self.records.iter().rposition(|r| r == target) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return every record released by `stage`, newest first.
    pub fn drain_stage(&mut self, stage: TeardownStage) -> Vec<LedgerTarget> {
        let (mut taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.stage() == stage);
        self.records = kept;
        taken.reverse();
        taken
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerTarget> {
        self.records.iter()
    }
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of one teardown run.
#[derive(Debug, Default)]
pub struct TeardownReport {
    /// Completed stages with the number of entries each released.
    pub stages: Vec<(TeardownStage, usize)>,
    /// Total entries released.
    pub released: usize,
    /// Failures logged along the way. Teardown does not stop for them.
    pub errors: Vec<RegistryError>,
    /// What the foundation still tracked when it was released.
    pub leaks: FoundationLeaks,
}

impl TeardownReport {
    /// Check that every stage ran and nothing failed. Leaks are reported
    /// separately in [`leaks`](Self::leaks).
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.stages.len() == TeardownStage::ALL.len()
    }
}

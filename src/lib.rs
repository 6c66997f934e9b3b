//! corereg - the core type and service registry.
//!
//! The registry is the bootstrap layer everything else resolves through:
//!
//! - a type registry mapping names to instantiation metadata
//! - loader and saver chains resolved first-match in registration order
//! - a singleton directory of process-wide services
//! - a lifecycle sequencer that orders initialization and teardown
//!
//! All of it lives in an explicit [`Context`] rather than in globals.
//!
//! # Quick Start
//!
//! ```ignore
//! use corereg::prelude::*;
//!
//! let mut ctx = Context::new();
//! ctx.bootstrap(default_modules())?;
//!
//! let image = ctx.load("icon.png", &bytes)?;
//! let os = ctx.get_singleton("OS")?;
//!
//! let report = ctx.shutdown()?;
//! assert!(report.is_clean());
//! ```

mod context;
mod foundation;
mod ledger;
mod reflection;

pub use context::{Context, Result};
pub use foundation::{Foundation, FoundationLeaks};
pub use ledger::{Ledger, LedgerTarget, TeardownReport, TeardownStage};
pub use reflection::{ConfigStore, ReflectionLayer};

pub use corereg_core::{
    Constructor, Domain, EntryKind, FormatHandler, FormatLoader, FormatSaver, HandlerError,
    HandlerId, HandlerKind, Instance, LifecyclePhase, ObjectId, Probe, RegistryError, Resource,
    SettingError, SettingHint, SettingInfo, SettingValue, Singleton, TypeEntry, TypeFlags,
    TypeHash, construct_default,
};
pub use corereg_modules::{self as modules, ByteBuffer, CoreService, default_modules};
pub use corereg_registry::{FormatChain, Module, SettingsCatalog, SingletonDirectory, TypeRegistry};

/// Common imports.
pub mod prelude {
    pub use crate::{
        ConfigStore, Context, FormatHandler, FormatLoader, FormatSaver, HandlerError,
        LifecyclePhase, Module, Probe, ReflectionLayer, RegistryError, Resource, SettingInfo,
        SettingValue, TypeFlags, default_modules,
    };
}

//! Core types for the corereg registry.
//!
//! This crate holds the vocabulary shared by every table: type identity,
//! entries, instances, the foundational identity/interning tables, the format
//! handler contracts, setting metadata and the error types.

mod entries;
mod error;
mod format;
mod instance;
mod lifecycle;
mod object_db;
mod setting;
mod string_table;
mod type_hash;

pub use entries::{Singleton, TypeEntry, TypeFlags};
pub use error::{Domain, EntryKind, HandlerError, RegistryError};
pub use format::{
    FormatHandler, FormatLoader, FormatSaver, HandlerId, HandlerKind, Probe, Resource,
};
pub use instance::{Constructor, Instance, construct_default};
pub use lifecycle::LifecyclePhase;
pub use object_db::{ObjectDb, ObjectGuard, ObjectId};
pub use setting::{SettingError, SettingHint, SettingInfo, SettingValue};
pub use string_table::StringTable;
pub use type_hash::{TypeHash, hash_constants};

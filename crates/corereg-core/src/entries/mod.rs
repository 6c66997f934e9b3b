//! Registry entry types.
//!
//! - [`TypeEntry`] - Type registry entry with [`TypeFlags`]
//! - [`Singleton`] - Singleton directory record

mod singleton;
mod type_entry;

pub use singleton::Singleton;
pub use type_entry::{TypeEntry, TypeFlags};

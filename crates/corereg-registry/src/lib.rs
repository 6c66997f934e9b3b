//! Registration tables for corereg.
//!
//! Each table owns one naming domain and enforces its own invariants:
//!
//! - [`TypeRegistry`] - type names to instantiation metadata
//! - [`FormatChain`] - ordered loaders or savers, resolved first-match
//! - [`SingletonDirectory`] - service names to shared instances
//! - [`SettingsCatalog`] - descriptive metadata for external settings
//!
//! None of the tables know about lifecycle phases; sequencing registration
//! and teardown across them is the job of the context in the root crate.
//! A [`Module`] bundles registrations for all of them.

mod format_chain;
mod module;
mod settings_catalog;
mod singleton_directory;
mod type_registry;

pub use format_chain::FormatChain;
pub use module::{Module, ModuleParts};
pub use settings_catalog::SettingsCatalog;
pub use singleton_directory::SingletonDirectory;
pub use type_registry::TypeRegistry;

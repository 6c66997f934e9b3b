//! Built-in modules for corereg.
//!
//! - **core_types** - the `Object` class hierarchy
//! - **formats** - binary container, import remap, image, PO and PEM handlers
//! - **services** - the process-wide core service singletons
//! - **settings** - metadata for the core network settings
//!
//! # Usage
//!
//! ```ignore
//! use corereg_modules::default_modules;
//!
//! let mut ctx = Context::new();
//! ctx.bootstrap(default_modules())?;
//! ```

pub mod core_types;
pub mod formats;
pub mod services;
pub mod settings;

pub use core_types::{ByteBuffer, ROOT_TYPE, RngState};
pub use services::CoreService;

use corereg_registry::Module;

/// All built-in modules, in installation order.
///
/// Core types come first because every other module's classes derive from
/// them.
pub fn default_modules() -> Vec<Module> {
    vec![
        core_types::module(),
        formats::module(),
        services::module(),
        settings::module(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modules_in_order() {
        let names: Vec<String> = default_modules()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["core_types", "formats", "services", "settings"]);
    }
}

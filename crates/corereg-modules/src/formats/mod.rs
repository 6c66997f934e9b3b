//! Built-in resource format handlers.
//!
//! Registration order is probe order. Each handler accepts a narrow set of
//! extensions, except the import remap loader which only claims paths that
//! were actually imported, so no built-in loader shadows a later one.

pub mod binary;
pub mod crypto;
pub mod image;
pub mod importer;
pub mod translation;

use std::sync::Arc;

use corereg_registry::Module;

pub use binary::{BinaryLoader, BinarySaver};
pub use crypto::{CryptoLoader, CryptoSaver};
pub use image::ImageLoader;
pub use importer::ImportRemapLoader;
pub use translation::PoLoader;

/// Build the formats module with an empty import remap table.
pub fn module() -> Module {
    module_with_remaps(ImportRemapLoader::new())
}

/// Build the formats module around a prepared remap table.
pub fn module_with_remaps(importer: ImportRemapLoader) -> Module {
    Module::new("formats")
        .loader(Arc::new(PoLoader))
        .saver(Arc::new(BinarySaver))
        .loader(Arc::new(BinaryLoader))
        .loader(Arc::new(importer))
        .loader(Arc::new(ImageLoader))
        .saver(Arc::new(CryptoSaver))
        .loader(Arc::new(CryptoLoader))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_order() {
        let module = module();
        let loaders: Vec<&str> = module.loaders().iter().map(|l| l.name()).collect();
        assert_eq!(
            loaders,
            vec![
                "PO translation loader",
                "binary loader",
                "import remap loader",
                "image loader",
                "crypto loader"
            ]
        );
        let savers: Vec<&str> = module.savers().iter().map(|s| s.name()).collect();
        assert_eq!(savers, vec!["binary saver", "crypto saver"]);
    }
}

//! Import remaps: source assets that were converted into another resource.

use rustc_hash::FxHashMap;

use corereg_core::{FormatHandler, FormatLoader, HandlerError, Probe, Resource};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Remap {
    imported_path: String,
    type_name: String,
}

/// Loads a source path through the resource it was imported as.
///
/// Only paths present in the remap table are recognized, so an empty table
/// lets every probe fall through to later loaders.
#[derive(Debug, Default)]
pub struct ImportRemapLoader {
    remaps: FxHashMap<String, Remap>,
}

impl ImportRemapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to the resource of `type_name` imported at `imported_path`.
    pub fn with_remap(
        mut self,
        source: impl Into<String>,
        imported_path: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.remaps.insert(
            source.into(),
            Remap {
                imported_path: imported_path.into(),
                type_name: type_name.into(),
            },
        );
        self
    }

    /// Where `source` was imported to, if it was.
    pub fn imported_path(&self, source: &str) -> Option<&str> {
        self.remaps.get(source).map(|r| r.imported_path.as_str())
    }

    pub fn len(&self) -> usize {
        self.remaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaps.is_empty()
    }
}

impl FormatHandler for ImportRemapLoader {
    fn name(&self) -> &str {
        "import remap loader"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        probe.get_path().is_some_and(|p| self.remaps.contains_key(p))
    }
}

impl FormatLoader for ImportRemapLoader {
    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
        let remap = self
            .remaps
            .get(path)
            .ok_or_else(|| HandlerError::unsupported(format!("'{path}' has no import remap")))?;
        Ok(Resource::new(
            remap.type_name.as_str(),
            remap.imported_path.as_str(),
            source.to_vec(),
        ))
    }
}

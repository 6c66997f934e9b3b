//! Gettext PO catalogs.

use corereg_core::{FormatHandler, FormatLoader, HandlerError, Probe, Resource};

/// Loads `.po` catalogs as `Translation` resources.
#[derive(Debug, Default)]
pub struct PoLoader;

impl PoLoader {
    /// Number of `msgid` entries in a catalog, including the header entry.
    pub fn count_entries(text: &str) -> usize {
        text.lines()
            .filter(|line| line.trim_start().starts_with("msgid "))
            .count()
    }
}

impl FormatHandler for PoLoader {
    fn name(&self) -> &str {
        "PO translation loader"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        probe.has_extension(&["po"])
    }
}

impl FormatLoader for PoLoader {
    fn recognized_extensions(&self) -> Vec<String> {
        vec!["po".to_string()]
    }

    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
        let text = std::str::from_utf8(source)
            .map_err(|_| HandlerError::malformed("catalog is not UTF-8"))?;
        if Self::count_entries(text) == 0 {
            return Err(HandlerError::malformed("no msgid entries"));
        }
        Ok(Resource::new("Translation", path, source.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"msgid ""
msgstr "Content-Type: text/plain; charset=UTF-8\n"

msgid "Hello"
msgstr "Bonjour"
"#;

    #[test]
    fn loads_catalog() {
        let res = PoLoader.load("fr.po", CATALOG.as_bytes()).unwrap();
        assert_eq!(res.type_name, "Translation");
        assert_eq!(PoLoader::count_entries(CATALOG), 2);
    }

    #[test]
    fn rejects_non_catalog() {
        assert!(PoLoader.load("fr.po", b"just text").is_err());
        assert!(PoLoader.load("fr.po", &[0xC3, 0x28]).is_err());
    }

    #[test]
    fn recognizes_po_extension() {
        assert!(PoLoader.recognize(&Probe::path("locale/fr.po")));
        assert!(!PoLoader.recognize(&Probe::path("locale/fr.mo")));
    }
}

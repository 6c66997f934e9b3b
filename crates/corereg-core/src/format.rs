//! Format handler contracts.
//!
//! A handler is a loader or saver that first *recognizes* an input through a
//! [`Probe`] and then *executes* on it. The concrete codecs behind handlers are
//! opaque to the registry: it only orders them, probes them and forwards their
//! results.

use std::fmt;
use std::path::Path;

use crate::error::HandlerError;

/// Which chain a handler belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Reads resources.
    Loader,
    /// Writes resources.
    Saver,
}

impl HandlerKind {
    /// Returns a human-readable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Loader => "resource loader",
            HandlerKind::Saver => "resource saver",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a registration inside a chain.
///
/// Ids are never reused, so re-adding a removed handler yields a fresh id
/// ordered after every existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Resource
// ============================================================================

/// A loaded resource: its type name, origin path and opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Registered type name of the resource (e.g. `"Image"`).
    pub type_name: String,
    /// Path the resource was loaded from or will be saved to.
    pub path: String,
    /// Payload bytes. Only the producing codec interprets them.
    pub data: Vec<u8>,
}

impl Resource {
    /// Create a new resource.
    pub fn new(type_name: impl Into<String>, path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            type_name: type_name.into(),
            path: path.into(),
            data,
        }
    }
}

// ============================================================================
// Probe
// ============================================================================

/// The input a handler's `recognize` predicate inspects.
///
/// A probe carries whatever the caller knows: a path, a bare extension, the
/// leading bytes of the content, or the resource about to be saved.
#[derive(Debug, Clone, Default)]
pub struct Probe<'a> {
    path: Option<&'a str>,
    extension: Option<String>,
    content: Option<&'a [u8]>,
    resource: Option<&'a Resource>,
}

impl<'a> Probe<'a> {
    /// Probe by resource path; the extension is derived from it.
    pub fn path(path: &'a str) -> Self {
        Self {
            path: Some(path),
            extension: extension_of(path),
            ..Self::default()
        }
    }

    /// Probe by bare extension, with or without a leading dot.
    pub fn extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        Self {
            extension: (!ext.is_empty()).then_some(ext),
            ..Self::default()
        }
    }

    /// Probe by content only.
    pub fn content(content: &'a [u8]) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    /// Attach content bytes to this probe.
    pub fn with_content(mut self, content: &'a [u8]) -> Self {
        self.content = Some(content);
        self
    }

    /// Attach the resource being saved to this probe.
    pub fn with_resource(mut self, resource: &'a Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// The probed path, if any.
    pub fn get_path(&self) -> Option<&'a str> {
        self.path
    }

    /// The lowercase extension without its dot, if any.
    pub fn get_extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The probed content, if any.
    pub fn get_content(&self) -> Option<&'a [u8]> {
        self.content
    }

    /// The resource being saved, if any.
    pub fn get_resource(&self) -> Option<&'a Resource> {
        self.resource
    }

    /// Check whether the extension is one of `extensions` (case-insensitive).
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        match self.get_extension() {
            Some(ext) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// Check whether the content starts with `magic`.
    pub fn starts_with(&self, magic: &[u8]) -> bool {
        self.content.is_some_and(|c| c.starts_with(magic))
    }
}

impl fmt::Display for Probe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = self.path {
            return f.write_str(path);
        }
        if let Some(ext) = &self.extension {
            return write!(f, ".{ext}");
        }
        if let Some(resource) = self.resource {
            return write!(f, "<{}>", resource.type_name);
        }
        match self.content {
            Some(content) => write!(f, "<{} bytes>", content.len()),
            None => f.write_str("<empty probe>"),
        }
    }
}

fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_ascii_lowercase())
}

// ============================================================================
// Handler Traits
// ============================================================================

/// Common surface of every handler in a format chain.
pub trait FormatHandler: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Decide whether this handler accepts the probed input.
    fn recognize(&self, probe: &Probe<'_>) -> bool;
}

/// A handler that reads resources.
pub trait FormatLoader: FormatHandler {
    /// Extensions this loader reads, lowercase and without dots.
    fn recognized_extensions(&self) -> Vec<String> {
        Vec::new()
    }

    /// Produce a resource from the bytes read at `path`.
    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError>;
}

/// A handler that writes resources.
pub trait FormatSaver: FormatHandler {
    /// Extensions this saver can write for `resource`.
    fn recognized_extensions(&self, _resource: &Resource) -> Vec<String> {
        Vec::new()
    }

    /// Encode `resource` for storage at `path`.
    fn save(&self, resource: &Resource, path: &str) -> Result<Vec<u8>, HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_path_derives_lowercase_extension() {
        let probe = Probe::path("res://icons/Logo.PNG");
        assert_eq!(probe.get_extension(), Some("png"));
        assert_eq!(probe.get_path(), Some("res://icons/Logo.PNG"));
        assert!(probe.has_extension(&["jpg", "png"]));
    }

    #[test]
    fn probe_path_without_extension() {
        let probe = Probe::path("README");
        assert_eq!(probe.get_extension(), None);
        assert!(!probe.has_extension(&["md"]));
    }

    #[test]
    fn trailing_dot_has_no_extension() {
        assert_eq!(Probe::path("x.").get_extension(), None);
        assert_eq!(
            Probe::path("x.").get_extension(),
            Probe::extension(".").get_extension()
        );
    }

    #[test]
    fn probe_extension_strips_dot() {
        assert_eq!(Probe::extension(".Res").get_extension(), Some("res"));
        assert_eq!(Probe::extension("crt").get_extension(), Some("crt"));
        assert_eq!(Probe::extension(".").get_extension(), None);
    }

    #[test]
    fn probe_content_magic() {
        let probe = Probe::path("a.bin").with_content(b"RSRC\x00\x01");
        assert!(probe.starts_with(b"RSRC"));
        assert!(!Probe::path("a.bin").starts_with(b"RSRC"));
    }

    #[test]
    fn probe_display() {
        assert_eq!(Probe::path("x.bin").to_string(), "x.bin");
        assert_eq!(Probe::extension("tres").to_string(), ".tres");
        assert_eq!(Probe::content(b"abc").to_string(), "<3 bytes>");
        let res = Resource::new("Image", "", Vec::new());
        assert_eq!(Probe::default().with_resource(&res).to_string(), "<Image>");
    }

    #[test]
    fn handler_kind_display() {
        assert_eq!(HandlerKind::Loader.to_string(), "resource loader");
        assert_eq!(HandlerId(7).to_string(), "#7");
    }
}

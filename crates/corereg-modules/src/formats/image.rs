//! Raster image loader.
//!
//! Pixel decoding belongs to the image codecs; this loader only checks the
//! signature of the formats that have a fixed one and hands back the bytes.

use corereg_core::{FormatHandler, FormatLoader, HandlerError, Probe, Resource};

/// Extensions the image loader accepts.
pub const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tga", "hdr", "exr", "svg"];

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Default)]
pub struct ImageLoader;

impl FormatHandler for ImageLoader {
    fn name(&self) -> &str {
        "image loader"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        if probe.get_extension().is_some() {
            return probe.has_extension(EXTENSIONS);
        }
        probe.starts_with(PNG_MAGIC) || probe.starts_with(JPEG_MAGIC)
    }
}

impl FormatLoader for ImageLoader {
    fn recognized_extensions(&self) -> Vec<String> {
        EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
    }

    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
        let probe = Probe::path(path).with_content(source);
        if probe.has_extension(&["png"]) && !probe.starts_with(PNG_MAGIC) {
            return Err(HandlerError::malformed("missing PNG signature"));
        }
        if probe.has_extension(&["jpg", "jpeg"]) && !probe.starts_with(JPEG_MAGIC) {
            return Err(HandlerError::malformed("missing JPEG start-of-image marker"));
        }
        if source.is_empty() {
            return Err(HandlerError::malformed("empty image"));
        }
        Ok(Resource::new("Image", path, source.to_vec()))
    }
}

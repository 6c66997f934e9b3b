//! Binary resource container.
//!
//! ```text
//! +------+----------------+-----------+---------+
//! | RSRC | name len (u32) | type name | payload |
//! +------+----------------+-----------+---------+
//!   4 B     little-endian    UTF-8      opaque
//! ```

use corereg_core::{FormatHandler, FormatLoader, FormatSaver, HandlerError, Probe, Resource};

/// Container magic.
pub const MAGIC: &[u8; 4] = b"RSRC";

/// Extension used for binary resources.
pub const EXTENSION: &str = "res";

const HEADER_LEN: usize = MAGIC.len() + 4;

/// Frame `resource` in a binary container.
pub fn encode(resource: &Resource) -> Result<Vec<u8>, HandlerError> {
    let name = resource.type_name.as_bytes();
    let len = u32::try_from(name.len())
        .map_err(|_| HandlerError::unsupported("type name does not fit the container header"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + name.len() + resource.data.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(&resource.data);
    Ok(out)
}

/// Split a binary container into its type name and payload.
pub fn decode(bytes: &[u8]) -> Result<(&str, &[u8]), HandlerError> {
    let rest = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| HandlerError::malformed("missing RSRC magic"))?;
    let (len, rest) = rest
        .split_first_chunk::<4>()
        .ok_or_else(|| HandlerError::malformed("truncated header"))?;
    let len = u32::from_le_bytes(*len) as usize;
    if rest.len() < len {
        return Err(HandlerError::malformed("type name runs past end of input"));
    }
    let (name, payload) = rest.split_at(len);
    let name = std::str::from_utf8(name)
        .map_err(|_| HandlerError::malformed("type name is not UTF-8"))?;
    if name.is_empty() {
        return Err(HandlerError::malformed("empty type name"));
    }
    Ok((name, payload))
}

/// Loads `.res` files, or any input that starts with the container magic.
#[derive(Debug, Default)]
pub struct BinaryLoader;

impl FormatHandler for BinaryLoader {
    fn name(&self) -> &str {
        "binary loader"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        probe.has_extension(&[EXTENSION]) || probe.starts_with(MAGIC)
    }
}

impl FormatLoader for BinaryLoader {
    fn recognized_extensions(&self) -> Vec<String> {
        vec![EXTENSION.to_string()]
    }

    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
        let (type_name, payload) = decode(source)?;
        Ok(Resource::new(type_name, path, payload.to_vec()))
    }
}

/// Saves any resource to a `.res` container.
#[derive(Debug, Default)]
pub struct BinarySaver;

impl FormatHandler for BinarySaver {
    fn name(&self) -> &str {
        "binary saver"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        probe.has_extension(&[EXTENSION])
    }
}

impl FormatSaver for BinarySaver {
    fn recognized_extensions(&self, _resource: &Resource) -> Vec<String> {
        vec![EXTENSION.to_string()]
    }

    fn save(&self, resource: &Resource, _path: &str) -> Result<Vec<u8>, HandlerError> {
        encode(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_container_loads_back() {
        let image = Resource::new("Image", "icon.res", vec![1, 2, 3]);
        let bytes = BinarySaver.save(&image, "icon.res").unwrap();
        assert!(bytes.starts_with(MAGIC));
        assert_eq!(BinaryLoader.load("icon.res", &bytes).unwrap(), image);
    }

    #[test]
    fn recognizes_extension_or_magic() {
        assert!(BinaryLoader.recognize(&Probe::path("scene.RES")));
        assert!(BinaryLoader.recognize(&Probe::content(b"RSRC\0\0\0\0")));
        assert!(!BinaryLoader.recognize(&Probe::path("scene.tscn")));
        assert!(BinarySaver.recognize(&Probe::extension(".res")));
        assert!(!BinarySaver.recognize(&Probe::extension("png")));
    }

    #[test]
    fn rejects_bad_framing() {
        assert_eq!(
            decode(b"RIFF1234"),
            Err(HandlerError::malformed("missing RSRC magic"))
        );
        assert_eq!(decode(b"RSRC\x01"), Err(HandlerError::malformed("truncated header")));
        assert!(decode(b"RSRC\x09\0\0\0Image").is_err());
        assert!(decode(b"RSRC\0\0\0\0payload").is_err());
    }
}

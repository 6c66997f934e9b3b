//! PEM certificates and keys.
//!
//! | Extension     | Resource type     | Required header                 |
//! |---------------|-------------------|---------------------------------|
//! | `crt`         | `X509Certificate` | `-----BEGIN CERTIFICATE-----`   |
//! | `key`, `pub`  | `CryptoKey`       | `-----BEGIN ... KEY-----`       |

use corereg_core::{FormatHandler, FormatLoader, FormatSaver, HandlerError, Probe, Resource};

pub const CERTIFICATE_TYPE: &str = "X509Certificate";
pub const KEY_TYPE: &str = "CryptoKey";

const CERTIFICATE_HEADER: &str = "-----BEGIN CERTIFICATE-----";

fn type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "crt" => Some(CERTIFICATE_TYPE),
        "key" | "pub" => Some(KEY_TYPE),
        _ => None,
    }
}

fn has_key_header(text: &str) -> bool {
    text.lines()
        .any(|l| l.starts_with("-----BEGIN ") && l.trim_end().ends_with("KEY-----"))
}

/// Check that `data` carries the PEM header `type_name` needs.
fn check_pem(type_name: &str, data: &[u8]) -> Result<(), HandlerError> {
    let text =
        std::str::from_utf8(data).map_err(|_| HandlerError::malformed("PEM data is not UTF-8"))?;
    let ok = match type_name {
        CERTIFICATE_TYPE => text.contains(CERTIFICATE_HEADER),
        KEY_TYPE => has_key_header(text),
        other => return Err(HandlerError::unsupported(format!("cannot store '{other}' as PEM"))),
    };
    if ok {
        Ok(())
    } else {
        Err(HandlerError::malformed(format!("missing PEM header for {type_name}")))
    }
}

#[derive(Debug, Default)]
pub struct CryptoLoader;

impl FormatHandler for CryptoLoader {
    fn name(&self) -> &str {
        "crypto loader"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        probe.get_extension().and_then(type_for_extension).is_some()
    }
}

impl FormatLoader for CryptoLoader {
    fn recognized_extensions(&self) -> Vec<String> {
        ["crt", "key", "pub"].iter().map(|e| (*e).to_string()).collect()
    }

    fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
        let probe = Probe::path(path);
        let type_name = probe
            .get_extension()
            .and_then(type_for_extension)
            .ok_or_else(|| HandlerError::unsupported(format!("'{path}' is not a certificate or key")))?;
        check_pem(type_name, source)?;
        Ok(Resource::new(type_name, path, source.to_vec()))
    }
}

#[derive(Debug, Default)]
pub struct CryptoSaver;

impl FormatHandler for CryptoSaver {
    fn name(&self) -> &str {
        "crypto saver"
    }

    fn recognize(&self, probe: &Probe<'_>) -> bool {
        let ext_type = probe.get_extension().and_then(type_for_extension);
        match (probe.get_resource(), ext_type) {
            (Some(res), Some(ty)) => res.type_name == ty,
            (Some(res), None) if probe.get_extension().is_none() => {
                res.type_name == CERTIFICATE_TYPE || res.type_name == KEY_TYPE
            }
            (Some(_), None) => false,
            (None, ty) => ty.is_some(),
        }
    }
}

impl FormatSaver for CryptoSaver {
    fn recognized_extensions(&self, resource: &Resource) -> Vec<String> {
        match resource.type_name.as_str() {
            CERTIFICATE_TYPE => vec!["crt".to_string()],
            KEY_TYPE => vec!["key".to_string(), "pub".to_string()],
            _ => Vec::new(),
        }
    }

    fn save(&self, resource: &Resource, _path: &str) -> Result<Vec<u8>, HandlerError> {
        check_pem(&resource.type_name, &resource.data)?;
        Ok(resource.data.clone())
    }
}

//! SettingsCatalog - descriptive metadata for externally stored options.

use rustc_hash::FxHashMap;

use corereg_core::{Domain, EntryKind, RegistryError, SettingInfo, SettingValue};

/// Catalog of setting descriptions, in definition order.
#[derive(Debug, Default)]
pub struct SettingsCatalog {
    settings: Vec<SettingInfo>,
    index: FxHashMap<String, usize>,
    closed: bool,
}

impl SettingsCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe a setting.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the setting is already described.
    /// - `DomainClosed` after `clear`.
    pub fn define(&mut self, info: SettingInfo) -> Result<(), RegistryError> {
        if self.closed {
            return Err(RegistryError::DomainClosed {
                domain: Domain::Settings,
            });
        }
        if self.index.contains_key(&info.name) {
            return Err(RegistryError::duplicate(EntryKind::Setting, info.name));
        }
        self.index.insert(info.name.clone(), self.settings.len());
        self.settings.push(info);
        Ok(())
    }

    /// Get a setting's description.
    pub fn get(&self, name: &str) -> Result<&SettingInfo, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.settings[i])
            .ok_or_else(|| RegistryError::not_found(EntryKind::Setting, name))
    }

    /// Validate `value` against the setting's metadata.
    pub fn validate(&self, name: &str, value: &SettingValue) -> Result<(), RegistryError> {
        self.get(name)?.validate(value)?;
        Ok(())
    }

    /// Iterate over descriptions in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &SettingInfo> {
        self.settings.iter()
    }

    /// Number of described settings.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Check if nothing is described.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Drop every description and close the catalog. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.settings.len();
        self.settings.clear();
        self.index.clear();
        self.closed = true;
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corereg_core::SettingError;

    fn catalog() -> SettingsCatalog {
        let mut catalog = SettingsCatalog::new();
        catalog
            .define(SettingInfo::new("net/timeout", 30).with_range(1, 1800, 1))
            .unwrap();
        catalog
    }

    #[test]
    fn define_and_get() {
        let catalog = catalog();
        assert_eq!(catalog.get("net/timeout").unwrap().default, SettingValue::Int(30));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn duplicate_definition() {
        let mut catalog = catalog();
        assert!(matches!(
            catalog.define(SettingInfo::new("net/timeout", 10)),
            Err(RegistryError::DuplicateName { kind: EntryKind::Setting, .. })
        ));
    }

    #[test]
    fn validate_through_catalog() {
        let catalog = catalog();
        assert!(catalog.validate("net/timeout", &SettingValue::Int(60)).is_ok());
        assert!(matches!(
            catalog.validate("net/timeout", &SettingValue::Int(0)),
            Err(RegistryError::Setting(SettingError::OutOfRange { .. }))
        ));
        assert!(matches!(
            catalog.validate("net/missing", &SettingValue::Int(0)),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_closes() {
        let mut catalog = catalog();
        assert_eq!(catalog.clear(), 1);
        assert!(catalog.is_empty());
        assert!(matches!(
            catalog.define(SettingInfo::new("x", 1)),
            Err(RegistryError::DomainClosed { domain: Domain::Settings })
        ));
    }
}

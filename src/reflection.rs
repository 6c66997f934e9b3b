//! Seams to systems outside the registry.

use rustc_hash::FxHashMap;

use corereg_core::{SettingValue, Singleton};

/// The scripting/reflection layer that exposes singletons to callers.
///
/// The context publishes every singleton as it is added and retracts it when
/// it is removed or torn down. The layer shares the instance handle; it must
/// not assume the service outlives the retraction.
pub trait ReflectionLayer: Send + Sync {
    fn publish(&self, singleton: &Singleton);

    fn retract(&self, name: &str);
}

/// The external configuration store that owns setting values.
pub trait ConfigStore {
    /// The stored value for `name`, if one was set.
    fn get(&self, name: &str) -> Option<SettingValue>;
}

impl ConfigStore for FxHashMap<String, SettingValue> {
    fn get(&self, name: &str) -> Option<SettingValue> {
        FxHashMap::get(self, name).cloned()
    }
}

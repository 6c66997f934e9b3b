//! Module - a bundle of registrations installed into a context in one step.
//!
//! A module is a plain value: building one touches no registry. The context
//! applies it in a fixed order (types, loaders, savers, singletons, settings)
//! so a singleton's class always exists before the singleton is published.
//!
//! ```ignore
//! let module = Module::new("network")
//!     .class("StreamPeer", Some("Reference"))
//!     .class_with::<TcpPeer>("StreamPeerTCP", Some("StreamPeer"))
//!     .setting(SettingInfo::new("network/limits/tcp/connect_timeout_seconds", 30));
//! context.install(module)?;
//! ```

use std::any::Any;
use std::sync::Arc;

use corereg_core::{
    Constructor, FormatLoader, FormatSaver, SettingInfo, Singleton, TypeEntry, TypeFlags,
    construct_default,
};

/// Registrations collected for installation.
#[derive(Clone)]
pub struct Module {
    name: String,
    types: Vec<TypeEntry>,
    loaders: Vec<Arc<dyn FormatLoader>>,
    savers: Vec<Arc<dyn FormatSaver>>,
    singletons: Vec<Singleton>,
    settings: Vec<SettingInfo>,
}

/// The contents of a module, split by table.
pub struct ModuleParts {
    /// Types, in declaration order.
    pub types: Vec<TypeEntry>,
    /// Loaders, in probe order.
    pub loaders: Vec<Arc<dyn FormatLoader>>,
    /// Savers, in probe order.
    pub savers: Vec<Arc<dyn FormatSaver>>,
    /// Singletons, in publication order.
    pub singletons: Vec<Singleton>,
    /// Setting descriptions.
    pub settings: Vec<SettingInfo>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            loaders: Vec::new(),
            savers: Vec::new(),
            singletons: Vec::new(),
            settings: Vec::new(),
        }
    }

    /// The module's name, used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Add a prepared type entry.
    pub fn add_type(mut self, entry: TypeEntry) -> Self {
        self.types.push(entry);
        self
    }

    /// Add an ordinary instantiable class.
    pub fn class(self, name: &str, parent: Option<&str>) -> Self {
        self.add_type(TypeEntry::class(name, parent))
    }

    /// Add a class whose instances are built with `T::default()`.
    pub fn class_with<T: Default + Any + Send + Sync>(self, name: &str, parent: Option<&str>) -> Self {
        self.add_type(TypeEntry::class(name, parent).with_constructor(construct_default::<T>))
    }

    /// Add a virtual (abstract) class.
    pub fn virtual_class(self, name: &str, parent: Option<&str>) -> Self {
        self.add_type(TypeEntry::virtual_class(name, parent))
    }

    /// Add a class instantiable only through `constructor`.
    ///
    /// Without a constructor the class is registered but cannot be
    /// instantiated until a module supplies one.
    pub fn custom_instance_class(
        self,
        name: &str,
        parent: Option<&str>,
        constructor: Option<Constructor>,
    ) -> Self {
        let entry = match constructor {
            Some(ctor) => TypeEntry::custom_instance(name, parent, ctor),
            None => TypeEntry::new(
                name,
                parent,
                TypeFlags::INSTANTIABLE | TypeFlags::CUSTOM_INSTANCE,
            ),
        };
        self.add_type(entry)
    }

    // ==========================================================================
    // Handlers
    // ==========================================================================

    /// Add a resource loader. Loaders are probed in the order added.
    pub fn loader(mut self, loader: Arc<dyn FormatLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Add a resource saver. Savers are probed in the order added.
    pub fn saver(mut self, saver: Arc<dyn FormatSaver>) -> Self {
        self.savers.push(saver);
        self
    }

    // ==========================================================================
    // Singletons & settings
    // ==========================================================================

    /// Publish `instance` under `name`, typed as `class`.
    pub fn singleton<T: Any + Send + Sync>(mut self, name: &str, class: &str, instance: Arc<T>) -> Self {
        self.singletons.push(Singleton::new(name, instance).with_class(class));
        self
    }

    /// Add a prepared singleton record.
    pub fn add_singleton(mut self, singleton: Singleton) -> Self {
        self.singletons.push(singleton);
        self
    }

    /// Describe a setting.
    pub fn setting(mut self, info: SettingInfo) -> Self {
        self.settings.push(info);
        self
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }

    pub fn loaders(&self) -> &[Arc<dyn FormatLoader>] {
        &self.loaders
    }

    pub fn savers(&self) -> &[Arc<dyn FormatSaver>] {
        &self.savers
    }

    pub fn singletons(&self) -> &[Singleton] {
        &self.singletons
    }

    pub fn settings(&self) -> &[SettingInfo] {
        &self.settings
    }

    /// Total number of registrations in the module.
    pub fn item_count(&self) -> usize {
        self.types.len()
            + self.loaders.len()
            + self.savers.len()
            + self.singletons.len()
            + self.settings.len()
    }

    /// Check if the module registers nothing.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Consume the module into its per-table contents.
    pub fn into_parts(self) -> ModuleParts {
        ModuleParts {
            types: self.types,
            loaders: self.loaders,
            savers: self.savers,
            singletons: self.singletons,
            settings: self.settings,
        }
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("types", &self.types.len())
            .field("loaders", &self.loaders.len())
            .field("savers", &self.savers.len())
            .field("singletons", &self.singletons.len())
            .field("settings", &self.settings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corereg_core::{FormatHandler, HandlerError, Probe, Resource};

    #[derive(Default)]
    struct Peer;

    struct Loader;

    impl FormatHandler for Loader {
        fn name(&self) -> &str {
            "loader"
        }

        fn recognize(&self, _probe: &Probe<'_>) -> bool {
            true
        }
    }

    impl FormatLoader for Loader {
        fn load(&self, path: &str, source: &[u8]) -> Result<Resource, HandlerError> {
            Ok(Resource::new("Resource", path, source.to_vec()))
        }
    }

    #[test]
    fn empty_module() {
        let module = Module::new("empty");
        assert_eq!(module.name(), "empty");
        assert!(module.is_empty());
    }

    #[test]
    fn builder_collects_in_order() {
        let module = Module::new("net")
            .class("Reference", Some("Object"))
            .virtual_class("StreamPeer", Some("Reference"))
            .class_with::<Peer>("StreamPeerTCP", Some("StreamPeer"))
            .custom_instance_class("Crypto", Some("Reference"), None)
            .loader(Arc::new(Loader))
            .singleton("IP", "IP", Arc::new(Peer))
            .setting(SettingInfo::new("network/limits/tcp/connect_timeout_seconds", 30));

        let names: Vec<&str> = module.types().iter().map(|t| &*t.name).collect();
        assert_eq!(names, vec!["Reference", "StreamPeer", "StreamPeerTCP", "Crypto"]);
        assert!(module.types()[1].is_virtual());
        assert!(module.types()[2].constructor.is_some());
        assert!(module.types()[3].is_custom_instance());
        assert_eq!(module.item_count(), 7);

        let parts = module.into_parts();
        assert_eq!(parts.loaders.len(), 1);
        assert_eq!(parts.singletons[0].class_name.as_deref(), Some("IP"));
        assert_eq!(parts.settings.len(), 1);
    }
}

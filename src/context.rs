//! The registry context and its lifecycle sequencer.
//!
//! A `Context` owns every table (types, loader and saver chains, singletons,
//! settings) plus the foundation they share, and moves through
//! `Uninitialized -> Initializing -> Ready -> TearingDown -> Finalized`.
//!
//! # Example
//!
//! ```ignore
//! use corereg::Context;
//! use std::sync::Arc;
//!
//! let mut ctx = Context::new();
//! ctx.bootstrap(corereg::default_modules())?;
//!
//! let ctx = Arc::new(ctx);
//! let loader = ctx.resolve_loader("icon.png")?;
//! ```
//!
//! # Phases
//!
//! | Operation                              | Legal in                  |
//! |----------------------------------------|---------------------------|
//! | `register_*`, `add_*`, `define_setting`| `Initializing`            |
//! | `add_format_*_late`                    | `Ready`                   |
//! | `resolve_setting`                      | `Ready`                   |
//! | `lookup`, `instantiate`, `resolve_*`   | any; tables answer        |
//! | `shutdown`                             | `Ready`                   |
//!
//! Registration calls after finalization fail with `DomainClosed`; in any
//! other wrong phase they fail with `InvalidPhase`.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use corereg_core::{
    Domain, EntryKind, FormatLoader, FormatSaver, HandlerId, HandlerKind, Instance,
    LifecyclePhase, Probe, RegistryError, Resource, SettingInfo, SettingValue, Singleton,
    TypeEntry, TypeFlags,
};
use corereg_registry::{FormatChain, Module, SettingsCatalog, SingletonDirectory, TypeRegistry};

use crate::foundation::Foundation;
use crate::ledger::{Ledger, LedgerTarget, TeardownReport, TeardownStage};
use crate::reflection::{ConfigStore, ReflectionLayer};

/// Result type for context operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Owner of every registry table and of their lifecycle.
///
/// `Context` is `Send + Sync`. Once `Ready`, share it as `Arc<Context>` and
/// resolve from any number of threads; the chains take read locks only.
pub struct Context {
    phase: LifecyclePhase,
    foundation: Option<Foundation>,
    types: TypeRegistry,
    loaders: RwLock<FormatChain<dyn FormatLoader>>,
    savers: RwLock<FormatChain<dyn FormatSaver>>,
    singletons: SingletonDirectory,
    settings: SettingsCatalog,
    ledger: Mutex<Ledger>,
    reflection: Option<Arc<dyn ReflectionLayer>>,
}

impl Context {
    /// Create an uninitialized context.
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Uninitialized,
            foundation: None,
            types: TypeRegistry::new(),
            loaders: RwLock::new(FormatChain::new(HandlerKind::Loader)),
            savers: RwLock::new(FormatChain::new(HandlerKind::Saver)),
            singletons: SingletonDirectory::new(),
            settings: SettingsCatalog::new(),
            ledger: Mutex::new(Ledger::new()),
            reflection: None,
        }
    }

    /// Create an uninitialized context that publishes singletons to `layer`.
    pub fn with_reflection(layer: Arc<dyn ReflectionLayer>) -> Self {
        let mut ctx = Self::new();
        ctx.reflection = Some(layer);
        ctx
    }

    /// Create a context bootstrapped with the built-in modules and sealed.
    ///
    /// # Errors
    ///
    /// Returns the first registration failure of a built-in module.
    pub fn with_default_modules() -> Result<Self> {
        let mut ctx = Self::new();
        ctx.bootstrap(corereg_modules::default_modules())?;
        Ok(ctx)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Check if the context is `Ready`.
    pub fn is_ready(&self) -> bool {
        self.phase == LifecyclePhase::Ready
    }

    fn transition(&mut self, operation: &'static str, next: LifecyclePhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(RegistryError::InvalidPhase {
                operation,
                phase: self.phase,
            });
        }
        info!(from = %self.phase, to = %next, "lifecycle transition");
        self.phase = next;
        Ok(())
    }

    fn ensure_registering(&self, operation: &'static str, domain: Domain) -> Result<()> {
        match self.phase {
            LifecyclePhase::Initializing => Ok(()),
            LifecyclePhase::Finalized => Err(RegistryError::DomainClosed { domain }),
            phase => Err(RegistryError::InvalidPhase { operation, phase }),
        }
    }

    fn ensure_ready(&self, operation: &'static str, domain: Domain) -> Result<()> {
        match self.phase {
            LifecyclePhase::Ready => Ok(()),
            LifecyclePhase::Finalized => Err(RegistryError::DomainClosed { domain }),
            phase => Err(RegistryError::InvalidPhase { operation, phase }),
        }
    }

    fn intern(&mut self, name: &str) -> Arc<str> {
        match self.foundation.as_mut() {
            Some(foundation) => foundation.intern(name),
            None => Arc::from(name),
        }
    }

    // ==========================================================================
    // Lifecycle
    // ==========================================================================

    /// Enter `Initializing`: set up the foundation and open every table.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` unless the context is `Uninitialized`.
    pub fn begin(&mut self) -> Result<()> {
        self.transition("begin initialization", LifecyclePhase::Initializing)?;
        self.foundation = Some(Foundation::new());

        let ledger = self.ledger.get_mut();
        ledger.record(LedgerTarget::Foundation);
        ledger.record(LedgerTarget::TypeTable);
        ledger.record(LedgerTarget::SettingsTable);
        ledger.record(LedgerTarget::Facility(HandlerKind::Loader));
        ledger.record(LedgerTarget::Facility(HandlerKind::Saver));
        Ok(())
    }

    /// Enter `Ready` once every registration pass has run.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` unless the context is `Initializing`.
    pub fn seal(&mut self) -> Result<()> {
        self.transition("seal", LifecyclePhase::Ready)?;
        info!(
            types = self.types.len(),
            loaders = self.loader_count(),
            savers = self.saver_count(),
            singletons = self.singletons.len(),
            settings = self.settings.len(),
            "registry ready"
        );
        Ok(())
    }

    /// Run `begin`, install every module in order, then `seal`.
    ///
    /// A failing module aborts the bootstrap; the error is logged and returned
    /// and the context stays `Initializing`, so dropping it still tears down
    /// whatever was registered.
    pub fn bootstrap(&mut self, modules: impl IntoIterator<Item = Module>) -> Result<()> {
        self.begin()?;
        for module in modules {
            let name = module.name().to_string();
            if let Err(err) = self.install(module) {
                error!(module = %name, error = %err, "bootstrap failed");
                return Err(err);
            }
        }
        self.seal()
    }

    /// Install a module: types, then loaders, savers, singletons and settings.
    ///
    /// # Errors
    ///
    /// The first registration error. Entries installed before it stay
    /// registered.
    pub fn install(&mut self, module: Module) -> Result<()> {
        self.ensure_registering("install a module", Domain::Types)?;
        debug!(module = module.name(), items = module.item_count(), "installing module");

        let parts = module.into_parts();
        for entry in parts.types {
            self.register_entry(entry)?;
        }
        for loader in parts.loaders {
            self.add_format_loader(loader)?;
        }
        for saver in parts.savers {
            self.add_format_saver(saver)?;
        }
        for singleton in parts.singletons {
            self.add_singleton_record(singleton)?;
        }
        for info in parts.settings {
            self.define_setting(info)?;
        }
        Ok(())
    }

    /// Tear everything down.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` unless the context is `Ready`. Failures inside teardown
    /// are logged and collected in the report instead.
    pub fn shutdown(&mut self) -> Result<TeardownReport> {
        if self.phase != LifecyclePhase::Ready {
            return Err(RegistryError::InvalidPhase {
                operation: "shut down",
                phase: self.phase,
            });
        }
        Ok(self.teardown())
    }

    fn teardown(&mut self) -> TeardownReport {
        info!(from = %self.phase, to = %LifecyclePhase::TearingDown, "lifecycle transition");
        self.phase = LifecyclePhase::TearingDown;

        let mut report = TeardownReport::default();
        for stage in TeardownStage::ALL {
            let targets = self.ledger.get_mut().drain_stage(stage);
            let mut released = 0;
            for target in targets {
                match self.release(&target, &mut report) {
                    Ok(count) => released += count,
                    Err(err) => {
                        error!(%stage, %target, error = %err, "teardown step failed");
                        report.errors.push(err);
                    }
                }
            }
            debug!(%stage, released, "teardown stage complete");
            report.released += released;
            report.stages.push((stage, released));
        }

        info!(
            from = %self.phase,
            to = %LifecyclePhase::Finalized,
            released = report.released,
            errors = report.errors.len(),
            "lifecycle transition"
        );
        self.phase = LifecyclePhase::Finalized;
        report
    }

    fn release(&mut self, target: &LedgerTarget, report: &mut TeardownReport) -> Result<usize> {
        match target {
            LedgerTarget::Loader(id) => self.loaders.get_mut().remove_id(*id).map(|_| 1),
            LedgerTarget::Saver(id) => self.savers.get_mut().remove_id(*id).map(|_| 1),
            LedgerTarget::Facility(kind) => {
                let remaining = match kind {
                    HandlerKind::Loader => self.loaders.get_mut().finalize()?,
                    HandlerKind::Saver => self.savers.get_mut().finalize()?,
                };
                if remaining > 0 {
                    warn!(%kind, remaining, "unrecorded handlers dropped at finalization");
                }
                Ok(remaining)
            }
            LedgerTarget::Singleton(name) => {
                self.singletons.remove(name)?;
                if let Some(layer) = &self.reflection {
                    layer.retract(name);
                }
                Ok(1)
            }
            LedgerTarget::TypeTable => self.types.unregister_all(),
            LedgerTarget::SettingsTable => Ok(self.settings.clear()),
            LedgerTarget::Foundation => match self.foundation.take() {
                Some(foundation) => {
                    report.leaks = foundation.release();
                    Ok(1)
                }
                None => Ok(0),
            },
        }
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type. The parent must already be registered.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the name is taken.
    /// - `UnknownParent` if `parent` is not registered.
    /// - `ConflictingFlags` if `flags` has both `VIRTUAL` and `INSTANTIABLE`.
    pub fn register_type(&mut self, name: &str, parent: Option<&str>, flags: TypeFlags) -> Result<()> {
        self.register_entry(TypeEntry::new(name, parent, flags))
    }

    /// Register a prepared type entry.
    pub fn register_entry(&mut self, mut entry: TypeEntry) -> Result<()> {
        self.ensure_registering("register a type", Domain::Types)?;
        entry.name = self.intern(&entry.name);
        if let Some(parent) = entry.parent.take() {
            entry.parent = Some(self.intern(&parent));
        }
        debug!(name = %entry.name, parent = ?entry.parent.as_deref(), flags = ?entry.flags, "registering type");
        self.types.register(entry)
    }

    /// Append a loader to the loader chain.
    pub fn add_format_loader(&mut self, loader: Arc<dyn FormatLoader>) -> Result<HandlerId> {
        self.ensure_registering("add a resource loader", Domain::Loaders)?;
        let name = loader.name().to_string();
        let id = self.loaders.get_mut().add(loader)?;
        self.ledger.get_mut().record(LedgerTarget::Loader(id));
        debug!(%name, %id, "added resource loader");
        Ok(id)
    }

    /// Append a saver to the saver chain.
    pub fn add_format_saver(&mut self, saver: Arc<dyn FormatSaver>) -> Result<HandlerId> {
        self.ensure_registering("add a resource saver", Domain::Savers)?;
        let name = saver.name().to_string();
        let id = self.savers.get_mut().add(saver)?;
        self.ledger.get_mut().record(LedgerTarget::Saver(id));
        debug!(%name, %id, "added resource saver");
        Ok(id)
    }

    /// Append a loader while `Ready`, excluding concurrent resolution.
    pub fn add_format_loader_late(&self, loader: Arc<dyn FormatLoader>) -> Result<HandlerId> {
        self.ensure_ready("add a late resource loader", Domain::Loaders)?;
        let name = loader.name().to_string();
        let id = self.loaders.write().add(loader)?;
        self.ledger.lock().record(LedgerTarget::Loader(id));
        info!(%name, %id, "added late resource loader");
        Ok(id)
    }

    /// Append a saver while `Ready`, excluding concurrent resolution.
    pub fn add_format_saver_late(&self, saver: Arc<dyn FormatSaver>) -> Result<HandlerId> {
        self.ensure_ready("add a late resource saver", Domain::Savers)?;
        let name = saver.name().to_string();
        let id = self.savers.write().add(saver)?;
        self.ledger.lock().record(LedgerTarget::Saver(id));
        info!(%name, %id, "added late resource saver");
        Ok(id)
    }

    /// Remove a loader. The order of the others is unchanged; adding it again
    /// places it last.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if the loader is not in the chain.
    pub fn remove_format_loader(&mut self, loader: &Arc<dyn FormatLoader>) -> Result<()> {
        let id = self.loaders.get_mut().remove(loader)?;
        self.ledger.get_mut().strike(&LedgerTarget::Loader(id));
        debug!(name = loader.name(), %id, "removed resource loader");
        Ok(())
    }

    /// Remove a saver. See [`remove_format_loader`](Self::remove_format_loader).
    pub fn remove_format_saver(&mut self, saver: &Arc<dyn FormatSaver>) -> Result<()> {
        let id = self.savers.get_mut().remove(saver)?;
        self.ledger.get_mut().strike(&LedgerTarget::Saver(id));
        debug!(name = saver.name(), %id, "removed resource saver");
        Ok(())
    }

    /// Publish `instance` under `name`.
    pub fn add_singleton(&mut self, name: &str, instance: Arc<dyn Any + Send + Sync>) -> Result<()> {
        self.add_singleton_record(Singleton::new(name, instance))
    }

    /// Publish a prepared singleton record.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if the name is taken.
    /// - `NotFound` if the record names a class that is not registered.
    pub fn add_singleton_record(&mut self, mut singleton: Singleton) -> Result<()> {
        self.ensure_registering("add a singleton", Domain::Singletons)?;
        if let Some(class) = &singleton.class_name {
            if !self.types.contains(class) {
                return Err(RegistryError::not_found(EntryKind::Type, &**class));
            }
        }
        singleton.name = self.intern(&singleton.name);
        let name = Arc::clone(&singleton.name);

        self.singletons.add(singleton)?;
        if let (Some(layer), Ok(record)) = (&self.reflection, self.singletons.get(&name)) {
            layer.publish(record);
        }
        self.ledger.get_mut().record(LedgerTarget::Singleton(Arc::clone(&name)));
        debug!(%name, "published singleton");
        Ok(())
    }

    /// Unpublish a singleton and hand back its record.
    ///
    /// # Errors
    ///
    /// `NotFound` if the name is not published, including on a second call.
    pub fn remove_singleton(&mut self, name: &str) -> Result<Singleton> {
        let record = self.singletons.remove(name)?;
        self.ledger
            .get_mut()
            .strike(&LedgerTarget::Singleton(Arc::clone(&record.name)));
        if let Some(layer) = &self.reflection {
            layer.retract(name);
        }
        debug!(%name, "removed singleton");
        Ok(record)
    }

    /// Describe a setting owned by the external configuration store.
    pub fn define_setting(&mut self, info: SettingInfo) -> Result<()> {
        self.ensure_registering("define a setting", Domain::Settings)?;
        debug!(name = %info.name, default = %info.default, "defined setting");
        self.settings.define(info)
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    /// Look up a type.
    pub fn lookup(&self, name: &str) -> Result<&TypeEntry> {
        self.types.lookup(name)
    }

    /// Create a tracked instance of `name`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the type is not registered.
    /// - `NotInstantiable` for virtual types and for custom-instance types
    ///   without a constructor.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn instantiate(&self, name: &str) -> Result<Instance> {
        let mut instance = self.types.instantiate(name)?;
        if let Some(foundation) = &self.foundation {
            instance.attach(foundation.track(instance.type_hash()));
        }
        Ok(instance)
    }

    /// First loader, in registration order, that recognizes `path`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_loader(&self, path: &str) -> Result<Arc<dyn FormatLoader>> {
        self.loaders.read().resolve(&Probe::path(path)).cloned()
    }

    /// First saver, in registration order, that recognizes `extension`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_saver(&self, extension: &str) -> Result<Arc<dyn FormatSaver>> {
        self.savers.read().resolve(&Probe::extension(extension)).cloned()
    }

    /// Resolve a published singleton.
    pub fn get_singleton(&self, name: &str) -> Result<&Singleton> {
        self.singletons.get(name)
    }

    /// Resolve a published singleton as its service type.
    pub fn get_singleton_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.singletons.get_as::<T>(name)
    }

    /// Load `source`, read from `path`, with the first loader that accepts
    /// the path and content.
    ///
    /// # Errors
    ///
    /// `NoHandlerFound` if no loader accepts, `Handler` if the loader fails.
    pub fn load(&self, path: &str, source: &[u8]) -> Result<Resource> {
        let loader = self
            .loaders
            .read()
            .resolve(&Probe::path(path).with_content(source))
            .cloned()?;
        loader.load(path, source).map_err(|source| RegistryError::Handler {
            handler: loader.name().to_string(),
            source,
        })
    }

    /// Encode `resource` for `path` with the first saver that accepts both.
    pub fn save(&self, resource: &Resource, path: &str) -> Result<Vec<u8>> {
        let saver = self
            .savers
            .read()
            .resolve(&Probe::path(path).with_resource(resource))
            .cloned()?;
        saver.save(resource, path).map_err(|source| RegistryError::Handler {
            handler: saver.name().to_string(),
            source,
        })
    }

    /// The effective value of a setting: the store's value, validated, or
    /// the default when the store has none.
    ///
    /// # Errors
    ///
    /// - `InvalidPhase` unless the context is `Ready`.
    /// - `NotFound` if the setting was never described.
    /// - `Setting` if the stored value violates the metadata.
    pub fn resolve_setting(&self, name: &str, store: &dyn ConfigStore) -> Result<SettingValue> {
        self.ensure_ready("resolve a setting", Domain::Settings)?;
        let info = self.settings.get(name)?;
        match store.get(name) {
            Some(value) => {
                info.validate(&value)?;
                Ok(value)
            }
            None => Ok(info.default.clone()),
        }
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The settings catalog.
    pub fn settings(&self) -> &SettingsCatalog {
        &self.settings
    }

    /// Loader names in probe order.
    pub fn loader_names(&self) -> Vec<String> {
        self.loaders.read().names().into_iter().map(String::from).collect()
    }

    /// Saver names in probe order.
    pub fn saver_names(&self) -> Vec<String> {
        self.savers.read().names().into_iter().map(String::from).collect()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn loader_count(&self) -> usize {
        self.loaders.read().len()
    }

    pub fn saver_count(&self) -> usize {
        self.savers.read().len()
    }

    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    pub fn setting_count(&self) -> usize {
        self.settings.len()
    }

    /// Number of construct operations not yet released.
    pub fn ledger_len(&self) -> usize {
        self.ledger.lock().len()
    }

    /// Number of tracked instances still alive.
    pub fn live_objects(&self) -> usize {
        self.foundation
            .as_ref()
            .map_or(0, |f| f.objects().live_count())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if matches!(
            self.phase,
            LifecyclePhase::Initializing | LifecyclePhase::Ready
        ) {
            warn!(phase = %self.phase, "context dropped without shutdown; tearing down");
            self.teardown();
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("phase", &self.phase)
            .field("types", &self.types.len())
            .field("loaders", &self.loader_names())
            .field("savers", &self.saver_names())
            .field("singletons", &self.singletons.names())
            .field("settings", &self.settings.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corereg_core::{FormatHandler, HandlerError};
    use rustc_hash::FxHashMap;

    struct ExtLoader(&'static str);

    impl FormatHandler for ExtLoader {
        fn name(&self) -> &str {
            self.0
        }

        fn recognize(&self, probe: &Probe<'_>) -> bool {
            probe.has_extension(&[self.0])
        }
    }

    impl FormatLoader for ExtLoader {
        fn load(&self, path: &str, source: &[u8]) -> std::result::Result<Resource, HandlerError> {
            if source.is_empty() {
                return Err(HandlerError::malformed("empty"));
            }
            Ok(Resource::new("Resource", path, source.to_vec()))
        }
    }

    impl FormatSaver for ExtLoader {
        fn save(&self, resource: &Resource, _path: &str) -> std::result::Result<Vec<u8>, HandlerError> {
            Ok(resource.data.clone())
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ReflectionLayer for Recorder {
        fn publish(&self, singleton: &Singleton) {
            self.events.lock().push(format!("+{}", singleton.name));
        }

        fn retract(&self, name: &str) {
            self.events.lock().push(format!("-{name}"));
        }
    }

    fn initializing() -> Context {
        let mut ctx = Context::new();
        ctx.begin().unwrap();
        ctx.register_type("Object", None, TypeFlags::INSTANTIABLE).unwrap();
        ctx
    }

    #[test]
    fn phases_run_forward() {
        let mut ctx = Context::new();
        assert_eq!(ctx.phase(), LifecyclePhase::Uninitialized);
        ctx.begin().unwrap();
        assert!(matches!(ctx.begin(), Err(RegistryError::InvalidPhase { .. })));
        ctx.seal().unwrap();
        assert!(ctx.is_ready());
        let report = ctx.shutdown().unwrap();
        assert!(report.is_clean());
        assert_eq!(ctx.phase(), LifecyclePhase::Finalized);
        assert!(matches!(ctx.shutdown(), Err(RegistryError::InvalidPhase { .. })));
    }

    #[test]
    fn registration_requires_initializing() {
        let mut ctx = Context::new();
        assert!(matches!(
            ctx.register_type("Object", None, TypeFlags::INSTANTIABLE),
            Err(RegistryError::InvalidPhase { phase: LifecyclePhase::Uninitialized, .. })
        ));

        ctx.begin().unwrap();
        ctx.seal().unwrap();
        assert!(matches!(
            ctx.add_format_loader(Arc::new(ExtLoader("bin"))),
            Err(RegistryError::InvalidPhase { phase: LifecyclePhase::Ready, .. })
        ));

        ctx.shutdown().unwrap();
        assert!(matches!(
            ctx.add_format_loader(Arc::new(ExtLoader("bin"))),
            Err(RegistryError::DomainClosed { domain: Domain::Loaders })
        ));
        assert!(matches!(
            ctx.define_setting(SettingInfo::new("x", 1)),
            Err(RegistryError::DomainClosed { domain: Domain::Settings })
        ));
    }

    #[test]
    fn names_are_interned() {
        let mut ctx = initializing();
        ctx.register_type("Reference", Some("Object"), TypeFlags::INSTANTIABLE)
            .unwrap();
        let object = &ctx.lookup("Object").unwrap().name;
        let parent = ctx.lookup("Reference").unwrap().parent.as_ref().unwrap();
        assert!(Arc::ptr_eq(object, parent));
    }

    #[test]
    fn instances_are_tracked() {
        let mut ctx = initializing();
        ctx.seal().unwrap();

        let instance = ctx.instantiate("Object").unwrap();
        assert!(instance.id().is_some());
        assert_eq!(ctx.live_objects(), 1);
        drop(instance);
        assert_eq!(ctx.live_objects(), 0);
    }

    #[test]
    fn late_loader_in_ready() {
        let mut ctx = initializing();
        assert!(matches!(
            ctx.add_format_loader_late(Arc::new(ExtLoader("bin"))),
            Err(RegistryError::InvalidPhase { .. })
        ));
        ctx.seal().unwrap();

        let ledger_before = ctx.ledger_len();
        ctx.add_format_loader_late(Arc::new(ExtLoader("bin"))).unwrap();
        assert_eq!(ctx.ledger_len(), ledger_before + 1);
        assert_eq!(ctx.resolve_loader("x.bin").unwrap().name(), "bin");

        let report = ctx.shutdown().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.stages[0], (TeardownStage::FormatHandlers, 1));
    }

    #[test]
    fn removed_loader_is_struck_from_ledger() {
        let mut ctx = initializing();
        let bin: Arc<dyn FormatLoader> = Arc::new(ExtLoader("bin"));
        ctx.add_format_loader(Arc::clone(&bin)).unwrap();
        let recorded = ctx.ledger_len();

        ctx.remove_format_loader(&bin).unwrap();
        assert_eq!(ctx.ledger_len(), recorded - 1);
        assert!(matches!(
            ctx.remove_format_loader(&bin),
            Err(RegistryError::NotRegistered { .. })
        ));

        ctx.seal().unwrap();
        assert!(ctx.shutdown().unwrap().is_clean());
    }

    #[test]
    fn removed_saver_is_struck_from_ledger() {
        let mut ctx = initializing();
        let res: Arc<dyn FormatSaver> = Arc::new(ExtLoader("res"));
        let id = ctx.add_format_saver(Arc::clone(&res)).unwrap();
        let recorded = ctx.ledger_len();

        ctx.remove_format_saver(&res).unwrap();
        assert_eq!(ctx.ledger_len(), recorded - 1);
        assert!(!ctx.ledger.get_mut().strike(&LedgerTarget::Saver(id)));
        assert!(matches!(
            ctx.remove_format_saver(&res),
            Err(RegistryError::NotRegistered { kind: HandlerKind::Saver, ref name }) if name == "res"
        ));
        assert!(ctx.resolve_saver("res").is_err());
    }

    #[test]
    fn load_wraps_handler_errors() {
        let mut ctx = initializing();
        ctx.add_format_loader(Arc::new(ExtLoader("bin"))).unwrap();
        ctx.seal().unwrap();

        assert_eq!(ctx.load("a.bin", b"x").unwrap().data, b"x");
        assert!(matches!(
            ctx.load("a.bin", b""),
            Err(RegistryError::Handler { ref handler, .. }) if handler == "bin"
        ));
        assert!(matches!(
            ctx.load("a.txt", b"x"),
            Err(RegistryError::NoHandlerFound { kind: HandlerKind::Loader, .. })
        ));
    }

    #[test]
    fn singleton_class_must_exist() {
        let mut ctx = initializing();
        let record = Singleton::new("OS", Arc::new(())).with_class("OS");
        assert!(matches!(
            ctx.add_singleton_record(record.clone()),
            Err(RegistryError::NotFound { kind: EntryKind::Type, .. })
        ));
        ctx.register_type("OS", Some("Object"), TypeFlags::INSTANTIABLE)
            .unwrap();
        ctx.add_singleton_record(record).unwrap();
        assert!(ctx.get_singleton("OS").is_ok());
    }

    #[test]
    fn reflection_sees_publish_and_retract() {
        let layer = Arc::new(Recorder::default());
        let mut ctx = Context::with_reflection(layer.clone());
        ctx.begin().unwrap();
        ctx.add_singleton("IP", Arc::new(1u8)).unwrap();
        ctx.add_singleton("OS", Arc::new(2u8)).unwrap();
        ctx.remove_singleton("IP").unwrap();
        ctx.seal().unwrap();
        ctx.shutdown().unwrap();

        assert_eq!(*layer.events.lock(), vec!["+IP", "+OS", "-IP", "-OS"]);
    }

    #[test]
    fn resolve_setting_validates_store_value() {
        let mut ctx = initializing();
        ctx.define_setting(SettingInfo::new("net/timeout", 30).with_range(1, 1800, 1))
            .unwrap();

        let mut store: FxHashMap<String, SettingValue> = FxHashMap::default();
        assert!(matches!(
            ctx.resolve_setting("net/timeout", &store),
            Err(RegistryError::InvalidPhase { .. })
        ));
        ctx.seal().unwrap();

        assert_eq!(ctx.resolve_setting("net/timeout", &store).unwrap(), SettingValue::Int(30));
        store.insert("net/timeout".into(), SettingValue::Int(5));
        assert_eq!(ctx.resolve_setting("net/timeout", &store).unwrap(), SettingValue::Int(5));
        store.insert("net/timeout".into(), SettingValue::Int(0));
        assert!(matches!(
            ctx.resolve_setting("net/timeout", &store),
            Err(RegistryError::Setting(_))
        ));
        assert!(matches!(
            ctx.resolve_setting("net/missing", &store),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn drop_tears_down_ready_context() {
        let layer = Arc::new(Recorder::default());
        {
            let mut ctx = Context::with_reflection(layer.clone());
            ctx.begin().unwrap();
            ctx.add_singleton("Engine", Arc::new(())).unwrap();
            ctx.seal().unwrap();
        }
        assert_eq!(*layer.events.lock(), vec!["+Engine", "-Engine"]);
    }

    #[test]
    fn teardown_continues_past_failed_steps() {
        let mut ctx = initializing();
        ctx.add_singleton("OS", Arc::new(())).unwrap();
        ctx.seal().unwrap();

        let ledger = ctx.ledger.get_mut();
        ledger.record(LedgerTarget::Loader(HandlerId(999)));
        ledger.record(LedgerTarget::Singleton(Arc::from("Ghost")));

        let report = ctx.shutdown().unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            report.errors[0],
            RegistryError::NotRegistered { kind: HandlerKind::Loader, .. }
        ));
        assert!(matches!(
            report.errors[1],
            RegistryError::NotFound { kind: EntryKind::Singleton, ref name } if name == "Ghost"
        ));

        let stages: Vec<_> = report.stages.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, TeardownStage::ALL);
        assert_eq!(ctx.phase(), LifecyclePhase::Finalized);
        assert_eq!(ctx.type_count(), 0);
        assert_eq!(ctx.singleton_count(), 0);
        assert_eq!(ctx.ledger_len(), 0);
    }

    #[test]
    fn report_carries_foundation_leaks() {
        let mut ctx = initializing();
        ctx.seal().unwrap();
        let kept = ctx.instantiate("Object").unwrap();

        let report = ctx.shutdown().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.leaks.objects, 1);
        assert_eq!(report.leaks.names, vec![Arc::<str>::from("Object")]);
        drop(kept);

        let mut ctx = initializing();
        ctx.seal().unwrap();
        drop(ctx.instantiate("Object").unwrap());
        assert!(ctx.shutdown().unwrap().leaks.is_empty());
    }

    #[test]
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}

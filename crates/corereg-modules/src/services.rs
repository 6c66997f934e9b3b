//! Core service singletons.
//!
//! The services themselves live in their subsystems; here each one is an
//! opaque handle published under its well-known name so the reflection layer
//! can find it. Service classes are registered in the same module, ahead of
//! the singletons that use them. `IP` is declared with the networking types.

use std::sync::Arc;

use corereg_registry::Module;

/// Opaque handle for a core service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreService {
    name: &'static str,
}

impl CoreService {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Published singleton names, in publication order.
pub const SINGLETONS: [&str; 15] = [
    "ProjectSettings",
    "IP",
    "Geometry2D",
    "Geometry3D",
    "ResourceLoader",
    "ResourceSaver",
    "OS",
    "Engine",
    "ClassDB",
    "Marshalls",
    "TranslationServer",
    "Input",
    "InputMap",
    "JSON",
    "EngineDebugger",
];

/// Build the services module.
pub fn module() -> Module {
    let module = Module::new("services")
        .class("ProjectSettings", Some("Object"))
        .class("Geometry2D", Some("Object"))
        .class("Geometry3D", Some("Object"))
        .class("ResourceLoader", Some("Object"))
        .class("ResourceSaver", Some("Object"))
        .class("OS", Some("Object"))
        .class("Engine", Some("Object"))
        .class("ClassDB", Some("Object"))
        .class("Marshalls", Some("Reference"))
        .class("TranslationServer", Some("Object"))
        .virtual_class("Input", Some("Object"))
        .class("InputMap", Some("Object"))
        .class("JSON", Some("Object"))
        .class("Expression", Some("Reference"))
        .class("EngineDebugger", Some("Object"));

    SINGLETONS.iter().fold(module, |module, &name| {
        module.singleton(name, name, Arc::new(CoreService::new(name)))
    })
}

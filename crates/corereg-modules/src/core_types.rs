//! The core class hierarchy.
//!
//! Every class is registered after its parent. Three flavours appear:
//!
//! - ordinary classes, instantiable with an empty payload or a default value
//! - virtual classes, which only exist to be inherited from
//! - custom-instance classes, whose objects come from a platform backend;
//!   until a backend module supplies a constructor they cannot be instantiated

use corereg_registry::Module;

/// Growable byte buffer backing `StreamPeerBuffer` instances.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    pub data: Vec<u8>,
    pub position: usize,
}

/// Seed state backing `RandomNumberGenerator` instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngState {
    pub seed: u64,
    pub state: u64,
}

impl Default for RngState {
    fn default() -> Self {
        // PCG32 default state and increment.
        Self {
            seed: 0x853c_49e6_748f_ea9b,
            state: 0xda3e_39cb_94b9_5bdb,
        }
    }
}

/// The root of the hierarchy.
pub const ROOT_TYPE: &str = "Object";

/// Build the core types module.
pub fn module() -> Module {
    let module = Module::new("core_types")
        .class(ROOT_TYPE, None)
        .class("Reference", Some("Object"))
        .class("WeakRef", Some("Reference"))
        .class("Resource", Some("Reference"))
        .virtual_class("Script", Some("Resource"))
        .class("Image", Some("Resource"));

    let module = input_events(module);
    let module = networking(module);
    let module = crypto(module);
    utilities(module)
}

fn input_events(module: Module) -> Module {
    module
        .virtual_class("InputEvent", Some("Resource"))
        .virtual_class("InputEventFromWindow", Some("InputEvent"))
        .virtual_class("InputEventWithModifiers", Some("InputEventFromWindow"))
        .class("InputEventKey", Some("InputEventWithModifiers"))
        .virtual_class("InputEventMouse", Some("InputEventWithModifiers"))
        .class("InputEventMouseButton", Some("InputEventMouse"))
        .class("InputEventMouseMotion", Some("InputEventMouse"))
        .class("InputEventJoypadButton", Some("InputEvent"))
        .class("InputEventJoypadMotion", Some("InputEvent"))
        .class("InputEventScreenDrag", Some("InputEventFromWindow"))
        .class("InputEventScreenTouch", Some("InputEventFromWindow"))
        .class("InputEventAction", Some("InputEvent"))
        .virtual_class("InputEventGesture", Some("InputEventWithModifiers"))
        .class("InputEventMagnifyGesture", Some("InputEventGesture"))
        .class("InputEventPanGesture", Some("InputEventGesture"))
        .class("InputEventMIDI", Some("InputEvent"))
}

fn networking(module: Module) -> Module {
    module
        .virtual_class("StreamPeer", Some("Reference"))
        .class_with::<ByteBuffer>("StreamPeerBuffer", Some("StreamPeer"))
        .class("StreamPeerTCP", Some("StreamPeer"))
        .class("TCPServer", Some("Reference"))
        .virtual_class("PacketPeer", Some("Reference"))
        .class("PacketPeerUDP", Some("PacketPeer"))
        .class("UDPServer", Some("Reference"))
        .custom_instance_class("PacketPeerDTLS", Some("PacketPeer"), None)
        .custom_instance_class("DTLSServer", Some("Reference"), None)
        .virtual_class("IP", Some("Object"))
        .class("PacketPeerStream", Some("PacketPeer"))
        .virtual_class("NetworkedMultiplayerPeer", Some("PacketPeer"))
        .class("MultiplayerAPI", Some("Reference"))
        .class("HTTPClient", Some("Reference"))
}

fn crypto(module: Module) -> Module {
    module
        .class("HashingContext", Some("Reference"))
        .class("AESContext", Some("Reference"))
        .custom_instance_class("X509Certificate", Some("Resource"), None)
        .custom_instance_class("CryptoKey", Some("Resource"), None)
        .custom_instance_class("HMACContext", Some("Reference"), None)
        .custom_instance_class("Crypto", Some("Reference"), None)
        .custom_instance_class("StreamPeerSSL", Some("StreamPeer"), None)
}

fn utilities(module: Module) -> Module {
    module
        .class("MainLoop", Some("Object"))
        .class("Translation", Some("Resource"))
        .class("PHashTranslation", Some("Translation"))
        .class("UndoRedo", Some("Object"))
        .class("TriangleMesh", Some("Reference"))
        .class("ResourceFormatLoader", Some("Reference"))
        .class("ResourceFormatSaver", Some("Reference"))
        .class("File", Some("Reference"))
        .class("Directory", Some("Reference"))
        .class("Thread", Some("Reference"))
        .class("Mutex", Some("Reference"))
        .class("Semaphore", Some("Reference"))
        .class("XMLParser", Some("Reference"))
        .class("JSONParser", Some("Reference"))
        .class("ConfigFile", Some("Reference"))
        .class("PCKPacker", Some("Reference"))
        .class("PackedDataContainer", Some("Resource"))
        .virtual_class("PackedDataContainerRef", Some("Reference"))
        .class("AStar", Some("Reference"))
        .class("AStar2D", Some("Reference"))
        .class("EncodedObjectAsID", Some("Reference"))
        .class_with::<RngState>("RandomNumberGenerator", Some("Reference"))
        .class("JSONParseResult", Some("Reference"))
        .virtual_class("ResourceImporter", Some("Reference"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn parents_precede_children() {
        let module = module();
        let mut seen = FxHashSet::default();
        for entry in module.types() {
            if let Some(parent) = &entry.parent {
                assert!(
                    seen.contains(&**parent),
                    "'{}' registered before its parent '{}'",
                    entry.name,
                    parent
                );
            }
            assert!(seen.insert(entry.name.to_string()), "duplicate '{}'", entry.name);
        }
    }

    #[test]
    fn single_root() {
        let roots: Vec<_> = module()
            .types()
            .iter()
            .filter(|t| t.is_root())
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(roots, vec![ROOT_TYPE]);
    }

    #[test]
    fn flavours() {
        let module = module();
        let find = |name: &str| {
            module
                .types()
                .iter()
                .find(|t| &*t.name == name)
                .cloned()
                .unwrap()
        };
        assert!(find("Script").is_virtual());
        assert!(find("Image").is_instantiable());
        let crypto = find("Crypto");
        assert!(crypto.is_custom_instance());
        assert!(crypto.constructor.is_none());
        assert!(find("StreamPeerBuffer").constructor.is_some());
        assert!(!module.types().iter().any(|t| t.has_conflicting_flags()));
    }
}

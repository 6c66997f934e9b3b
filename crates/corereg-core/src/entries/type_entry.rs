//! Type registry entries.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::instance::Constructor;
use crate::TypeHash;

bitflags! {
    /// Instantiation metadata of a registered type.
    ///
    /// # Common Combinations
    ///
    /// ```rust
    /// use corereg_core::TypeFlags;
    ///
    /// // Ordinary class
    /// let class = TypeFlags::INSTANTIABLE;
    ///
    /// // Class that can only be created through its custom constructor
    /// let custom = TypeFlags::INSTANTIABLE | TypeFlags::CUSTOM_INSTANCE;
    ///
    /// // Abstract base
    /// let base = TypeFlags::VIRTUAL;
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        /// The type only describes an interface; it is never instantiated.
        const VIRTUAL = 1 << 0;
        /// `instantiate` may create objects of this type.
        const INSTANTIABLE = 1 << 1;
        /// Objects must come from the entry's custom constructor.
        const CUSTOM_INSTANCE = 1 << 2;
    }
}

/// Registry entry for one type.
///
/// Parents are referenced by hash and must be registered before their
/// children, so the parent chain is always acyclic.
#[derive(Clone)]
pub struct TypeEntry {
    /// Type name, unique in the registry.
    pub name: Arc<str>,
    /// Hash of `name`.
    pub type_hash: TypeHash,
    /// Name of the parent type, if any.
    pub parent: Option<Arc<str>>,
    /// Instantiation flags.
    pub flags: TypeFlags,
    /// Custom constructor, if any.
    pub constructor: Option<Constructor>,
}

impl TypeEntry {
    /// Create an entry with explicit flags.
    pub fn new(name: impl Into<Arc<str>>, parent: Option<&str>, flags: TypeFlags) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            parent: parent.map(Arc::from),
            flags,
            constructor: None,
        }
    }

    /// An ordinary instantiable class.
    pub fn class(name: impl Into<Arc<str>>, parent: Option<&str>) -> Self {
        Self::new(name, parent, TypeFlags::INSTANTIABLE)
    }

    /// A virtual class that is never instantiated.
    pub fn virtual_class(name: impl Into<Arc<str>>, parent: Option<&str>) -> Self {
        Self::new(name, parent, TypeFlags::VIRTUAL)
    }

    /// A class whose objects only come from `constructor`.
    pub fn custom_instance(
        name: impl Into<Arc<str>>,
        parent: Option<&str>,
        constructor: Constructor,
    ) -> Self {
        Self::new(
            name,
            parent,
            TypeFlags::INSTANTIABLE | TypeFlags::CUSTOM_INSTANCE,
        )
        .with_constructor(constructor)
    }

    // === Builder Methods ===

    /// Set the constructor.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    // === Queries ===

    /// Parent type hash, if any.
    pub fn parent_hash(&self) -> Option<TypeHash> {
        self.parent.as_deref().map(TypeHash::from_name)
    }

    /// Check if this is a virtual type.
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(TypeFlags::VIRTUAL)
    }

    /// Check if `instantiate` may be called for this type.
    pub fn is_instantiable(&self) -> bool {
        self.flags.contains(TypeFlags::INSTANTIABLE) && !self.is_virtual()
    }

    /// Check if objects must come from the custom constructor.
    pub fn is_custom_instance(&self) -> bool {
        self.flags.contains(TypeFlags::CUSTOM_INSTANCE)
    }

    /// Check if this type has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if the flag combination is coherent.
    pub fn has_conflicting_flags(&self) -> bool {
        self.flags
            .contains(TypeFlags::VIRTUAL | TypeFlags::INSTANTIABLE)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("flags", &self.flags)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}

//! Type descriptor types.

use std::fmt;

/// Identifier for a domain type in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// How the engine treats instances of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeClass {
    /// Mutable domain object: always wrapped and intercepted.
    #[default]
    Entity,
    /// Immutable by construction (sealed): never wrapped.
    Value,
}

/// Property declaration within a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Whether the declared getter may be used.
    pub readable: bool,
    /// Whether the declared setter may be used.
    pub writable: bool,
}

impl PropertyDef {
    /// A readable and writable property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readable: true,
            writable: true,
        }
    }

    /// No declared setter.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// No declared getter; reads go through field access.
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }
}

/// Domain type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique type ID.
    pub id: TypeId,
    /// Type name, matched against `RawObject::type_name`.
    pub name: String,
    /// Entity or value classification.
    pub class: TypeClass,
    /// Declared properties, in enumeration order.
    pub properties: Vec<PropertyDef>,
}

impl TypeDef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class: TypeClass::Entity,
            properties: Vec::new(),
        }
    }

    /// Get a property definition by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Check if the type declares a property.
    pub fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }

    /// Get all property names in enumeration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn is_entity(&self) -> bool {
        self.class == TypeClass::Entity
    }
}

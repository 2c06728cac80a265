//! RegistryBuilder for constructing an immutable Registry.

use crate::{PropertyDef, Registry, TypeClass, TypeDef, TypeId};
use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate property {property} on type {type_name}")]
    DuplicateProperty { type_name: String, property: String },

    #[error("Invalid property name {property:?} on type {type_name}")]
    InvalidPropertyName { type_name: String, property: String },
}

/// Property names become field path segments, so they may not contain dots.
fn property_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("property name pattern is valid")
    })
}

/// Builder for constructing an immutable Registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        let name = name.into();
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;

        TypeBuilder {
            builder: self,
            id,
            name,
            class: TypeClass::Entity,
            properties: Vec::new(),
        }
    }

    /// Build the immutable Registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        Ok(Registry::new(self.types, self.type_names))
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    id: TypeId,
    name: String,
    class: TypeClass,
    properties: Vec<PropertyDef>,
}

impl<'a> TypeBuilder<'a> {
    /// Declare a property.
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare several readable and writable properties at once.
    pub fn properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .extend(names.into_iter().map(PropertyDef::new));
        self
    }

    /// Mark as sealed: instances are immutable values and never wrapped.
    pub fn sealed(mut self) -> Self {
        self.class = TypeClass::Value;
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, RegistryError> {
        // Check for duplicate name
        if self.builder.type_names.contains_key(&self.name) {
            return Err(RegistryError::DuplicateTypeName(self.name));
        }

        for (i, property) in self.properties.iter().enumerate() {
            if !property_name_pattern().is_match(&property.name) {
                return Err(RegistryError::InvalidPropertyName {
                    type_name: self.name.clone(),
                    property: property.name.clone(),
                });
            }
            if self.properties[..i].iter().any(|p| p.name == property.name) {
                return Err(RegistryError::DuplicateProperty {
                    type_name: self.name.clone(),
                    property: property.name.clone(),
                });
            }
        }

        let type_def = TypeDef {
            id: self.id,
            name: self.name.clone(),
            class: self.class,
            properties: self.properties,
        };

        self.builder.type_names.insert(self.name, self.id);
        self.builder.types.insert(self.id, type_def);

        Ok(self.id)
    }
}

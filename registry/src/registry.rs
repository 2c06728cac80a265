//! The Registry - immutable type descriptor lookup.

use crate::{TypeClass, TypeDef, TypeId};
use std::collections::HashMap;

/// The Registry provides runtime lookup of type descriptors.
/// It is immutable after construction.
#[derive(Debug, Default)]
pub struct Registry {
    /// Type definitions by ID.
    types: HashMap<TypeId, TypeDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
}

impl Registry {
    /// Create a registry (use RegistryBuilder for construction).
    pub(crate) fn new(types: HashMap<TypeId, TypeDef>, type_names: HashMap<String, TypeId>) -> Self {
        Self { types, type_names }
    }

    /// A registry that declares no types.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(&id)
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Classification of a declared type, `None` when undeclared.
    pub fn classify(&self, name: &str) -> Option<TypeClass> {
        self.get_type_by_name(name).map(|t| t.class)
    }

    /// Iterate over all types.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

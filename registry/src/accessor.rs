//! Property accessors over raw objects.
//!
//! The engine never touches raw fields directly. It goes through a
//! [`PropertyAccessor`]: normally a [`FallbackAccessor`] that tries the
//! declared descriptors first and falls back to direct field access.

use std::rc::Rc;

use tracing::{debug, warn};
use ward_core::{AccessError, AccessResult, RawObject, Value};

use crate::{PropertyDef, Registry};

/// Enumerate, read and write the properties of a raw object.
pub trait PropertyAccessor {
    /// Properties of the object, in enumeration order.
    fn properties(&self, object: &RawObject) -> AccessResult<Vec<PropertyDef>>;

    /// Read a property.
    fn get(&self, object: &RawObject, name: &str) -> AccessResult<Value>;

    /// Write a property.
    fn set(&self, object: &mut RawObject, name: &str, value: Value) -> AccessResult<()>;
}

/// Accessor driven by the registry's declared descriptors.
///
/// Only declared properties are visible, and only through their declared
/// getter/setter. Undeclared types are inaccessible.
#[derive(Debug, Clone)]
pub struct DescriptorAccessor {
    registry: Rc<Registry>,
}

impl DescriptorAccessor {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self { registry }
    }

    fn declared<'a>(&'a self, object: &RawObject, name: &str) -> AccessResult<&'a PropertyDef> {
        let type_def = self
            .registry
            .get_type_by_name(object.type_name())
            .ok_or_else(|| AccessError::inaccessible(object.type_name(), name))?;

        type_def
            .get_property(name)
            .ok_or_else(|| AccessError::unknown_property(object.type_name(), name))
    }
}

impl PropertyAccessor for DescriptorAccessor {
    fn properties(&self, object: &RawObject) -> AccessResult<Vec<PropertyDef>> {
        self.registry
            .get_type_by_name(object.type_name())
            .map(|t| t.properties.clone())
            .ok_or_else(|| AccessError::inaccessible(object.type_name(), "*"))
    }

    fn get(&self, object: &RawObject, name: &str) -> AccessResult<Value> {
        let property = self.declared(object, name)?;
        if !property.readable {
            return Err(AccessError::inaccessible(object.type_name(), name));
        }
        // Declared but never assigned reads as null.
        Ok(object.get_field(name).cloned().unwrap_or(Value::Null))
    }

    fn set(&self, object: &mut RawObject, name: &str, value: Value) -> AccessResult<()> {
        let property = self.declared(object, name)?;
        if !property.writable {
            return Err(AccessError::inaccessible(object.type_name(), name));
        }
        object.set_field(name, value);
        Ok(())
    }
}

/// Direct field access: sees every field the object actually holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAccessor;

impl PropertyAccessor for FieldAccessor {
    fn properties(&self, object: &RawObject) -> AccessResult<Vec<PropertyDef>> {
        Ok(object.field_names().map(PropertyDef::new).collect())
    }

    fn get(&self, object: &RawObject, name: &str) -> AccessResult<Value> {
        object
            .get_field(name)
            .cloned()
            .ok_or_else(|| AccessError::unknown_property(object.type_name(), name))
    }

    fn set(&self, object: &mut RawObject, name: &str, value: Value) -> AccessResult<()> {
        if !object.has_field(name) {
            return Err(AccessError::unknown_property(object.type_name(), name));
        }
        object.set_field(name, value);
        Ok(())
    }
}

/// Tries `primary`, then `secondary`. Fails only when both fail.
#[derive(Debug, Clone)]
pub struct FallbackAccessor<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackAccessor<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl FallbackAccessor<DescriptorAccessor, FieldAccessor> {
    /// Descriptors first, direct field access second.
    pub fn for_registry(registry: Rc<Registry>) -> Self {
        Self::new(DescriptorAccessor::new(registry), FieldAccessor)
    }
}

fn note_fallback(object: &RawObject, name: &str, error: &AccessError) {
    if error.is_inaccessible() {
        debug!(type_name = object.type_name(), property = name, "falling back to field access");
    } else {
        warn!(
            type_name = object.type_name(),
            property = name,
            %error,
            "descriptor access failed, falling back to field access"
        );
    }
}

impl<P: PropertyAccessor, S: PropertyAccessor> PropertyAccessor for FallbackAccessor<P, S> {
    fn properties(&self, object: &RawObject) -> AccessResult<Vec<PropertyDef>> {
        match self.primary.properties(object) {
            Ok(properties) => Ok(properties),
            Err(primary) => {
                note_fallback(object, "*", &primary);
                self.secondary
                    .properties(object)
                    .map_err(|secondary| AccessError::exhausted("*", &primary, &secondary))
            }
        }
    }

    fn get(&self, object: &RawObject, name: &str) -> AccessResult<Value> {
        match self.primary.get(object, name) {
            Ok(value) => Ok(value),
            Err(primary) => {
                note_fallback(object, name, &primary);
                self.secondary
                    .get(object, name)
                    .map_err(|secondary| AccessError::exhausted(name, &primary, &secondary))
            }
        }
    }

    fn set(&self, object: &mut RawObject, name: &str, value: Value) -> AccessResult<()> {
        match self.primary.set(object, name, value.clone()) {
            Ok(()) => Ok(()),
            Err(primary) => {
                note_fallback(object, name, &primary);
                self.secondary
                    .set(object, name, value)
                    .map_err(|secondary| AccessError::exhausted(name, &primary, &secondary))
            }
        }
    }
}

//! Property access errors.

use thiserror::Error;

/// Errors raised while reading or writing a property of a raw object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The property exists but the accessor is not allowed to use it.
    #[error("Property {property} on {type_name} is not accessible")]
    Inaccessible { type_name: String, property: String },

    /// The property does not exist on the object.
    #[error("Unknown property: {property} on {type_name}")]
    UnknownProperty { type_name: String, property: String },

    /// Every accessor in a fallback chain failed.
    #[error("Cannot access {property}: {primary}; fallback: {secondary}")]
    Exhausted {
        property: String,
        primary: String,
        secondary: String,
    },
}

impl AccessError {
    pub fn inaccessible(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::Inaccessible {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn exhausted(
        property: impl Into<String>,
        primary: &AccessError,
        secondary: &AccessError,
    ) -> Self {
        Self::Exhausted {
            property: property.into(),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        }
    }

    /// Returns true if the failure came from access rights rather than a missing property.
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, AccessError::Inaccessible { .. })
    }
}

/// Result type for property access.
pub type AccessResult<T> = Result<T, AccessError>;

//! Ward Registry
//!
//! Statically declared descriptors for domain types.
//!
//! Responsibilities:
//! - Declare each domain type's properties and their access rights
//! - Classify types as entities (wrapped) or values (never wrapped)
//! - Provide property accessors over raw objects, with a field-level fallback

mod accessor;
mod builder;
mod registry;
mod types;

pub use accessor::{DescriptorAccessor, FallbackAccessor, FieldAccessor, PropertyAccessor};
pub use builder::{RegistryBuilder, RegistryError, TypeBuilder};
pub use registry::Registry;
pub use types::{PropertyDef, TypeClass, TypeDef, TypeId};

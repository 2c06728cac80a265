//! Ward Core Types
//!
//! This crate provides the foundational types used throughout Ward:
//! - Scalar and object values (the Value enum)
//! - Raw, unwrapped domain objects (RawObject, ObjectRef)
//! - Field paths from a domain root to a nested field
//! - Property access errors

mod error;
mod object;
mod path;
mod value;

pub use error::*;
pub use object::*;
pub use path::*;
pub use value::*;

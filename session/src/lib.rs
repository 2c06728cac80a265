//! Ward Session
//!
//! Immutable domain graphs with scoped writable windows.
//!
//! Responsibilities:
//! - Wrap raw object graphs (DomainFactory)
//! - Reject mutation outside a writable window
//! - Record the field paths touched inside a window
//! - Enforce the rules selected by those paths when the window closes

mod config;
mod error;
mod factory;
mod node;
mod state;

pub use config::{FactoryConfig, ReentrancyPolicy};
pub use error::{DomainError, DomainResult};
pub use factory::DomainFactory;
pub use node::{DomainRef, Field};
pub use state::WindowState;

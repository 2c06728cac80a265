//! Ward Contract
//!
//! Field-path validation rules for domain roots.
//!
//! Responsibilities:
//! - Bind check functions to the field paths they depend on
//! - Enforce every check against a root (full mode)
//! - Enforce only the checks whose paths were touched (scoped mode)
//! - Run a check shared by several paths at most once per pass
//! - Hand every outcome to an error handling strategy

mod builder;
mod contract;
mod error;
mod rule;
mod strategy;

pub use builder::ContractBuilder;
pub use contract::{Contract, EnforcementReport};
pub use error::{ContractError, ContractResult};
pub use rule::{Check, CheckId, Rule};
pub use strategy::{Collect, ErrorHandlingStrategy, FailFast, LogOnly};

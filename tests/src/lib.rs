//! Ward integration test support.
//!
//! Fixture domains shared by the integration tests under `tests/`.


use std::sync::Once;

/// Install a test subscriber once. Honours `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::init_tracing;
    pub use ward_contract::{
        Collect, Contract, ContractBuilder, ContractError, EnforcementReport, FailFast, LogOnly,
    };
    pub use ward_core::{object, FieldPath, ObjectRef, RawObject, Value, WeakObjectRef};
    pub use ward_registry::{PropertyDef, Registry, RegistryBuilder, TypeClass};
    pub use ward_session::{
        DomainError, DomainFactory, DomainRef, DomainResult, FactoryConfig, Field,
        ReentrancyPolicy, WindowState,
    };
}

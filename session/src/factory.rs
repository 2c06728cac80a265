//! DomainFactory - wraps raw object graphs into immutable domains.

use std::rc::Rc;

use tracing::debug;
use ward_contract::{Contract, ErrorHandlingStrategy, FailFast};
use ward_core::{FieldPath, ObjectRef, Value};
use ward_registry::Registry;

use crate::error::DomainResult;
use crate::node::wrap;
use crate::state::{is_wrappable, BoundContract, DomainState};
use crate::{DomainRef, FactoryConfig};

/// Wraps raw objects into domains guarded by a contract.
///
/// Each call to [`wrap`](Self::wrap) creates an independent domain: its
/// own window, touched paths and wrapper identities.
#[derive(Debug, Clone)]
pub struct DomainFactory {
    registry: Rc<Registry>,
    config: FactoryConfig,
}

impl DomainFactory {
    pub fn new(registry: impl Into<Rc<Registry>>) -> Self {
        Self::with_config(registry, FactoryConfig::default())
    }

    pub fn with_config(registry: impl Into<Rc<Registry>>, config: FactoryConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Returns true if `value` would be wrapped when reached from a domain.
    pub fn should_wrap(&self, value: &Value) -> bool {
        is_wrappable(&self.registry, &self.config, value)
    }

    /// Wrap `raw` and everything mutable reachable from it.
    ///
    /// The root is wrapped whatever its classification. The contract is
    /// evaluated against the root with `strategy` when a writable window
    /// closes and on [`DomainRef::validate`].
    pub fn wrap<E, S>(
        &self,
        raw: &ObjectRef,
        contract: Contract<DomainRef, E>,
        strategy: S,
    ) -> DomainResult<DomainRef>
    where
        E: 'static,
        S: ErrorHandlingStrategy<E> + 'static,
    {
        let rules = contract.len();
        let state = Rc::new(DomainState::new(
            Rc::clone(&self.registry),
            self.config.clone(),
            Box::new(BoundContract::new(contract, strategy)),
            raw.clone(),
        ));
        let root = wrap(&state, raw, FieldPath::root())?;
        debug!(
            type_name = %root.type_name(),
            nodes = root.node_count(),
            rules,
            "wrapped domain"
        );
        Ok(root)
    }

    /// Wrap with an empty contract and the fail-fast strategy.
    pub fn wrap_default(&self, raw: &ObjectRef) -> DomainResult<DomainRef> {
        self.wrap(raw, Contract::<DomainRef, String>::empty(), FailFast)
    }
}

//! Shared state of one wrapped domain.
//!
//! Every node wrapped for a root shares one `DomainState`: the window state,
//! the touched paths, the bound contract and the node arena. Handles refer
//! to nodes by index into the arena.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::{debug, trace};
use ward_contract::{Contract, ContractResult, EnforcementReport, ErrorHandlingStrategy};
use ward_core::{FieldPath, ObjectRef, Value, WeakObjectRef};
use ward_registry::{DescriptorAccessor, FallbackAccessor, FieldAccessor, Registry, TypeClass};

use crate::{DomainRef, FactoryConfig};

/// State of the writable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Mutations are rejected.
    Closed,
    /// A mutator is running; mutations are recorded.
    Open,
    /// The window has closed and touched rules are being checked.
    Enforcing,
}

/// Contract bound to its strategy, with the error type erased.
pub(crate) trait Enforcer {
    fn enforce(&self, root: &DomainRef) -> ContractResult<EnforcementReport>;

    fn enforce_scoped(
        &self,
        root: &DomainRef,
        touched: &[FieldPath],
    ) -> ContractResult<EnforcementReport>;
}

pub(crate) struct BoundContract<E, S> {
    contract: Contract<DomainRef, E>,
    strategy: S,
}

impl<E, S> BoundContract<E, S> {
    pub(crate) fn new(contract: Contract<DomainRef, E>, strategy: S) -> Self {
        Self { contract, strategy }
    }
}

impl<E, S: ErrorHandlingStrategy<E>> Enforcer for BoundContract<E, S> {
    fn enforce(&self, root: &DomainRef) -> ContractResult<EnforcementReport> {
        self.contract.enforce(root, &self.strategy)
    }

    fn enforce_scoped(
        &self,
        root: &DomainRef,
        touched: &[FieldPath],
    ) -> ContractResult<EnforcementReport> {
        self.contract.enforce_scoped(root, touched, &self.strategy)
    }
}

/// Returns true if `value` is an object that must be wrapped.
pub(crate) fn is_wrappable(registry: &Registry, config: &FactoryConfig, value: &Value) -> bool {
    match value {
        Value::Object(object) => {
            let class = registry
                .classify(object.borrow().type_name())
                .unwrap_or(config.default_class);
            class == TypeClass::Entity
        }
        _ => false,
    }
}

struct NodeRecord {
    object: WeakObjectRef,
    path: FieldPath,
}

pub(crate) struct DomainState {
    registry: Rc<Registry>,
    accessor: FallbackAccessor<DescriptorAccessor, FieldAccessor>,
    config: FactoryConfig,
    enforcer: Box<dyn Enforcer>,
    root: ObjectRef,
    window: Cell<WindowState>,
    touched: RefCell<IndexSet<FieldPath>>,
    nodes: RefCell<HashMap<usize, NodeRecord>>,
}

impl DomainState {
    pub(crate) fn new(
        registry: Rc<Registry>,
        config: FactoryConfig,
        enforcer: Box<dyn Enforcer>,
        root: ObjectRef,
    ) -> Self {
        Self {
            accessor: FallbackAccessor::for_registry(Rc::clone(&registry)),
            registry,
            config,
            enforcer,
            root,
            window: Cell::new(WindowState::Closed),
            touched: RefCell::new(IndexSet::new()),
            nodes: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn accessor(&self) -> &FallbackAccessor<DescriptorAccessor, FieldAccessor> {
        &self.accessor
    }

    pub(crate) fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub(crate) fn enforcer(&self) -> &dyn Enforcer {
        self.enforcer.as_ref()
    }

    pub(crate) fn root(&self) -> &ObjectRef {
        &self.root
    }

    pub(crate) fn window(&self) -> WindowState {
        self.window.get()
    }

    pub(crate) fn should_wrap(&self, value: &Value) -> bool {
        is_wrappable(&self.registry, &self.config, value)
    }

    // ========== Identity Map ==========

    /// Path `object` was wrapped at, if it is wrapped.
    pub(crate) fn find(&self, object: &ObjectRef) -> Option<FieldPath> {
        self.nodes
            .borrow()
            .get(&object.addr())
            .map(|record| record.path.clone())
    }

    /// Record that `object` is wrapped at `path`.
    ///
    /// Only a weak handle is kept: the graph owns its objects. The weak
    /// handle pins the address, so a key is never reused by another object.
    pub(crate) fn register(&self, object: &ObjectRef, path: FieldPath) {
        trace!(%path, type_name = %object.type_name(), "wrapping node");
        self.nodes.borrow_mut().insert(
            object.addr(),
            NodeRecord {
                object: object.downgrade(),
                path,
            },
        );
    }

    /// Forget `object` and everything wrapped below it, if it was wrapped
    /// at `path`.
    ///
    /// Outstanding handles keep working. Objects reached again later are
    /// wrapped afresh under their new paths.
    pub(crate) fn retire(&self, object: &ObjectRef, path: &FieldPath) {
        if path.is_root() || self.find(object).as_ref() != Some(path) {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        let before = nodes.len();
        nodes.retain(|_, record| record.object.is_alive() && !path.covers(&record.path));
        trace!(%path, retired = before - nodes.len(), "retiring replaced nodes");
    }

    /// Number of wrapped objects still alive.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes
            .borrow()
            .values()
            .filter(|record| record.object.is_alive())
            .count()
    }

    // ========== Touched Paths ==========

    pub(crate) fn record_touch(&self, path: FieldPath) {
        trace!(%path, "touched");
        self.touched.borrow_mut().insert(path);
    }

    pub(crate) fn touched(&self) -> Vec<FieldPath> {
        self.touched.borrow().iter().cloned().collect()
    }
}

/// Holds the window open. Dropping it closes the window and clears the
/// touched paths on every exit path, unwinding included.
pub(crate) struct WindowGuard<'a> {
    state: &'a DomainState,
}

impl<'a> WindowGuard<'a> {
    pub(crate) fn open(state: &'a DomainState) -> Self {
        state.window.set(WindowState::Open);
        debug!("writable window opened");
        Self { state }
    }

    /// Stop accepting mutations and run the rules selected by the touched
    /// paths against `root`.
    pub(crate) fn enforce(&self, root: &DomainRef) -> ContractResult<EnforcementReport> {
        self.state.window.set(WindowState::Enforcing);
        let touched = self.state.touched();
        debug!(touched = touched.len(), "enforcing touched rules");
        self.state.enforcer.enforce_scoped(root, &touched)
    }
}

impl Drop for WindowGuard<'_> {
    fn drop(&mut self) {
        self.state.window.set(WindowState::Closed);
        self.state.touched.borrow_mut().clear();
        debug!("writable window closed");
    }
}

//! Wrapped domain nodes.
//!
//! A [`DomainRef`] is the only way to reach a wrapped object. Reads pass
//! through to the underlying object; writes are rejected unless a writable
//! window is open on the domain, in which case they are recorded as
//! touched paths and checked when the window closes.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, info, warn};
use ward_contract::EnforcementReport;
use ward_core::{FieldPath, ObjectRef, Value};
use ward_registry::PropertyAccessor;

use crate::error::{DomainError, DomainResult};
use crate::state::{DomainState, WindowGuard, WindowState};
use crate::ReentrancyPolicy;

/// Wrap `object` at `path`, reusing the existing node for a known object.
///
/// Nested objects that must be wrapped are wrapped depth-first, in property
/// order. The node is registered before its children so cycles terminate.
pub(crate) fn wrap(state: &Rc<DomainState>, object: &ObjectRef, path: FieldPath) -> DomainResult<DomainRef> {
    if let Some(existing) = state.find(object) {
        return Ok(DomainRef::new(Rc::clone(state), object.clone(), existing));
    }
    state.register(object, path.clone());

    let children: Vec<(String, ObjectRef)> = {
        let raw = object.borrow();
        let mut children = Vec::new();
        for property in state.accessor().properties(&raw)? {
            // Hidden properties are read through the field fallback; one
            // that was never assigned holds nothing to wrap.
            let value = match state.accessor().get(&raw, &property.name) {
                Ok(value) => value,
                Err(error) if !property.readable => {
                    debug!(property = %property.name, %error, "skipping unassigned hidden property");
                    continue;
                }
                Err(error) => return Err(error.into()),
            };
            if state.should_wrap(&value) {
                if let Value::Object(child) = value {
                    children.push((property.name, child));
                }
            }
        }
        children
    };

    for (name, child) in children {
        wrap(state, &child, path.child(&name))?;
    }
    Ok(DomainRef::new(Rc::clone(state), object.clone(), path))
}

/// A property read through a [`DomainRef`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Scalar, list, null or sealed value object.
    Value(Value),
    /// A wrapped domain object.
    Node(DomainRef),
}

impl Field {
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Value(Value::Null))
    }

    pub fn as_node(&self) -> Option<&DomainRef> {
        match self {
            Field::Node(node) => Some(node),
            Field::Value(_) => None,
        }
    }

    pub fn into_node(self) -> Option<DomainRef> {
        match self {
            Field::Node(node) => Some(node),
            Field::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Field::Value(value) => Some(value),
            Field::Node(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Field::Value(value) => Some(value),
            Field::Node(_) => None,
        }
    }
}

/// Handle to a wrapped domain object.
///
/// Cloning a handle is cheap; clones are equal. Two handles are equal when
/// they wrap the same object in the same domain.
///
/// A handle keeps the path its object was wrapped at, even after the
/// object has been replaced in the graph.
#[derive(Clone)]
pub struct DomainRef {
    state: Rc<DomainState>,
    object: ObjectRef,
    path: FieldPath,
}

impl DomainRef {
    pub(crate) fn new(state: Rc<DomainState>, object: ObjectRef, path: FieldPath) -> Self {
        Self { state, object, path }
    }

    /// Path from the domain root to this object. Empty for the root.
    pub fn path(&self) -> FieldPath {
        self.path.clone()
    }

    pub fn type_name(&self) -> String {
        self.object.type_name()
    }

    /// Property names in enumeration order.
    pub fn property_names(&self) -> DomainResult<Vec<String>> {
        let raw = self.object.borrow();
        let properties = self.state.accessor().properties(&raw)?;
        Ok(properties.into_iter().map(|p| p.name).collect())
    }

    /// Read a property. Domain objects come back wrapped.
    pub fn get(&self, name: &str) -> DomainResult<Field> {
        let value = {
            let raw = self.object.borrow();
            self.state.accessor().get(&raw, name)?
        };
        match value {
            Value::Object(ref object) if self.state.should_wrap(&value) => {
                let node = wrap(&self.state, object, self.path.child(name))?;
                Ok(Field::Node(node))
            }
            value => Ok(Field::Value(value)),
        }
    }

    /// Read a property holding a domain object. `None` when it is null.
    pub fn node(&self, name: &str) -> DomainResult<Option<DomainRef>> {
        match self.get(name)? {
            Field::Node(node) => Ok(Some(node)),
            Field::Value(Value::Null) => Ok(None),
            Field::Value(_) => Err(DomainError::not_an_object(self.path.child(name))),
        }
    }

    /// Read a nested property. A null along the way reads as null.
    pub fn get_path(&self, path: impl Into<FieldPath>) -> DomainResult<Field> {
        let path = path.into();
        let Some((last, parents)) = path.segments().split_last() else {
            return Ok(Field::Node(self.clone()));
        };

        let mut current = self.clone();
        for segment in parents {
            match current.node(segment)? {
                Some(next) => current = next,
                None => return Ok(Field::Value(Value::Null)),
            }
        }
        current.get(last)
    }

    /// Non-null plain value at `path`, if any.
    ///
    /// Read errors are treated as absent, which suits check functions that
    /// only care whether a value is there.
    pub fn lookup(&self, path: impl Into<FieldPath>) -> Option<Value> {
        let path = path.into();
        match self.get_path(&path) {
            Ok(field) => field.into_value().filter(|value| !value.is_null()),
            Err(error) => {
                debug!(%path, %error, "lookup failed");
                None
            }
        }
    }

    pub fn text(&self, path: impl Into<FieldPath>) -> Option<String> {
        self.lookup(path).and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn int(&self, path: impl Into<FieldPath>) -> Option<i64> {
        self.lookup(path).and_then(|v| v.as_int())
    }

    /// Returns true if nothing is reachable at `path`.
    pub fn is_null(&self, path: impl Into<FieldPath>) -> bool {
        self.get_path(path).map(|field| field.is_null()).unwrap_or(true)
    }

    /// Assign a property.
    ///
    /// Fails with [`DomainError::ReadOnly`] unless a writable window is open.
    /// A domain object assigned here is wrapped before the path is recorded
    /// as touched, so later writes to it are intercepted as well. A failed
    /// write records nothing.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> DomainResult<()> {
        let path = self.path.child(name);
        if self.state.window() != WindowState::Open {
            info!(%path, "rejected mutation outside writable window");
            return Err(DomainError::read_only(path));
        }

        let value = value.into();
        let previous = self.state.accessor().get(&self.object.borrow(), name).ok();
        self.state
            .accessor()
            .set(&mut self.object.borrow_mut(), name, value.clone())?;

        if let Some(Value::Object(old)) = previous {
            if value.as_object().map_or(true, |new| !new.ptr_eq(&old)) {
                self.state.retire(&old, &path);
            }
        }
        if let Value::Object(ref object) = value {
            if self.state.should_wrap(&value) {
                wrap(&self.state, object, path.clone())?;
            }
        }
        self.state.record_touch(path);
        Ok(())
    }

    /// Assign a nested property, e.g. `"address.country"`.
    pub fn set_path(&self, path: impl Into<FieldPath>, value: impl Into<Value>) -> DomainResult<()> {
        let path = path.into();
        let (Some(parent), Some(name)) = (path.parent(), path.last().map(str::to_owned)) else {
            return Err(DomainError::not_an_object(self.path()));
        };
        match self.get_path(&parent)? {
            Field::Node(node) => node.set(&name, value),
            Field::Value(_) => Err(DomainError::not_an_object(self.path_from(&parent))),
        }
    }

    fn path_from(&self, relative: &FieldPath) -> FieldPath {
        relative
            .segments()
            .iter()
            .fold(self.path.clone(), |path, segment| path.child(segment))
    }

    /// Run `mutator` with the domain writable.
    ///
    /// When the mutator finishes, by returning or by panicking, the window
    /// closes and the rules selected by the touched paths are enforced
    /// against the root. Partial mutations are not rolled back.
    ///
    /// The mutator's own error takes precedence over a validation error.
    /// A panic is resumed after enforcement.
    pub fn with_writable<T, Er, F>(&self, mutator: F) -> Result<T, Er>
    where
        Er: From<DomainError>,
        F: FnOnce(&DomainRef) -> Result<T, Er>,
    {
        match self.state.window() {
            WindowState::Closed => {}
            WindowState::Open => match self.state.config().reentrancy {
                ReentrancyPolicy::Reject => return Err(DomainError::WindowAlreadyOpen.into()),
                ReentrancyPolicy::Merge => {
                    debug!("joining open writable window");
                    return mutator(self);
                }
            },
            WindowState::Enforcing => return Err(DomainError::EnforcementInProgress.into()),
        }

        let guard = WindowGuard::open(&self.state);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| mutator(self)));

        let succeeded = matches!(outcome, Ok(Ok(_)));
        let validation = if succeeded || self.state.config().validate_on_failure {
            guard.enforce(&self.root())
        } else {
            Ok(EnforcementReport::default())
        };
        drop(guard);

        match outcome {
            Ok(Ok(value)) => {
                validation.map_err(DomainError::from)?;
                Ok(value)
            }
            Ok(Err(error)) => {
                if let Err(masked) = validation {
                    warn!(error = %masked, "validation failure masked by mutator error");
                }
                Err(error)
            }
            Err(payload) => {
                if let Err(masked) = validation {
                    warn!(error = %masked, "validation failure masked by mutator panic");
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// Paths touched in the current window, in first-touch order.
    pub fn touched_paths(&self) -> Vec<FieldPath> {
        self.state.touched()
    }

    /// Enforce the whole contract against the root.
    pub fn validate(&self) -> DomainResult<EnforcementReport> {
        Ok(self.state.enforcer().enforce(&self.root())?)
    }

    /// The root of this domain.
    pub fn root(&self) -> DomainRef {
        DomainRef::new(
            Rc::clone(&self.state),
            self.state.root().clone(),
            FieldPath::root(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.object.ptr_eq(self.state.root())
    }

    /// Returns true while a writable window is open on this domain.
    pub fn is_writable(&self) -> bool {
        self.state.window() == WindowState::Open
    }

    pub fn window_state(&self) -> WindowState {
        self.state.window()
    }

    /// Number of live objects currently wrapped in this domain.
    pub fn node_count(&self) -> usize {
        self.state.node_count()
    }

    /// The underlying object as a value, for assignment elsewhere.
    ///
    /// Mutating the raw object directly bypasses interception.
    pub fn to_value(&self) -> Value {
        Value::Object(self.object.clone())
    }
}

impl PartialEq for DomainRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state) && self.object.ptr_eq(&other.object)
    }
}

impl Eq for DomainRef {}

impl fmt::Debug for DomainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainRef")
            .field("type_name", &self.type_name())
            .field("path", &self.path.to_string())
            .finish()
    }
}

impl From<&DomainRef> for Value {
    fn from(node: &DomainRef) -> Self {
        node.to_value()
    }
}

impl From<DomainRef> for Value {
    fn from(node: DomainRef) -> Self {
        node.to_value()
    }
}

//! Raw, unwrapped domain objects.
//!
//! A raw object is a typed bag of named fields. Objects reference each other
//! through [`ObjectRef`], a shared handle whose identity is the allocation
//! itself, so graphs may share nodes and contain cycles.

use crate::Value;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Field storage, in declaration order.
pub type Fields = IndexMap<String, Value>;

/// A raw domain object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    type_name: String,
    fields: Fields,
}

impl RawObject {
    /// Create an object with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Fields::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Name of the object's type, used for registry lookups.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get a field value by name.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, returning the previous one.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Returns true if the object has a field with this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// All fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shared handle to a raw object.
///
/// Equality is identity: two handles are equal only when they point at the
/// same allocation.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<RawObject>>);

impl ObjectRef {
    pub fn new(raw: RawObject) -> Self {
        Self(Rc::new(RefCell::new(raw)))
    }

    /// Borrow the underlying object.
    ///
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, RawObject> {
        self.0.borrow()
    }

    /// Mutably borrow the underlying object.
    ///
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, RawObject> {
        self.0.borrow_mut()
    }

    /// Returns true if both handles point at the same object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the object for as long as any handle is alive.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Name of the object's type.
    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    /// A handle that does not keep the object alive.
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Rc::downgrade(&self.0))
    }
}

/// Non-owning handle to a raw object.
///
/// While it exists the object's address is not reused, even after the
/// object itself has been dropped.
#[derive(Clone)]
pub struct WeakObjectRef(Weak<RefCell<RawObject>>);

impl WeakObjectRef {
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }

    /// Returns true while some [`ObjectRef`] keeps the object alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl fmt::Debug for WeakObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakObjectRef({:#x}, alive: {})", self.0.as_ptr() as usize, self.is_alive())
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl From<RawObject> for ObjectRef {
    fn from(raw: RawObject) -> Self {
        Self::new(raw)
    }
}

// Fields are not printed: graphs may be cyclic.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(raw) => write!(f, "ObjectRef({}@{:#x})", raw.type_name, self.addr()),
            Err(_) => write!(f, "ObjectRef(<borrowed>@{:#x})", self.addr()),
        }
    }
}

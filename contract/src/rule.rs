//! Rules and check functions.

use std::fmt;
use std::rc::Rc;

use ward_core::FieldPath;

/// Identity of a check function.
///
/// Two [`Check`]s share an id exactly when one was cloned from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckId(usize);

/// A check function: inspects the whole root and returns an error, if any.
pub struct Check<R, E>(Rc<dyn Fn(&R) -> Option<E>>);

impl<R, E> Check<R, E> {
    pub fn new(check: impl Fn(&R) -> Option<E> + 'static) -> Self {
        Self(Rc::new(check))
    }

    pub fn id(&self) -> CheckId {
        CheckId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Returns true if both are the same function (not merely equivalent ones).
    pub fn same_as(&self, other: &Check<R, E>) -> bool {
        self.id() == other.id()
    }

    /// Evaluate the check against the root.
    pub fn run(&self, root: &R) -> Option<E> {
        (self.0)(root)
    }
}

impl<R, E> Clone for Check<R, E> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<R, E> fmt::Debug for Check<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Check({:#x})", self.id().0)
    }
}

/// A field path bound to a check.
///
/// The path says when the check is relevant; the check itself always sees
/// the whole root so it can express cross-field invariants.
pub struct Rule<R, E> {
    field: FieldPath,
    check: Check<R, E>,
}

impl<R, E> Rule<R, E> {
    pub fn new(field: impl Into<FieldPath>, check: Check<R, E>) -> Self {
        Self {
            field: field.into(),
            check,
        }
    }

    /// The field path this rule is sensitive to.
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn check(&self) -> &Check<R, E> {
        &self.check
    }

    /// Returns true if touching `path` makes this rule relevant.
    pub fn is_triggered_by(&self, path: &FieldPath) -> bool {
        path.covers(&self.field)
    }
}

impl<R, E> Clone for Rule<R, E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            check: self.check.clone(),
        }
    }
}

impl<R, E> fmt::Debug for Rule<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("check", &self.check)
            .finish()
    }
}

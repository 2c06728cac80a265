//! ContractBuilder for assembling a Contract.

use ward_core::FieldPath;

use crate::{Check, Contract, Rule};

/// Builder for a [`Contract`].
///
/// Rules keep the order in which they are added. A check bound to several
/// paths through [`rule2`](Self::rule2) or [`rule3`](Self::rule3) is one
/// check: it runs at most once per enforcement pass.
pub struct ContractBuilder<R, E> {
    rules: Vec<Rule<R, E>>,
}

impl<R, E> Default for ContractBuilder<R, E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<R, E> ContractBuilder<R, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a check to one field path.
    pub fn rule<F>(self, field: impl Into<FieldPath>, check: F) -> Self
    where
        F: Fn(&R) -> Option<E> + 'static,
    {
        self.bind([field.into()], Check::new(check))
    }

    /// Bind one check to two field paths.
    pub fn rule2<F>(self, first: impl Into<FieldPath>, second: impl Into<FieldPath>, check: F) -> Self
    where
        F: Fn(&R) -> Option<E> + 'static,
    {
        self.bind([first.into(), second.into()], Check::new(check))
    }

    /// Bind one check to three field paths.
    pub fn rule3<F>(
        self,
        first: impl Into<FieldPath>,
        second: impl Into<FieldPath>,
        third: impl Into<FieldPath>,
        check: F,
    ) -> Self
    where
        F: Fn(&R) -> Option<E> + 'static,
    {
        self.bind([first.into(), second.into(), third.into()], Check::new(check))
    }

    /// Bind an existing check to any number of field paths.
    pub fn bind<I>(mut self, fields: I, check: Check<R, E>) -> Self
    where
        I: IntoIterator<Item = FieldPath>,
    {
        self.rules
            .extend(fields.into_iter().map(|field| Rule::new(field, check.clone())));
        self
    }

    /// Build the contract.
    pub fn build(self) -> Contract<R, E> {
        Contract::new(self.rules)
    }
}

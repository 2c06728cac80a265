//! Configuration for the domain factory.

use ward_registry::TypeClass;

/// What a nested `with_writable` does while a window is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentrancyPolicy {
    /// Fail the nested call with `WindowAlreadyOpen`.
    #[default]
    Reject,
    /// Run the nested mutator inside the outer window. Its touches are
    /// enforced when the outer window closes.
    Merge,
}

/// Configuration for [`DomainFactory`](crate::DomainFactory).
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Classification of object types the registry does not declare.
    pub default_class: TypeClass,
    /// Nested window behaviour.
    pub reentrancy: ReentrancyPolicy,
    /// Run scoped enforcement even when the mutator fails or panics.
    pub validate_on_failure: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_class: TypeClass::Entity,
            reentrancy: ReentrancyPolicy::Reject,
            validate_on_failure: true,
        }
    }
}

impl FactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_class(mut self, class: TypeClass) -> Self {
        self.default_class = class;
        self
    }

    pub fn with_reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.reentrancy = policy;
        self
    }

    pub fn with_validate_on_failure(mut self, enabled: bool) -> Self {
        self.validate_on_failure = enabled;
        self
    }

    /// Nested windows join the outer one.
    pub fn merging() -> Self {
        Self::default().with_reentrancy(ReentrancyPolicy::Merge)
    }
}

//! Error handling strategies.
//!
//! Enforcement hands every check outcome, including "no error", to a
//! strategy. The strategy decides whether an error is escalated, logged or
//! collected. Returning `Err` aborts the enforcing call.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use tracing::warn;

use crate::error::{ContractError, ContractResult};

/// Receives the outcome of every evaluated check.
pub trait ErrorHandlingStrategy<E> {
    fn handle(&self, outcome: Option<&E>) -> ContractResult<()>;
}

impl<E, F> ErrorHandlingStrategy<E> for F
where
    F: Fn(Option<&E>) -> ContractResult<()>,
{
    fn handle(&self, outcome: Option<&E>) -> ContractResult<()> {
        self(outcome)
    }
}

/// Default strategy: the first error aborts enforcement.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl<E: Display> ErrorHandlingStrategy<E> for FailFast {
    fn handle(&self, outcome: Option<&E>) -> ContractResult<()> {
        match outcome {
            Some(error) => Err(ContractError::validation_failed(error.to_string())),
            None => Ok(()),
        }
    }
}

/// Logs errors and carries on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnly;

impl<E: Display> ErrorHandlingStrategy<E> for LogOnly {
    fn handle(&self, outcome: Option<&E>) -> ContractResult<()> {
        if let Some(error) = outcome {
            warn!(%error, "contract violation");
        }
        Ok(())
    }
}

/// Collects errors for later inspection and carries on.
///
/// Clones share one collection, so keep a clone to read the results after
/// handing the strategy to the engine.
#[derive(Debug)]
pub struct Collect<E> {
    violations: Rc<RefCell<Vec<E>>>,
}

impl<E> Default for Collect<E> {
    fn default() -> Self {
        Self {
            violations: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E> Clone for Collect<E> {
    fn clone(&self) -> Self {
        Self {
            violations: Rc::clone(&self.violations),
        }
    }
}

impl<E> Collect<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected violations, leaving the collection empty.
    pub fn take(&self) -> Vec<E> {
        std::mem::take(&mut *self.violations.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.violations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.borrow().is_empty()
    }
}

impl<E: Clone> Collect<E> {
    /// Snapshot of the violations collected so far.
    pub fn violations(&self) -> Vec<E> {
        self.violations.borrow().clone()
    }
}

impl<E: Clone> ErrorHandlingStrategy<E> for Collect<E> {
    fn handle(&self, outcome: Option<&E>) -> ContractResult<()> {
        if let Some(error) = outcome {
            self.violations.borrow_mut().push(error.clone());
        }
        Ok(())
    }
}

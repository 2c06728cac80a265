//! Contract enforcement.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;
use ward_core::FieldPath;

use crate::error::ContractResult;
use crate::{CheckId, ContractBuilder, ErrorHandlingStrategy, Rule};

/// Statistics from one enforcement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnforcementReport {
    /// Number of distinct checks evaluated.
    pub checks_run: usize,
    /// Number of checks that reported an error the strategy let through.
    pub failures: usize,
}

impl EnforcementReport {
    /// Returns true if no check reported an error.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// An ordered set of rules over a root of type `R`, reporting errors of type `E`.
pub struct Contract<R, E> {
    rules: Vec<Rule<R, E>>,
}

impl<R, E> Contract<R, E> {
    pub fn new(rules: Vec<Rule<R, E>>) -> Self {
        Self { rules }
    }

    /// A contract without rules. Enforcement always succeeds.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn builder() -> ContractBuilder<R, E> {
        ContractBuilder::new()
    }

    pub fn rules(&self) -> &[Rule<R, E>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules made relevant by touching `path`, in contract order.
    pub fn rules_for<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a Rule<R, E>> + 'a {
        self.rules.iter().filter(move |rule| rule.is_triggered_by(path))
    }

    /// Run every check once, in contract order.
    pub fn enforce<S>(&self, root: &R, strategy: &S) -> ContractResult<EnforcementReport>
    where
        S: ErrorHandlingStrategy<E> + ?Sized,
    {
        let mut pass = Pass::default();
        for rule in &self.rules {
            pass.run(rule, root, strategy)?;
        }
        debug!(checks_run = pass.report.checks_run, failures = pass.report.failures, "full enforcement");
        Ok(pass.report)
    }

    /// Run the checks whose paths were touched.
    ///
    /// Touched paths are visited in order; for each, the matching rules run
    /// in contract order. A check already run in this pass is skipped.
    pub fn enforce_scoped<S>(
        &self,
        root: &R,
        touched: &[FieldPath],
        strategy: &S,
    ) -> ContractResult<EnforcementReport>
    where
        S: ErrorHandlingStrategy<E> + ?Sized,
    {
        let mut pass = Pass::default();
        for path in touched {
            for rule in self.rules_for(path) {
                pass.run(rule, root, strategy)?;
            }
        }
        debug!(
            touched = touched.len(),
            checks_run = pass.report.checks_run,
            failures = pass.report.failures,
            "scoped enforcement"
        );
        Ok(pass.report)
    }
}

#[derive(Default)]
struct Pass {
    executed: HashSet<CheckId>,
    report: EnforcementReport,
}

impl Pass {
    fn run<R, E, S>(&mut self, rule: &Rule<R, E>, root: &R, strategy: &S) -> ContractResult<()>
    where
        S: ErrorHandlingStrategy<E> + ?Sized,
    {
        if !self.executed.insert(rule.check().id()) {
            return Ok(());
        }
        let outcome = rule.check().run(root);
        self.report.checks_run += 1;
        if outcome.is_some() {
            debug!(field = %rule.field(), "check reported an error");
        }
        strategy.handle(outcome.as_ref())?;
        if outcome.is_some() {
            self.report.failures += 1;
        }
        Ok(())
    }
}

impl<R, E> Default for Contract<R, E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R, E> Clone for Contract<R, E> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<R, E> fmt::Debug for Contract<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract").field("rules", &self.rules).finish()
    }
}

//! grid-ruleengine — ordered conditional rules.
//!
//! A rule is a list of zero-argument predicates plus an action. The engine
//! walks the rules in the order given and runs the action of every rule whose
//! predicates all hold. Two families exist:
//!
//! - [`DefaultingRule`]: the action mutates a caller-owned target.
//!   [`execute_defaulting`] never stops early; when several rules write the
//!   same field, the last one to fire wins.
//! - [`ValidationRule`]: the action may fail. [`execute_validation`] returns
//!   the first error unchanged and skips every rule after it.
//!
//! ```text
//! for rule in rules:
//!     if all(cond() for cond in rule.conditions):   # empty => true
//!         rule.action()
//! ```
//!
//! Both entry points take a [`Context`]. The engine never reads it.

pub mod context;
pub mod defaulting;
pub mod error;
pub mod validation;

pub use context::Context;
pub use defaulting::{DefaultingRule, execute_defaulting};
pub use error::RuleError;
pub use validation::{ValidationRule, execute_validation};

/// A zero-argument predicate, usually a closure over a snapshot.
pub type Condition<'a> = Box<dyn Fn() -> bool + 'a>;

/// Evaluate conditions left to right, stopping at the first false one.
pub(crate) fn conditions_hold(conditions: &[Condition<'_>]) -> bool {
    conditions.iter().all(|condition| condition())
}

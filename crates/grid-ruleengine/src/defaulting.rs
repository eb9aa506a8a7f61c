//! Defaulting rules: conditional side effects on a caller-owned target.

use crate::{Condition, Context, conditions_hold};

/// A defaulting rule.
///
/// `conditions` are checked in order; the rule fires only if every one of
/// them returns true. A rule without conditions always fires.
pub struct DefaultingRule<'a, T> {
    pub conditions: Vec<Condition<'a>>,
    pub defaulting: Box<dyn Fn(&mut T) + 'a>,
}

impl<'a, T> DefaultingRule<'a, T> {
    /// Create an unconditional rule running `defaulting`.
    pub fn new(defaulting: impl Fn(&mut T) + 'a) -> Self {
        Self {
            conditions: Vec::new(),
            defaulting: Box::new(defaulting),
        }
    }

    /// Append a condition.
    pub fn when(mut self, condition: impl Fn() -> bool + 'a) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }
}

/// Apply `rules` to `target` in order.
///
/// Every rule is considered, including after one has fired. The context is
/// not examined.
pub fn execute_defaulting<T>(_ctx: &Context, rules: &[DefaultingRule<'_, T>], target: &mut T) {
    for rule in rules {
        if !conditions_hold(&rule.conditions) {
            continue;
        }

        (rule.defaulting)(target);
    }
}

//! Validation rules: conditional checks that may reject input.

use crate::{Condition, Context, conditions_hold};

/// A validation rule.
///
/// Same condition semantics as [`crate::DefaultingRule`]; the action returns
/// an error to reject.
pub struct ValidationRule<'a, E> {
    pub conditions: Vec<Condition<'a>>,
    pub validation: Box<dyn Fn() -> Result<(), E> + 'a>,
}

impl<'a, E> ValidationRule<'a, E> {
    pub fn new(validation: impl Fn() -> Result<(), E> + 'a) -> Self {
        Self {
            conditions: Vec::new(),
            validation: Box::new(validation),
        }
    }

    pub fn when(mut self, condition: impl Fn() -> bool + 'a) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }
}

/// Run `rules` in order, returning the first error unchanged.
///
/// Rules after the failing one are not evaluated.
pub fn execute_validation<E>(_ctx: &Context, rules: &[ValidationRule<'_, E>]) -> Result<(), E> {
    for rule in rules {
        if !conditions_hold(&rule.conditions) {
            continue;
        }

        (rule.validation)()?;
    }

    Ok(())
}

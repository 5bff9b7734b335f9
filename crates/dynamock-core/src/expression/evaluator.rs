//! Evaluation of parsed expressions against a row.
//!
//! Key conditions compare the text payload of string and number attributes
//! lexicographically, matching DynamoDB's ordering for string keys. Update
//! operations produce a new row; the input row is never modified.

use std::collections::HashMap;

use dynamock_model::AttributeValue;
use dynamock_model::types::Item;

use super::ast::{Comparison, Condition, ConditionOp, UpdateAction, UpdateFunction, UpdateOp};
use super::parser::ExpressionError;

/// Context for evaluating expressions against a single row.
#[derive(Debug)]
pub struct EvalContext<'a> {
    /// The row being evaluated.
    pub item: &'a Item,
    /// Expression attribute name substitutions (`#name` -> actual attribute name).
    pub names: &'a HashMap<String, String>,
    /// Expression attribute value substitutions (`:val` -> `AttributeValue`).
    pub values: &'a HashMap<String, AttributeValue>,
}

impl<'a> EvalContext<'a> {
    /// Create a context for `item`.
    #[must_use]
    pub fn new(
        item: &'a Item,
        names: &'a HashMap<String, String>,
        values: &'a HashMap<String, AttributeValue>,
    ) -> Self {
        Self {
            item,
            names,
            values,
        }
    }

    /// Resolve an attribute reference.
    ///
    /// `#name` placeholders must be present in the name map; anything else is
    /// taken as a literal attribute name.
    pub fn resolve_name<'n>(&'n self, reference: &'n str) -> Result<&'n str, ExpressionError> {
        if !reference.starts_with('#') {
            return Ok(reference);
        }
        self.names
            .get(reference)
            .map(String::as_str)
            .ok_or_else(|| ExpressionError::UnresolvedName {
                name: reference.to_owned(),
            })
    }

    /// Resolve a `:value` placeholder.
    pub fn resolve_value(&self, reference: &str) -> Result<&'a AttributeValue, ExpressionError> {
        self.values
            .get(reference)
            .ok_or_else(|| ExpressionError::UnresolvedValue {
                name: reference.to_owned(),
            })
    }

    fn value_text(&self, reference: &str) -> Result<&'a str, ExpressionError> {
        let value = self.resolve_value(reference)?;
        value.as_text().ok_or_else(|| ExpressionError::TypeMismatch {
            message: format!(
                "{reference} is {}, key conditions compare S or N values",
                value.type_descriptor()
            ),
        })
    }

    // -----------------------------------------------------------------------
    // Condition evaluation
    // -----------------------------------------------------------------------

    /// Evaluate one condition.
    ///
    /// A row lacking the attribute never matches, which keeps rows out of
    /// sparse index views.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError` if a placeholder cannot be resolved or a
    /// compared value is neither a string nor a number.
    pub fn evaluate(&self, condition: &Condition) -> Result<bool, ExpressionError> {
        let name = self.resolve_name(&condition.name)?;
        let Some(attribute) = self.item.get(name) else {
            return Ok(false);
        };
        let actual = attribute
            .as_text()
            .ok_or_else(|| ExpressionError::TypeMismatch {
                message: format!(
                    "attribute {name} is {}, key conditions compare S or N values",
                    attribute.type_descriptor()
                ),
            })?;

        match (&condition.comparison, condition.op) {
            (Comparison::Range(lower, upper), ConditionOp::Between) => {
                let lower = self.value_text(lower)?;
                let upper = self.value_text(upper)?;
                Ok(lower <= actual && actual <= upper)
            }
            (Comparison::Single(value), op) => {
                let expected = self.value_text(value)?;
                Ok(match op {
                    ConditionOp::Eq => actual == expected,
                    ConditionOp::Lt => actual < expected,
                    ConditionOp::Le => actual <= expected,
                    ConditionOp::Gt => actual > expected,
                    ConditionOp::Ge => actual >= expected,
                    ConditionOp::BeginsWith => actual.starts_with(expected),
                    ConditionOp::Between => false,
                })
            }
            (Comparison::Range(..), _) => Ok(false),
        }
    }

    /// Evaluate a conjunction; an empty list matches every row.
    pub fn evaluate_all(&self, conditions: &[Condition]) -> Result<bool, ExpressionError> {
        for condition in conditions {
            if !self.evaluate(condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Update application
    // -----------------------------------------------------------------------

    /// Apply update operations and return the resulting row.
    ///
    /// All `SET` operations run before any `REMOVE`, whatever their order in
    /// `ops`. An `if_not_exists` assignment is skipped when its existence
    /// target holds a non-empty value in the original row.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError` if any placeholder cannot be resolved.
    pub fn apply_updates(&self, ops: &[UpdateOp]) -> Result<Item, ExpressionError> {
        let mut out = self.item.clone();

        for op in ops.iter().filter(|op| op.action == UpdateAction::Set) {
            let name = self.resolve_name(&op.name)?;
            let value_ref = op.value.as_deref().unwrap_or_default();
            let value = self.resolve_value(value_ref)?;

            if op.function == UpdateFunction::IfNotExists {
                let secondary = op.secondary_name.as_deref().unwrap_or(&op.name);
                let secondary = self.resolve_name(secondary)?;
                if self.item.get(secondary).is_some_and(|v| !v.is_blank()) {
                    continue;
                }
            }
            out.insert(name.to_owned(), value.clone());
        }

        for op in ops.iter().filter(|op| op.action == UpdateAction::Remove) {
            let name = self.resolve_name(&op.name)?;
            out.remove(name);
        }

        Ok(out)
    }
}

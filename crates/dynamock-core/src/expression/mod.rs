//! Key-condition and update expressions.
//!
//! Both mini-languages are recognized with regular expressions rather than a
//! grammar:
//!
//! 1. **Parsing**: pattern matches become [`Condition`]s or [`UpdateOp`]s.
//! 2. **Evaluation**: [`EvalContext`] resolves placeholders and tests
//!    conditions against a row or applies updates to it.

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{Comparison, Condition, ConditionOp, UpdateAction, UpdateFunction, UpdateOp};
pub use evaluator::EvalContext;
pub use parser::{
    ExpressionError, get_clause, parse_key_condition, parse_removes, parse_sets, parse_update,
};

//! Parsed forms of key-condition and update expressions.
//!
//! Placeholders are kept verbatim (`#name`, `:value`); the evaluator resolves
//! them against the attribute name and value maps supplied with a request.

use std::fmt;

// ---------------------------------------------------------------------------
// Key conditions
// ---------------------------------------------------------------------------

/// Operators a key condition can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    /// Equal (`=`).
    Eq,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Inclusive range (`BETWEEN a AND b`).
    Between,
    /// Prefix test (`begins_with(name, value)`).
    BeginsWith,
}

impl ConditionOp {
    /// Parse a comparison operator token.
    #[must_use]
    pub fn from_operator(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    /// Parse a function name. Function names are case-sensitive.
    #[must_use]
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "begins_with" => Some(Self::BeginsWith),
            _ => None,
        }
    }

    /// Returns the operator as written in an expression.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Between => "between",
            Self::BeginsWith => "begins_with",
        }
    }
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value side of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// A single value placeholder.
    Single(String),
    /// Lower and upper bound placeholders of a `BETWEEN`.
    Range(String, String),
}

/// One conjunct of a key-condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The operator.
    pub op: ConditionOp,
    /// Attribute name or `#name` placeholder.
    pub name: String,
    /// Value placeholder(s).
    pub comparison: Comparison,
}

// ---------------------------------------------------------------------------
// Update operations
// ---------------------------------------------------------------------------

/// Clause an update operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// `SET`
    Set,
    /// `REMOVE`
    Remove,
}

/// How an update operation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFunction {
    /// `#name = :value`
    Assign,
    /// `#name = if_not_exists(#other, :value)`
    IfNotExists,
    /// Delete the attribute.
    Remove,
}

/// A single parsed update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOp {
    /// Clause the operation belongs to.
    pub action: UpdateAction,
    /// Target `#name` placeholder.
    pub name: String,
    /// Value placeholder; `None` for removals.
    pub value: Option<String>,
    /// Application rule.
    pub function: UpdateFunction,
    /// Attribute whose existence suppresses an `if_not_exists` assignment.
    /// It may differ from `name`.
    pub secondary_name: Option<String>,
}

impl UpdateOp {
    /// A plain assignment.
    #[must_use]
    pub fn assign(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action: UpdateAction::Set,
            name: name.into(),
            value: Some(value.into()),
            function: UpdateFunction::Assign,
            secondary_name: None,
        }
    }

    /// An assignment skipped when `secondary_name` already holds a value.
    #[must_use]
    pub fn if_not_exists(
        name: impl Into<String>,
        secondary_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            action: UpdateAction::Set,
            name: name.into(),
            value: Some(value.into()),
            function: UpdateFunction::IfNotExists,
            secondary_name: Some(secondary_name.into()),
        }
    }

    /// A removal.
    #[must_use]
    pub fn remove(name: impl Into<String>) -> Self {
        Self {
            action: UpdateAction::Remove,
            name: name.into(),
            value: None,
            function: UpdateFunction::Remove,
            secondary_name: None,
        }
    }
}

//! Pattern-based parsers for update and key-condition expressions.
//!
//! Update expressions may mix `SET`, `REMOVE`, `ADD` and `DELETE` clauses.
//! Only `SET` and `REMOVE` are interpreted; the other keywords still delimit
//! clauses. Key conditions are a flat conjunction of comparisons, `BETWEEN`
//! ranges and `begins_with` calls.

use std::sync::LazyLock;

use regex::Regex;

use super::ast::{Comparison, Condition, ConditionOp, UpdateOp};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced during expression parsing or evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// An expression attribute name placeholder could not be resolved.
    #[error("Unresolved expression attribute name: {name}")]
    UnresolvedName {
        /// The unresolved name reference.
        name: String,
    },
    /// An expression attribute value placeholder could not be resolved.
    #[error("Unresolved expression attribute value: {name}")]
    UnresolvedValue {
        /// The unresolved value reference.
        name: String,
    },
    /// A comparison operator outside `= < <= > >=`.
    #[error("Unsupported key condition operator: {operator}")]
    UnsupportedOperator {
        /// The operator as written.
        operator: String,
    },
    /// A function other than `begins_with`.
    #[error("Unsupported key condition function: {function}")]
    UnsupportedFunction {
        /// The function name as written.
        function: String,
    },
    /// A type mismatch occurred during evaluation.
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// Explanation.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static CLAUSE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:SET|REMOVE|ADD|DELETE)\b").expect("valid regex"));

static SET_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?P<name>[^,\s(=]+)\s*=\s*:(?P<value>[^\s,(]+)").expect("valid regex")
});

static SET_IF_NOT_EXISTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"#(?P<name>[^,\s=]+)\s*=\s*if_not_exists\s*\(\s*#(?P<second>[^\s,]+)\s*,\s*:(?P<value>[^\s)]+)\s*\)",
    )
    .expect("valid regex")
});

static KEY_BETWEEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<name>[^,\s]+)\s+BETWEEN\s+(?P<a>[^\s,]+)\s+AND\s+(?P<b>[^\s,]+)")
        .expect("valid regex")
});

static KEY_COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<name>[^,\s<>=()]+)\s*(?P<op>[<>=]+)\s*(?P<value>[^\s,()]+)")
        .expect("valid regex")
});

static KEY_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<func>[^\s,(]+)\s*\(\s*(?P<name>[^\s,]+)\s*,\s*(?P<value>[^\s)]+)\s*\)")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Update expressions
// ---------------------------------------------------------------------------

/// Returns the body of the `keyword` clause of an update expression.
///
/// The clause runs from just after the first whole-word occurrence of
/// `keyword` to the next clause keyword or the end of the expression.
/// Returns `None` when the keyword is absent or the clause is empty.
#[must_use]
pub fn get_clause<'a>(keyword: &str, expression: &'a str) -> Option<&'a str> {
    let start = CLAUSE_KEYWORD
        .find_iter(expression)
        .find(|m| m.as_str() == keyword)?
        .end();
    let end = CLAUSE_KEYWORD
        .find_at(expression, start)
        .map_or(expression.len(), |m| m.start());
    let clause = expression[start..end].trim();
    (!clause.is_empty()).then_some(clause)
}

/// Parse the `SET` clause.
///
/// Plain assignments come first, then `if_not_exists` assignments, each in
/// source order.
#[must_use]
pub fn parse_sets(expression: &str) -> Vec<UpdateOp> {
    let Some(clause) = get_clause("SET", expression) else {
        return Vec::new();
    };

    let assigns = SET_ASSIGN
        .captures_iter(clause)
        .map(|c| UpdateOp::assign(format!("#{}", &c["name"]), format!(":{}", &c["value"])));
    let conditionals = SET_IF_NOT_EXISTS.captures_iter(clause).map(|c| {
        UpdateOp::if_not_exists(
            format!("#{}", &c["name"]),
            format!("#{}", &c["second"]),
            format!(":{}", &c["value"]),
        )
    });
    assigns.chain(conditionals).collect()
}

/// Parse the `REMOVE` clause into one removal per comma-separated name.
#[must_use]
pub fn parse_removes(expression: &str) -> Vec<UpdateOp> {
    let Some(clause) = get_clause("REMOVE", expression) else {
        return Vec::new();
    };
    clause
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(UpdateOp::remove)
        .collect()
}

/// Parse a whole update expression: `SET` operations followed by `REMOVE`
/// operations.
#[must_use]
pub fn parse_update(expression: &str) -> Vec<UpdateOp> {
    let mut ops = parse_sets(expression);
    ops.extend(parse_removes(expression));
    ops
}

// ---------------------------------------------------------------------------
// Key-condition expressions
// ---------------------------------------------------------------------------

/// Parse a key-condition expression into its conjuncts.
///
/// `BETWEEN` ranges are extracted first, then comparisons, then function
/// calls. An empty expression yields no conditions.
pub fn parse_key_condition(expression: &str) -> Result<Vec<Condition>, ExpressionError> {
    let mut conditions = Vec::new();

    for c in KEY_BETWEEN.captures_iter(expression) {
        conditions.push(Condition {
            op: ConditionOp::Between,
            name: c["name"].to_owned(),
            comparison: Comparison::Range(c["a"].to_owned(), c["b"].to_owned()),
        });
    }

    for c in KEY_COMPARISON.captures_iter(expression) {
        let op = ConditionOp::from_operator(&c["op"]).ok_or_else(|| {
            ExpressionError::UnsupportedOperator {
                operator: c["op"].to_owned(),
            }
        })?;
        conditions.push(Condition {
            op,
            name: c["name"].to_owned(),
            comparison: Comparison::Single(c["value"].to_owned()),
        });
    }

    for c in KEY_FUNCTION.captures_iter(expression) {
        let op = ConditionOp::from_function(&c["func"]).ok_or_else(|| {
            ExpressionError::UnsupportedFunction {
                function: c["func"].to_owned(),
            }
        })?;
        conditions.push(Condition {
            op,
            name: c["name"].to_owned(),
            comparison: Comparison::Single(c["value"].to_owned()),
        });
    }

    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ast::{UpdateAction, UpdateFunction};

    #[test]
    fn test_should_extract_clauses() {
        let expression = "SET #a = :a, #b = :b REMOVE #c, #d ADD #e :e";
        assert_eq!(get_clause("SET", expression), Some("#a = :a, #b = :b"));
        assert_eq!(get_clause("REMOVE", expression), Some("#c, #d"));
        assert_eq!(get_clause("ADD", expression), Some("#e :e"));
        assert_eq!(get_clause("DELETE", expression), None);
    }

    #[test]
    fn test_should_stop_clause_at_unhandled_keyword() {
        let expression = "REMOVE #c DELETE #s :s SET #a = :a";
        assert_eq!(get_clause("REMOVE", expression), Some("#c"));
        assert_eq!(get_clause("SET", expression), Some("#a = :a"));
    }

    #[test]
    fn test_should_return_none_for_empty_clause() {
        assert_eq!(get_clause("SET", "SET REMOVE #a"), None);
        assert_eq!(get_clause("SET", ""), None);
    }

    #[test]
    fn test_should_not_treat_placeholder_text_as_keyword() {
        let expression = "SET #ADDRESS = :ADDRESS";
        assert_eq!(get_clause("SET", expression), Some("#ADDRESS = :ADDRESS"));
    }

    #[test]
    fn test_should_parse_sets_in_discovery_order() {
        let ops = parse_sets("SET #k3=if_not_exists(#k3, :v3), #k0=:v0, #k1 = :v1");
        assert_eq!(
            ops,
            vec![
                UpdateOp::assign("#k0", ":v0"),
                UpdateOp::assign("#k1", ":v1"),
                UpdateOp::if_not_exists("#k3", "#k3", ":v3"),
            ]
        );
    }

    #[test]
    fn test_should_parse_distinct_existence_target() {
        let ops = parse_sets("SET #updated = if_not_exists(#created, :now)");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].name, "#updated");
        assert_eq!(ops[0].secondary_name.as_deref(), Some("#created"));
        assert_eq!(ops[0].function, UpdateFunction::IfNotExists);
    }

    #[test]
    fn test_should_parse_removes() {
        let ops = parse_removes("SET #a=:a REMOVE #b , #c,");
        assert_eq!(ops, vec![UpdateOp::remove("#b"), UpdateOp::remove("#c")]);
        assert!(ops.iter().all(|op| op.action == UpdateAction::Remove));
    }

    #[test]
    fn test_should_parse_update_with_sets_before_removes() {
        let ops = parse_update("REMOVE #k2 SET #k0=:v0");
        assert_eq!(ops, vec![UpdateOp::assign("#k0", ":v0"), UpdateOp::remove("#k2")]);
    }

    #[test]
    fn test_should_yield_nothing_for_expression_without_clauses() {
        assert!(parse_update("").is_empty());
        assert!(parse_update("ADD #n :one").is_empty());
    }

    #[test]
    fn test_should_parse_key_condition_with_prefix() {
        let conditions = parse_key_condition("#pk = :pk AND begins_with(#sk, :sk)").expect("parse");
        assert_eq!(
            conditions,
            vec![
                Condition {
                    op: ConditionOp::Eq,
                    name: "#pk".to_owned(),
                    comparison: Comparison::Single(":pk".to_owned()),
                },
                Condition {
                    op: ConditionOp::BeginsWith,
                    name: "#sk".to_owned(),
                    comparison: Comparison::Single(":sk".to_owned()),
                },
            ]
        );
    }

    #[test]
    fn test_should_parse_between_and_ordering() {
        let conditions =
            parse_key_condition("#pk=:pk AND #sk BETWEEN :lo AND :hi").expect("parse");
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].op, ConditionOp::Between);
        assert_eq!(
            conditions[0].comparison,
            Comparison::Range(":lo".to_owned(), ":hi".to_owned())
        );
        assert_eq!(conditions[1].op, ConditionOp::Eq);

        let conditions = parse_key_condition("#pk = :pk AND #sk <= :sk").expect("parse");
        assert_eq!(conditions[1].op, ConditionOp::Le);
        assert_eq!(conditions[1].name, "#sk");
    }

    #[test]
    fn test_should_reject_unsupported_operator_and_function() {
        assert!(matches!(
            parse_key_condition("#pk <> :pk"),
            Err(ExpressionError::UnsupportedOperator { .. })
        ));
        assert!(matches!(
            parse_key_condition("contains(#sk, :sk)"),
            Err(ExpressionError::UnsupportedFunction { .. })
        ));
    }

    #[test]
    fn test_should_parse_empty_key_condition() {
        assert!(parse_key_condition("").expect("parse").is_empty());
    }
}

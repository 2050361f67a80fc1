use serde_json::Value;
use tracing::trace;

use crate::types::payload::get_path;
use crate::types::value::{compare_numbers, display, is_blank, json_eq, type_name};
use crate::{
    Combinator, Condition, ConditionIssue, ConditionNode, ConditionReport, FailedCondition,
    Operand, Operator,
};

/// Path of the root node in failure reports.
pub(crate) const ROOT_PATH: &str = "conditions";

/// Outcome of evaluating a single condition leaf.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct LeafOutcome {
    pub matched: bool,
    /// Short text for explanations, e.g. `"discount_percent (12) >= 10: true"`.
    pub diagnostic: String,
    /// Set when the leaf could not be judged on its values and evaluated to `false`.
    pub issue: Option<ConditionIssue>,
}

impl LeafOutcome {
    fn decided(leaf: &Condition, actual: Option<&Value>, matched: bool) -> Self {
        let actual = actual.map_or_else(|| "missing".to_owned(), display);
        let diagnostic = if leaf.operand.is_absent() {
            format!("{} ({actual}) {}: {matched}", leaf.field, leaf.operator)
        } else {
            format!(
                "{} ({actual}) {} {}: {matched}",
                leaf.field, leaf.operator, leaf.operand
            )
        };
        Self {
            matched,
            diagnostic,
            issue: None,
        }
    }

    fn failed(leaf: &Condition, issue: ConditionIssue) -> Self {
        Self {
            matched: false,
            diagnostic: format!("{leaf}: {issue}"),
            issue: Some(issue),
        }
    }
}

/// Evaluate one leaf against a payload.
///
/// A missing field, a non-numeric ordering comparison or a descending
/// `between` range makes the leaf `false` and is recorded as an
/// [`issue`](LeafOutcome::issue); it never aborts evaluation. `is_null` and
/// `is_not_null` treat a missing field as null.
///
/// Leaves are expected to be validated (see [`Rule::validate`](crate::Rule::validate));
/// a leaf whose operand shape does not fit its operator never matches.
pub fn evaluate_leaf(leaf: &Condition, payload: &Value) -> LeafOutcome {
    let actual = get_path(payload, &leaf.field);

    if leaf.operator.is_nullary() {
        let blank = is_blank(actual);
        let matched = match leaf.operator {
            Operator::IsNull => blank,
            _ => !blank,
        };
        return LeafOutcome::decided(leaf, actual, matched);
    }

    let Some(actual) = actual else {
        return LeafOutcome::failed(
            leaf,
            ConditionIssue::FieldNotFound {
                path: leaf.field.clone(),
            },
        );
    };

    match apply_operator(leaf, actual) {
        Ok(matched) => LeafOutcome::decided(leaf, Some(actual), matched),
        Err(issue) => LeafOutcome::failed(leaf, issue),
    }
}

fn apply_operator(leaf: &Condition, actual: &Value) -> Result<bool, ConditionIssue> {
    let op = leaf.operator;
    match (op, &leaf.operand) {
        (Operator::Eq, Operand::Scalar(expected)) => Ok(json_eq(actual, expected)),
        (Operator::Neq, Operand::Scalar(expected)) => Ok(!json_eq(actual, expected)),
        (Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte, Operand::Scalar(expected)) => {
            compare_numbers(actual, op, expected).ok_or_else(|| mismatch(leaf, actual, expected))
        }
        (Operator::In, operand) => Ok(member_of(actual, operand)),
        (Operator::NotIn, operand) => Ok(!member_of(actual, operand)),
        (Operator::Between, Operand::Pair(low, high)) => between(leaf, actual, low, high),
        (Operator::Contains, Operand::Scalar(needle)) => contains(leaf, actual, needle),
        _ => Ok(false),
    }
}

fn mismatch(leaf: &Condition, actual: &Value, expected: &Value) -> ConditionIssue {
    let found = if actual.is_number() {
        type_name(expected)
    } else {
        type_name(actual)
    };
    ConditionIssue::TypeMismatch {
        field: leaf.field.clone(),
        operator: leaf.operator,
        found,
    }
}

fn member_of(actual: &Value, operand: &Operand) -> bool {
    let set = match operand {
        Operand::Set(items) => items.as_slice(),
        Operand::Scalar(Value::Array(items)) => items.as_slice(),
        _ => return false,
    };
    set.iter().any(|candidate| json_eq(actual, candidate))
}

fn between(
    leaf: &Condition,
    actual: &Value,
    low: &Value,
    high: &Value,
) -> Result<bool, ConditionIssue> {
    if compare_numbers(low, Operator::Gt, high).ok_or_else(|| mismatch(leaf, low, high))? {
        return Err(ConditionIssue::InvalidRange {
            field: leaf.field.clone(),
            low: display(low),
            high: display(high),
        });
    }
    let above = compare_numbers(actual, Operator::Gte, low).ok_or_else(|| mismatch(leaf, actual, low))?;
    let below = compare_numbers(actual, Operator::Lte, high).ok_or_else(|| mismatch(leaf, actual, high))?;
    Ok(above && below)
}

fn contains(leaf: &Condition, actual: &Value, needle: &Value) -> Result<bool, ConditionIssue> {
    match (actual, needle) {
        (Value::String(haystack), Value::String(part)) => Ok(haystack.contains(part.as_str())),
        (Value::Array(items), _) => Ok(items.iter().any(|item| json_eq(item, needle))),
        (Value::String(_), _) => Err(ConditionIssue::TypeMismatch {
            field: leaf.field.clone(),
            operator: leaf.operator,
            found: type_name(needle),
        }),
        _ => Err(ConditionIssue::TypeMismatch {
            field: leaf.field.clone(),
            operator: leaf.operator,
            found: type_name(actual),
        }),
    }
}

/// Evaluate a condition tree against a payload.
///
/// Children are evaluated in declared order. An AND group stops at its first
/// `false` child and reports it; an OR group stops at its first `true` child,
/// and when every child is `false` it reports the last one. The reported
/// failure is always a leaf.
#[must_use]
pub fn evaluate(node: &ConditionNode, payload: &Value) -> (bool, Option<FailedCondition>) {
    eval_node(node, payload, ROOT_PATH, &mut None)
}

/// Like [`evaluate()`], also recording the path of every leaf actually
/// evaluated, in order.
pub fn evaluate_detailed(node: &ConditionNode, payload: &Value) -> ConditionReport {
    let mut visited = Some(Vec::new());
    let (matched, failure) = eval_node(node, payload, ROOT_PATH, &mut visited);
    ConditionReport::new(matched, failure, visited.unwrap_or_default())
}

fn eval_node(
    node: &ConditionNode,
    payload: &Value,
    path: &str,
    visited: &mut Option<Vec<String>>,
) -> (bool, Option<FailedCondition>) {
    match node {
        ConditionNode::Leaf(leaf) => {
            if let Some(visited) = visited.as_mut() {
                visited.push(path.to_owned());
            }
            let outcome = evaluate_leaf(leaf, payload);
            trace!(path, matched = outcome.matched, diagnostic = %outcome.diagnostic, "condition evaluated");
            if outcome.matched {
                (true, None)
            } else {
                let failure = FailedCondition {
                    path: path.to_owned(),
                    condition: leaf.clone(),
                    diagnostic: outcome.diagnostic,
                    issue: outcome.issue,
                };
                (false, Some(failure))
            }
        }
        ConditionNode::Group {
            combinator: Combinator::And,
            children,
        } => {
            for (i, child) in children.iter().enumerate() {
                let (matched, failure) = eval_node(child, payload, &child_path(path, i), visited);
                if !matched {
                    return (false, failure);
                }
            }
            (true, None)
        }
        ConditionNode::Group {
            combinator: Combinator::Or,
            children,
        } => {
            let mut last_failure = None;
            for (i, child) in children.iter().enumerate() {
                let (matched, failure) = eval_node(child, payload, &child_path(path, i), visited);
                if matched {
                    return (true, None);
                }
                last_failure = failure;
            }
            (false, last_failure)
        }
    }
}

pub(crate) fn child_path(parent: &str, index: usize) -> String {
    format!("{parent}.children[{index}]")
}

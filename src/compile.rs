use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::evaluate::{ROOT_PATH, child_path};
use crate::types::payload::is_valid_path;
use crate::types::value::{as_number, display};
use crate::{
    Action, ActionKind, Combinator, Condition, ConditionNode, OUT_OF_POLICY_FLAG, Operand,
    Operator, Rule, RuleDefinitionError,
};

/// Default target of legacy `apply_discount` / `override_price` actions.
const LEGACY_PRICE_FIELD: &str = "price";

/// Top-level shape of a rule document. Conditions and actions are kept as raw
/// JSON and converted by hand so every problem maps to a named error.
#[derive(Debug, Deserialize)]
struct RuleDocument {
    rule_id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    priority: i64,
    conditions: Option<Value>,
    #[serde(default)]
    actions: Vec<Value>,
    #[serde(default, alias = "meta")]
    metadata: BTreeMap<String, Value>,
}

pub(crate) fn compile_document(document: &Value) -> Result<Rule, RuleDefinitionError> {
    let doc = RuleDocument::deserialize(document).map_err(|e| RuleDefinitionError::Malformed {
        reason: e.to_string(),
    })?;

    let rule_id = doc.rule_id.ok_or(RuleDefinitionError::MissingRuleId)?;
    let conditions = doc
        .conditions
        .ok_or_else(|| RuleDefinitionError::MissingCondition {
            rule: rule_id.clone(),
        })?;
    let conditions = condition_from_json(&conditions, ROOT_PATH)?;
    let actions = doc
        .actions
        .iter()
        .map(action_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    let mut metadata: BTreeMap<String, String> = doc
        .metadata
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, text)
        })
        .collect();
    if let Some(name) = doc.name {
        metadata.entry("name".to_owned()).or_insert(name);
    }

    let rule = Rule {
        rule_id,
        priority: doc.priority,
        conditions,
        actions,
        metadata,
    };
    validate(&rule)?;
    Ok(rule)
}

fn condition_from_json(value: &Value, path: &str) -> Result<ConditionNode, RuleDefinitionError> {
    match value {
        Value::String(text) => Ok(crate::parse::parse_condition(text)?),
        Value::Array(items) => Ok(ConditionNode::Group {
            combinator: Combinator::And,
            children: children_from_json(items, path)?,
        }),
        Value::Object(obj) if obj.contains_key("combinator") => group_from_json(obj, path),
        Value::Object(obj) => leaf_from_json(obj, path).map(ConditionNode::Leaf),
        other => Err(RuleDefinitionError::Malformed {
            reason: format!(
                "condition at '{path}' must be an object, array or expression string, got {other}"
            ),
        }),
    }
}

fn children_from_json(
    items: &[Value],
    path: &str,
) -> Result<Vec<ConditionNode>, RuleDefinitionError> {
    if items.is_empty() {
        return Err(RuleDefinitionError::EmptyGroup {
            path: path.to_owned(),
        });
    }
    items
        .iter()
        .enumerate()
        .map(|(i, child)| condition_from_json(child, &child_path(path, i)))
        .collect()
}

fn group_from_json(obj: &Map<String, Value>, path: &str) -> Result<ConditionNode, RuleDefinitionError> {
    let raw = obj
        .get("combinator")
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
        .unwrap_or_default();
    let combinator = obj
        .get("combinator")
        .and_then(Value::as_str)
        .and_then(Combinator::from_name)
        .ok_or_else(|| RuleDefinitionError::UnknownCombinator {
            path: path.to_owned(),
            combinator: raw,
        })?;
    let children = match obj.get("children") {
        Some(Value::Array(items)) => children_from_json(items, path)?,
        Some(_) => {
            return Err(RuleDefinitionError::Malformed {
                reason: format!("'children' at '{path}' must be an array"),
            })
        }
        None => {
            return Err(RuleDefinitionError::EmptyGroup {
                path: path.to_owned(),
            })
        }
    };
    Ok(ConditionNode::Group {
        combinator,
        children,
    })
}

fn leaf_from_json(obj: &Map<String, Value>, path: &str) -> Result<Condition, RuleDefinitionError> {
    let field = obj
        .get("field")
        .or_else(|| obj.get("attribute"))
        .and_then(Value::as_str)
        .ok_or_else(|| RuleDefinitionError::Malformed {
            reason: format!("condition at '{path}' needs a 'field' string or a 'combinator'"),
        })?;
    let operator_name = obj.get("operator").and_then(Value::as_str).ok_or_else(|| {
        RuleDefinitionError::Malformed {
            reason: format!("condition at '{path}' needs an 'operator' string"),
        }
    })?;
    let operator =
        Operator::from_name(operator_name).ok_or_else(|| RuleDefinitionError::UnknownOperator {
            path: path.to_owned(),
            operator: operator_name.to_owned(),
        })?;
    let operand = operand_for(field, operator, obj.get("value"))?;
    Ok(Condition {
        field: field.to_owned(),
        operator,
        operand,
    })
}

/// Shape the raw `value` according to what the operator expects.
fn operand_for(
    field: &str,
    operator: Operator,
    value: Option<&Value>,
) -> Result<Operand, RuleDefinitionError> {
    match (operator, value) {
        (op, _) if op.is_nullary() => Ok(Operand::Absent),
        (Operator::In | Operator::NotIn, Some(Value::Array(items))) => {
            Ok(Operand::Set(items.clone()))
        }
        (Operator::In | Operator::NotIn, _) => Err(RuleDefinitionError::SetRequired {
            field: field.to_owned(),
            operator,
        }),
        (Operator::Between, Some(Value::Array(items))) if items.len() == 2 => {
            Ok(Operand::Pair(items[0].clone(), items[1].clone()))
        }
        (Operator::Between, _) => Err(RuleDefinitionError::RangeRequiresPair {
            field: field.to_owned(),
        }),
        (_, None | Some(Value::Null)) => Err(RuleDefinitionError::MissingOperand {
            field: field.to_owned(),
            operator,
        }),
        (_, Some(v)) => Ok(Operand::Scalar(v.clone())),
    }
}

fn action_from_json(value: &Value) -> Result<Action, RuleDefinitionError> {
    let Value::Object(obj) = value else {
        return Err(RuleDefinitionError::Malformed {
            reason: format!("action must be an object, got {value}"),
        });
    };
    if obj.contains_key("action") || obj.contains_key("params") {
        return legacy_action_from_json(obj);
    }

    let kind_name = obj
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| RuleDefinitionError::Malformed {
            reason: "action needs a 'kind' string".to_owned(),
        })?;
    let kind = ActionKind::from_name(kind_name).ok_or_else(|| {
        RuleDefinitionError::UnknownActionKind {
            kind: kind_name.to_owned(),
        }
    })?;
    let target_field = match (obj.get("target_field").and_then(Value::as_str), kind) {
        (Some(target), _) => target.to_owned(),
        (None, ActionKind::MarkOutOfPolicy) => OUT_OF_POLICY_FLAG.to_owned(),
        (None, _) => return Err(RuleDefinitionError::MissingTarget { kind }),
    };
    let amount_or_value = match (obj.get("amount_or_value"), kind) {
        (Some(v), _) => v.clone(),
        (None, ActionKind::AddMetadataFlag | ActionKind::MarkOutOfPolicy) => Value::Bool(true),
        (None, _) => Value::Null,
    };
    Ok(Action {
        kind,
        target_field,
        amount_or_value,
    })
}

/// Older documents use `{"action": ..., "params": {...}}`.
fn legacy_action_from_json(obj: &Map<String, Value>) -> Result<Action, RuleDefinitionError> {
    let name = obj.get("action").and_then(Value::as_str).unwrap_or_default();
    let empty = Map::new();
    let params = obj.get("params").and_then(Value::as_object).unwrap_or(&empty);
    let target = params
        .get("field")
        .and_then(Value::as_str)
        .unwrap_or(LEGACY_PRICE_FIELD)
        .to_owned();

    let kind = match name {
        "apply_discount" => match params.get("type").and_then(Value::as_str) {
            None | Some("percent") => ActionKind::ApplyDiscountPercent,
            Some("fixed" | "amount") => ActionKind::ApplyDiscountAmount,
            Some(other) => {
                return Err(RuleDefinitionError::UnknownActionKind {
                    kind: format!("apply_discount/{other}"),
                })
            }
        },
        "override_price" => ActionKind::OverridePrice,
        "set_field" if params.contains_key("field") => ActionKind::SetField,
        "set_field" => {
            return Err(RuleDefinitionError::MissingTarget {
                kind: ActionKind::SetField,
            })
        }
        "mark_out_of_policy" => return Ok(Action::mark_out_of_policy()),
        other => match ActionKind::from_name(other) {
            Some(kind) => kind,
            None => {
                return Err(RuleDefinitionError::UnknownActionKind {
                    kind: other.to_owned(),
                })
            }
        },
    };
    Ok(Action {
        kind,
        target_field: target,
        amount_or_value: params.get("value").cloned().unwrap_or(Value::Null),
    })
}

/// Check the structural invariants of a rule, whatever its origin.
pub(crate) fn validate(rule: &Rule) -> Result<(), RuleDefinitionError> {
    if rule.rule_id.trim().is_empty() {
        return Err(RuleDefinitionError::EmptyRuleId);
    }
    validate_node(&rule.conditions, ROOT_PATH)?;
    rule.actions.iter().try_for_each(validate_action)
}

fn validate_node(node: &ConditionNode, path: &str) -> Result<(), RuleDefinitionError> {
    match node {
        ConditionNode::Leaf(leaf) => validate_leaf(leaf),
        ConditionNode::Group { children, .. } => {
            if children.is_empty() {
                return Err(RuleDefinitionError::EmptyGroup {
                    path: path.to_owned(),
                });
            }
            children
                .iter()
                .enumerate()
                .try_for_each(|(i, child)| validate_node(child, &child_path(path, i)))
        }
    }
}

fn validate_leaf(leaf: &Condition) -> Result<(), RuleDefinitionError> {
    if !is_valid_path(&leaf.field) {
        return Err(RuleDefinitionError::InvalidFieldPath {
            path: leaf.field.clone(),
        });
    }
    let field = leaf.field.clone();
    match (leaf.operator, &leaf.operand) {
        (op, _) if op.is_nullary() => Ok(()),
        (Operator::In | Operator::NotIn, Operand::Set(_)) => Ok(()),
        (Operator::In | Operator::NotIn, _) => Err(RuleDefinitionError::SetRequired {
            field,
            operator: leaf.operator,
        }),
        (Operator::Between, Operand::Pair(..)) => Ok(()),
        (Operator::Between, _) => Err(RuleDefinitionError::RangeRequiresPair { field }),
        (_, Operand::Scalar(v)) if !v.is_null() => Ok(()),
        (operator, _) => Err(RuleDefinitionError::MissingOperand { field, operator }),
    }
}

fn validate_action(action: &Action) -> Result<(), RuleDefinitionError> {
    if !is_valid_path(&action.target_field) {
        return Err(RuleDefinitionError::InvalidFieldPath {
            path: action.target_field.clone(),
        });
    }
    if action.kind.is_numeric() && as_number(&action.amount_or_value).is_none() {
        return Err(RuleDefinitionError::NonNumericAmount {
            kind: action.kind,
            value: display(&action.amount_or_value),
        });
    }
    Ok(())
}

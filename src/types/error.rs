use serde::Serialize;
use thiserror::Error;

use super::action::ActionKind;
use super::condition::Operator;

/// A rule document that cannot be executed. Fatal for that rule; no action
/// is applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleDefinitionError {
    #[error("malformed rule document: {reason}")]
    Malformed { reason: String },

    #[error("rule document has no 'rule_id'")]
    MissingRuleId,

    #[error("rule_id must not be empty")]
    EmptyRuleId,

    #[error("rule '{rule}' has no conditions")]
    MissingCondition { rule: String },

    #[error("condition group at '{path}' has no children")]
    EmptyGroup { path: String },

    #[error("unknown combinator '{combinator}' at '{path}'")]
    UnknownCombinator { path: String, combinator: String },

    #[error("unknown operator '{operator}' at '{path}'")]
    UnknownOperator { path: String, operator: String },

    #[error("unknown action kind '{kind}'")]
    UnknownActionKind { kind: String },

    #[error("invalid field path '{path}'")]
    InvalidFieldPath { path: String },

    #[error("operator '{operator}' on '{field}' requires a value")]
    MissingOperand { field: String, operator: Operator },

    #[error("operator 'between' on '{field}' requires a two-element [low, high] value")]
    RangeRequiresPair { field: String },

    #[error("operator '{operator}' on '{field}' requires an array of values")]
    SetRequired { field: String, operator: Operator },

    #[error("action '{kind}' requires a numeric amount, got {value}")]
    NonNumericAmount { kind: ActionKind, value: String },

    #[error("action '{kind}' requires a 'target_field'")]
    MissingTarget { kind: ActionKind },

    #[error(transparent)]
    Expression(#[from] crate::parse::ParseError),
}

/// A non-fatal problem met while evaluating a condition leaf. The leaf
/// evaluates to `false` and the issue is carried in its diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionIssue {
    #[error("field '{path}' not found in payload")]
    FieldNotFound { path: String },

    #[error("type mismatch: '{operator}' cannot compare {found} on '{field}'")]
    TypeMismatch {
        field: String,
        operator: Operator,
        found: &'static str,
    },

    #[error("invalid range [{low}, {high}] on '{field}': low bound exceeds high bound")]
    InvalidRange {
        field: String,
        low: String,
        high: String,
    },
}

/// An action that cannot be applied. Aborts the whole execution; the caller
/// never sees a partially updated payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("invalid amount {amount} for '{kind}': {reason}")]
    InvalidAmount {
        kind: ActionKind,
        amount: f64,
        reason: &'static str,
    },

    #[error("'{kind}' target '{field}' must be a numeric field, found {found}")]
    NonNumericTarget {
        kind: ActionKind,
        field: String,
        found: &'static str,
    },

    #[error("cannot write to '{path}'")]
    InvalidTargetPath { path: String },
}

/// Failure of a single rule execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    RuleDefinition(#[from] RuleDefinitionError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

use serde_json::Value;
use tracing::debug;

use crate::apply::apply;
use crate::evaluate::evaluate;
use crate::{ExecutionError, ExecutionResult, Rule};

/// Execute one rule against one payload.
///
/// The rule is validated first. If its condition tree does not match, the
/// result carries an unchanged copy of the payload and the leaf that decided
/// the outcome. If it matches, the actions are applied in order to a copy of
/// the payload. The caller's payload is never modified.
///
/// # Errors
///
/// Returns [`ExecutionError::RuleDefinition`] for a malformed rule and
/// [`ExecutionError::Action`] when an action cannot be applied. In both cases
/// no updated payload is produced.
pub fn execute(rule: &Rule, payload: &Value) -> Result<ExecutionResult, ExecutionError> {
    rule.validate()?;

    let (matched, failure) = evaluate(&rule.conditions, payload);
    if !matched {
        debug!(
            rule_id = %rule.rule_id,
            failed_at = failure.as_ref().map(|f| f.path.as_str()),
            "rule did not match"
        );
        return Ok(ExecutionResult::not_matched(&rule.rule_id, failure, payload));
    }

    let (updated, applied) = apply(&rule.actions, payload)?;
    debug!(rule_id = %rule.rule_id, actions = applied.len(), "rule matched");
    Ok(ExecutionResult::matched(&rule.rule_id, applied, updated))
}

/// Validate a JSON rule document and execute it against a payload.
///
/// # Errors
///
/// Same as [`execute()`], plus intake failures of the rule document.
pub fn execute_document(rule: &Value, payload: &Value) -> Result<ExecutionResult, ExecutionError> {
    let rule = Rule::from_value(rule)?;
    execute(&rule, payload)
}

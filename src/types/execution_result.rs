use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::action::AppliedAction;
use super::condition::Condition;
use super::error::ConditionIssue;

/// The condition leaf reported as the reason a rule did not match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedCondition {
    /// Location in the tree, e.g. `"conditions.children[1]"`.
    pub path: String,
    pub condition: Condition,
    pub diagnostic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<ConditionIssue>,
}

/// Outcome of executing one rule against one payload.
///
/// Built fresh per execution and immutable once returned. The explanation is
/// derived only from the inputs, so identical inputs yield identical results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[must_use]
pub struct ExecutionResult {
    matched: bool,
    failed_condition: Option<FailedCondition>,
    applied_actions: Vec<AppliedAction>,
    updated_payload: Value,
    explanation: String,
}

impl ExecutionResult {
    pub(crate) fn matched(
        rule_id: &str,
        applied_actions: Vec<AppliedAction>,
        updated_payload: Value,
    ) -> Self {
        let explanation = if applied_actions.is_empty() {
            format!("Rule {rule_id} matched; no actions to apply")
        } else {
            let effects: Vec<&str> = applied_actions.iter().map(|a| a.effect.as_str()).collect();
            format!("Rule {rule_id} matched and applied: {}", effects.join("; "))
        };
        Self {
            matched: true,
            failed_condition: None,
            applied_actions,
            updated_payload,
            explanation,
        }
    }

    pub(crate) fn not_matched(
        rule_id: &str,
        failed_condition: Option<FailedCondition>,
        payload: &Value,
    ) -> Self {
        let reason = failed_condition
            .as_ref()
            .map_or("no condition was satisfied", |f| f.diagnostic.as_str());
        let explanation = format!("Rule {rule_id} did not match: {reason}");
        Self {
            matched: false,
            failed_condition,
            applied_actions: Vec::new(),
            updated_payload: payload.clone(),
            explanation,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// The leaf that decided a non-match; `None` when the rule matched.
    #[must_use]
    pub fn failed_condition(&self) -> Option<&FailedCondition> {
        self.failed_condition.as_ref()
    }

    /// Applied actions in application order.
    #[must_use]
    pub fn applied_actions(&self) -> &[AppliedAction] {
        &self.applied_actions
    }

    /// The payload after all actions; a copy of the input when not matched.
    #[must_use]
    pub fn updated_payload(&self) -> &Value {
        &self.updated_payload
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Consume the result, keeping only the updated payload.
    #[must_use]
    pub fn into_payload(self) -> Value {
        self.updated_payload
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explanation)
    }
}

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::action::Action;
use super::condition::ConditionNode;
use super::error::{ExecutionError, RuleDefinitionError};
use super::execution_result::ExecutionResult;

/// A validated travel rule: when `conditions` hold for a payload, `actions`
/// are applied to it in order.
///
/// Rules are created from JSON documents with [`Rule::from_json()`] or built
/// programmatically with [`Rule::builder()`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub rule_id: String,
    /// Ordering hint when several rules are presented together; lower first.
    pub priority: i64,
    pub conditions: ConditionNode,
    pub actions: Vec<Action>,
    pub metadata: BTreeMap<String, String>,
}

impl Rule {
    /// Start building a rule with the given id.
    ///
    /// # Example
    ///
    /// ```
    /// use farerule::{field, Action, Rule};
    ///
    /// let rule = Rule::builder("early_bird")
    ///     .priority(1)
    ///     .when(field("days_before_travel").gte(30))
    ///     .then(Action::discount_percent("price", 10.0))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(rule.actions.len(), 1);
    /// ```
    #[must_use]
    pub fn builder(rule_id: &str) -> RuleBuilder {
        RuleBuilder {
            rule_id: rule_id.to_owned(),
            priority: 0,
            conditions: None,
            actions: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Parse and validate a JSON rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError`] if the document is malformed.
    pub fn from_json(input: &str) -> Result<Self, RuleDefinitionError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| RuleDefinitionError::Malformed {
                reason: e.to_string(),
            })?;
        Self::from_value(&value)
    }

    /// Validate an already-parsed JSON rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError`] if the document is malformed.
    pub fn from_value(document: &Value) -> Result<Self, RuleDefinitionError> {
        crate::compile::compile_document(document)
    }

    /// Read a JSON rule document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`FareRuleError`](crate::FareRuleError) on I/O or definition failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FareRuleError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    /// Check the structural invariants of a programmatically assembled rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleDefinitionError`] found.
    pub fn validate(&self) -> Result<(), RuleDefinitionError> {
        crate::compile::validate(self)
    }

    /// Execute this rule against a payload. See [`execute()`](crate::execute()).
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] if the rule is malformed or an action fails.
    pub fn execute(&self, payload: &Value) -> Result<ExecutionResult, ExecutionError> {
        crate::execute::execute(self, payload)
    }
}

/// Builder returned by [`Rule::builder()`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    rule_id: String,
    priority: i64,
    conditions: Option<ConditionNode>,
    actions: Vec<Action>,
    metadata: BTreeMap<String, String>,
}

impl RuleBuilder {
    #[must_use]
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Set the condition tree. Calling again replaces it.
    #[must_use]
    pub fn when(mut self, conditions: ConditionNode) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Append an action; actions run in the order they were added.
    #[must_use]
    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Validate and produce the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleDefinitionError::MissingCondition`] if `.when()` was never
    /// called, or any other structural violation.
    pub fn build(self) -> Result<Rule, RuleDefinitionError> {
        let conditions = self
            .conditions
            .ok_or_else(|| RuleDefinitionError::MissingCondition {
                rule: self.rule_id.clone(),
            })?;
        let rule = Rule {
            rule_id: self.rule_id,
            priority: self.priority,
            conditions,
            actions: self.actions,
            metadata: self.metadata,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Stable ascending sort by priority; rules with equal priority keep their order.
pub fn sort_by_priority(rules: &mut [Rule]) {
    rules.sort_by_key(|r| r.priority);
}

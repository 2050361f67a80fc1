use super::{Policy, PolicyContext, PolicyOutcome};
use crate::evaluate::evaluate;
use crate::ConditionNode;

/// A policy defined by a condition tree: a payload matching the tree is out
/// of policy, with `rationale` as the reason.
///
/// ```
/// use farerule::field;
/// use farerule::policy::{ConditionPolicy, Policy, PolicyContext};
/// use serde_json::json;
///
/// let policy = ConditionPolicy::new(
///     field("hotel.star_rating").gte(4).and(field("trip_type").eq("day_trip")),
///     "overnight hotel booked for a day trip",
/// );
/// let payload = json!({"hotel": {"star_rating": 4}, "trip_type": "day_trip"});
/// assert!(!policy.check(&PolicyContext::new(&payload, None)).is_in_policy());
/// ```
#[derive(Debug, Clone)]
pub struct ConditionPolicy {
    conditions: ConditionNode,
    rationale: String,
}

impl ConditionPolicy {
    #[must_use]
    pub fn new(conditions: ConditionNode, rationale: impl Into<String>) -> Self {
        Self {
            conditions,
            rationale: rationale.into(),
        }
    }

    /// Build from the compact condition syntax, e.g. `"cabin_class == \"first\""`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`](crate::parse::ParseError) if the expression is invalid.
    pub fn parse(
        expression: &str,
        rationale: impl Into<String>,
    ) -> Result<Self, crate::parse::ParseError> {
        Ok(Self::new(crate::parse::parse_condition(expression)?, rationale))
    }
}

impl Policy for ConditionPolicy {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        let (matched, failure) = evaluate(&self.conditions, ctx.payload());
        if matched {
            return PolicyOutcome::OutOfPolicy(self.rationale.clone());
        }
        let reason = failure.map_or_else(
            || "policy conditions not met".to_owned(),
            |f| format!("policy conditions not met: {}", f.diagnostic),
        );
        PolicyOutcome::InPolicy(reason)
    }
}

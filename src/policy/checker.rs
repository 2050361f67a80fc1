use serde_json::Value;
use tracing::debug;

use super::{PolicyContext, PolicyError, PolicyOutcome, PolicyRegistry};
use crate::{ExecutionResult, PolicyVerdict};

/// Checks payloads against the policies of a registry.
///
/// Policies are judged against the execution result's updated payload when a
/// result is supplied, otherwise against the payload itself. Each verdict is
/// independent of the others and of whether a rule matched.
///
/// ```
/// use farerule::policy::{PolicyChecker, PolicyConfig, PolicyRegistry};
/// use serde_json::json;
///
/// let checker = PolicyChecker::new(PolicyRegistry::with_builtins(&PolicyConfig::default()));
/// let payload = json!({
///     "price": 120,
///     "flight_options": [{"price": 100, "is_direct": true}]
/// });
/// let verdict = checker.check("not_cheapest_direct", &payload, None).unwrap();
/// assert!(!verdict.in_policy());
/// ```
#[derive(Debug)]
pub struct PolicyChecker {
    registry: PolicyRegistry,
}

impl PolicyChecker {
    #[must_use]
    pub fn new(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Check a single named policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownPolicy`] if no policy has that name.
    pub fn check(
        &self,
        policy_name: &str,
        payload: &Value,
        result: Option<&ExecutionResult>,
    ) -> Result<PolicyVerdict, PolicyError> {
        let policy = self
            .registry
            .get(policy_name)
            .ok_or_else(|| PolicyError::UnknownPolicy {
                name: policy_name.to_owned(),
            })?;
        let outcome = policy.check(&PolicyContext::new(payload, result));
        Ok(verdict(policy_name, outcome))
    }

    /// Check several named policies, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::UnknownPolicy`] for the first unknown name; no
    /// verdicts are returned in that case.
    pub fn check_many<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
        payload: &Value,
        result: Option<&ExecutionResult>,
    ) -> Result<Vec<PolicyVerdict>, PolicyError> {
        names
            .into_iter()
            .map(|name| self.check(name, payload, result))
            .collect()
    }

    /// Check every registered policy, in name order.
    #[must_use]
    pub fn check_all(&self, payload: &Value, result: Option<&ExecutionResult>) -> Vec<PolicyVerdict> {
        let ctx = PolicyContext::new(payload, result);
        self.registry
            .iter()
            .map(|(name, policy)| verdict(name, policy.check(&ctx)))
            .collect()
    }
}

fn verdict(name: &str, outcome: PolicyOutcome) -> PolicyVerdict {
    let verdict = match outcome {
        PolicyOutcome::InPolicy(reason) => PolicyVerdict::new(name, true, reason),
        PolicyOutcome::OutOfPolicy(reason) => PolicyVerdict::new(name, false, reason),
    };
    debug!(policy = name, in_policy = verdict.in_policy(), reason = verdict.reason(), "policy checked");
    verdict
}

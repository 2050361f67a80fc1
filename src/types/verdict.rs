use std::fmt;

use serde::Serialize;

/// Compliance verdict of one named policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct PolicyVerdict {
    policy_name: String,
    in_policy: bool,
    reason: String,
}

impl fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.in_policy {
            "IN POLICY"
        } else {
            "OUT OF POLICY"
        };
        write!(f, "{}: {status} ({})", self.policy_name, self.reason)
    }
}

impl PolicyVerdict {
    pub fn new(policy_name: impl Into<String>, in_policy: bool, reason: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            in_policy,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    #[must_use]
    pub fn in_policy(&self) -> bool {
        self.in_policy
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

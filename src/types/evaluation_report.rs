use std::fmt;

use super::execution_result::FailedCondition;

/// Detailed condition-tree evaluation returned by
/// [`evaluate_detailed()`](crate::evaluate_detailed).
///
/// Contains the overall match, the reported failure, and the paths of the
/// leaves that were actually evaluated, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ConditionReport {
    matched: bool,
    failure: Option<FailedCondition>,
    evaluated: Vec<String>,
}

impl ConditionReport {
    pub(crate) fn new(
        matched: bool,
        failure: Option<FailedCondition>,
        evaluated: Vec<String>,
    ) -> Self {
        Self {
            matched,
            failure,
            evaluated,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FailedCondition> {
        self.failure.as_ref()
    }

    /// Paths of evaluated leaves. Leaves skipped by short-circuiting are absent.
    #[must_use]
    pub fn evaluated(&self) -> &[String] {
        &self.evaluated
    }
}

impl fmt::Display for ConditionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matched: {}", self.matched)?;
        if let Some(failure) = &self.failure {
            write!(f, ", failed at {}: {}", failure.path, failure.diagnostic)?;
        }
        write!(f, ", evaluated: [{}]", self.evaluated.join(", "))
    }
}

//! Travel-policy compliance checks.
//!
//! A policy is an independent, named predicate over a booking payload and,
//! optionally, the result of executing a rule against it. Policies are held
//! in a [`PolicyRegistry`] built at startup and passed explicitly to a
//! [`PolicyChecker`]. Verdicts do not depend on whether any rule matched.

mod builtin;
mod checker;
mod condition;
mod config;
mod registry;

use serde_json::Value;
use thiserror::Error;

use crate::ExecutionResult;

pub use builtin::{
    BUSINESS_CLASS_REQUIRES_LONG_HAUL, BusinessClassRequiresLongHaul, MAX_DISCOUNT_CAP,
    MaxDiscountCap, NO_LUXURY_HOTEL_FOR_JUNIORS, NOT_CHEAPEST_DIRECT, NoLuxuryHotelForJuniors,
    NotCheapestDirect, RULE_MARKED_OUT_OF_POLICY, RuleMarkedOutOfPolicy,
};
pub use checker::PolicyChecker;
pub use condition::ConditionPolicy;
pub use config::{ConfigError, PolicyConfig};
pub use registry::PolicyRegistry;

/// Failure of a policy lookup or registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("unknown policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("policy '{name}' is already registered")]
    DuplicatePolicy { name: String },
}

/// What a policy sees when it is checked.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    /// The payload as given by the caller.
    pub original: &'a Value,
    /// The execution result, when the check follows a rule execution.
    pub result: Option<&'a ExecutionResult>,
}

impl<'a> PolicyContext<'a> {
    #[must_use]
    pub fn new(original: &'a Value, result: Option<&'a ExecutionResult>) -> Self {
        Self { original, result }
    }

    /// The payload policies judge: the updated payload when a result is
    /// present, otherwise the original.
    #[must_use]
    pub fn payload(&self) -> &'a Value {
        self.result
            .map_or(self.original, ExecutionResult::updated_payload)
    }
}

/// Decision of one policy, with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    InPolicy(String),
    OutOfPolicy(String),
}

impl PolicyOutcome {
    #[must_use]
    pub fn is_in_policy(&self) -> bool {
        matches!(self, Self::InPolicy(_))
    }
}

/// A named compliance predicate.
///
/// Implemented for any `Fn(&PolicyContext) -> PolicyOutcome`, so closures can
/// be registered directly.
pub trait Policy: Send + Sync {
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome;
}

impl<F> Policy for F
where
    F: Fn(&PolicyContext<'_>) -> PolicyOutcome + Send + Sync,
{
    fn check(&self, ctx: &PolicyContext<'_>) -> PolicyOutcome {
        self(ctx)
    }
}

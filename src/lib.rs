//! Rule execution for travel bookings.
//!
//! A [`Rule`] pairs a condition tree with an ordered list of actions. Executing
//! it against a JSON booking payload decides whether the rule applies, applies
//! its actions to a copy of the payload and explains the outcome. The
//! [`policy`] module judges payloads against named compliance policies.
//!
//! ```
//! use farerule::{field, Action, Rule};
//! use serde_json::json;
//!
//! let rule = Rule::builder("early_bird")
//!     .when(field("days_before_travel").gte(30))
//!     .then(Action::discount_percent("price", 10.0))
//!     .build()
//!     .unwrap();
//!
//! let result = rule.execute(&json!({"days_before_travel": 45, "price": 200})).unwrap();
//! assert!(result.is_matched());
//! assert_eq!(result.updated_payload()["price"], 180);
//! assert_eq!(result.explanation(), "Rule early_bird matched and applied: price 200 -> 180");
//! ```

mod apply;
mod compile;
mod error;
mod evaluate;
mod execute;
pub mod parse;
pub mod policy;
mod types;

pub use apply::apply;
pub use error::FareRuleError;
pub use evaluate::{LeafOutcome, evaluate, evaluate_detailed, evaluate_leaf};
pub use execute::{execute, execute_document};
pub use parse::parse_condition;
pub use types::payload::get_path;
pub use types::{
    Action, ActionError, ActionKind, AppliedAction, Combinator, Condition, ConditionIssue,
    ConditionNode, ConditionReport, ExecutionError, ExecutionResult, FailedCondition,
    FieldCondition, METADATA_ROOT, OUT_OF_POLICY_FLAG, Operand, Operator, PolicyVerdict, Rule,
    RuleBuilder, RuleDefinitionError, all, any, field, sort_by_priority,
};

mod action;
mod condition;
mod error;
mod evaluation_report;
mod execution_result;
pub mod payload;
mod rule;
pub mod value;
mod verdict;

pub use action::{Action, ActionKind, AppliedAction, METADATA_ROOT, OUT_OF_POLICY_FLAG};
pub use condition::{
    Combinator, Condition, ConditionNode, FieldCondition, Operand, Operator, all, any, field,
};
pub use error::{ActionError, ConditionIssue, ExecutionError, RuleDefinitionError};
pub use evaluation_report::ConditionReport;
pub use execution_result::{ExecutionResult, FailedCondition};
pub use rule::{Rule, RuleBuilder, sort_by_priority};
pub use verdict::PolicyVerdict;

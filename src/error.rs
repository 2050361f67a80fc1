use thiserror::Error;

use crate::parse::ParseError;
use crate::policy::{ConfigError, PolicyError};
use crate::{ActionError, ExecutionError, RuleDefinitionError};

/// Unified error type covering intake, execution, policy checks and I/O.
///
/// Returned by convenience entry points like [`Rule::from_file()`](crate::Rule::from_file)
/// and used by the `farerule` binary.
#[derive(Debug, Error)]
pub enum FareRuleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    RuleDefinition(#[from] RuleDefinitionError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ExecutionError> for FareRuleError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::RuleDefinition(e) => Self::RuleDefinition(e),
            ExecutionError::Action(e) => Self::Action(e),
        }
    }
}

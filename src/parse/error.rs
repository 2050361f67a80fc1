use thiserror::Error;

/// A condition expression that could not be parsed.
///
/// `offset` is the byte position in the input where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "unexpected input".to_owned()
        } else {
            message
        };
        Self { offset, message }
    }
}

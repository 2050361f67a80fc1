mod error;
mod grammar;

pub use error::ParseError;

use crate::ConditionNode;

/// Parse a compact condition expression into a [`ConditionNode`].
///
/// ```
/// use farerule::parse::parse_condition;
///
/// let node = parse_condition(r#"product_type == "flight" AND days_before_travel >= 30"#).unwrap();
/// assert_eq!(node.leaf_count(), 2);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid expression.
pub fn parse_condition(input: &str) -> Result<ConditionNode, ParseError> {
    use winnow::Parser;
    grammar::parse_condition
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.inner().to_string()))
}

use serde_json::Value;
use winnow::combinator::{
    alt, cut_err, delimited, not, opt, preceded, repeat, separated, terminated,
};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{Combinator, Condition, ConditionNode, Operand, Operator};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

/// `AND`/`and` style keyword that must not run into a following identifier.
fn keyword<'i>(
    upper: &'static str,
    lower: &'static str,
) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    terminated(alt((upper, lower)), not(one_of(is_ident_char)))
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ws.parse_next(input)?;
    take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_').parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (
        opt('-'),
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .parse_next(input)?;
    if text.contains('.') {
        let f: f64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::from(f))
    } else {
        let i: i64 = text
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::from(i))
    }
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        "null".value(Value::Null),
        number,
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

fn list(input: &mut &str) -> ModalResult<Vec<Value>> {
    ws.parse_next(input)?;
    let items: Vec<Value> = delimited('[', separated(0.., literal, (ws, ',')), (ws, ']'))
        .context(StrContext::Expected(StrContextValue::Description(
            "[value, ...] list",
        )))
        .parse_next(input)?;
    Ok(items)
}

fn range(input: &mut &str) -> ModalResult<(Value, Value)> {
    ws.parse_next(input)?;
    delimited('[', (literal, preceded((ws, ','), literal)), (ws, ']'))
        .context(StrContext::Expected(StrContextValue::Description(
            "[low, high] range",
        )))
        .parse_next(input)
}

// -- Operators --------------------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<Operator> {
    ws.parse_next(input)?;
    alt((
        ">=".value(Operator::Gte),
        ">".value(Operator::Gt),
        "<=".value(Operator::Lte),
        "<".value(Operator::Lt),
        "==".value(Operator::Eq),
        "!=".value(Operator::Neq),
    ))
    .parse_next(input)
}

/// Word operators: `in`, `not in`, `between`, `contains`, `is null`, `is not null`.
fn word_predicate(input: &mut &str) -> ModalResult<(Operator, Operand)> {
    match word.parse_next(input)? {
        "in" => Ok((Operator::In, Operand::Set(cut_err(list).parse_next(input)?))),
        "not" => {
            cut_err(preceded(ws, "in")).parse_next(input)?;
            Ok((Operator::NotIn, Operand::Set(cut_err(list).parse_next(input)?)))
        }
        "between" => {
            let (low, high) = cut_err(range).parse_next(input)?;
            Ok((Operator::Between, Operand::Pair(low, high)))
        }
        "contains" => Ok((
            Operator::Contains,
            Operand::Scalar(cut_err(literal).parse_next(input)?),
        )),
        "is" => {
            let negated = opt(preceded(ws, "not")).parse_next(input)?.is_some();
            cut_err(preceded(ws, "null")).parse_next(input)?;
            let operator = if negated {
                Operator::IsNotNull
            } else {
                Operator::IsNull
            };
            Ok((operator, Operand::Absent))
        }
        _ => Err(ErrMode::from_input(input).cut()),
    }
}

fn predicate(input: &mut &str) -> ModalResult<(Operator, Operand)> {
    if let Some(op) = opt(compare_op).parse_next(input)? {
        let value = cut_err(literal).parse_next(input)?;
        return Ok((op, Operand::Scalar(value)));
    }
    word_predicate
        .context(StrContext::Expected(StrContextValue::Description(
            "operator",
        )))
        .parse_next(input)
}

// -- Expressions (precedence: OR < AND < primary) ---------------------------

fn comparison(input: &mut &str) -> ModalResult<ConditionNode> {
    let name = ident.parse_next(input)?;
    let (operator, operand) = cut_err(predicate).parse_next(input)?;
    Ok(ConditionNode::Leaf(Condition {
        field: name.to_owned(),
        operator,
        operand,
    }))
}

fn primary(input: &mut &str) -> ModalResult<ConditionNode> {
    ws.parse_next(input)?;
    alt((delimited('(', expr, (ws, cut_err(')'))), comparison))
        .context(StrContext::Expected(StrContextValue::Description(
            "condition",
        )))
        .parse_next(input)
}

/// A chain of the same combinator becomes one group, in source order.
fn chain(combinator: Combinator, first: ConditionNode, rest: Vec<ConditionNode>) -> ConditionNode {
    if rest.is_empty() {
        return first;
    }
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(first);
    children.extend(rest);
    ConditionNode::Group {
        combinator,
        children,
    }
}

fn and_expr(input: &mut &str) -> ModalResult<ConditionNode> {
    let first = primary(input)?;
    let rest: Vec<ConditionNode> =
        repeat(0.., preceded((ws, keyword("AND", "and")), cut_err(primary))).parse_next(input)?;
    Ok(chain(Combinator::And, first, rest))
}

fn or_expr(input: &mut &str) -> ModalResult<ConditionNode> {
    let first = and_expr(input)?;
    let rest: Vec<ConditionNode> =
        repeat(0.., preceded((ws, keyword("OR", "or")), cut_err(and_expr))).parse_next(input)?;
    Ok(chain(Combinator::Or, first, rest))
}

fn expr(input: &mut &str) -> ModalResult<ConditionNode> {
    ws.parse_next(input)?;
    or_expr(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_condition(input: &mut &str) -> ModalResult<ConditionNode> {
    let node = expr(input)?;
    ws.parse_next(input)?;
    Ok(node)
}

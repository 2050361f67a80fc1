use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::value::display;

/// Comparison operators supported in condition leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Between,
    Contains,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// Resolve an operator by its canonical name or symbolic alias (`>=`, `==`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "eq" | "==" | "=" => Self::Eq,
            "neq" | "!=" | "<>" => Self::Neq,
            "lt" | "<" => Self::Lt,
            "lte" | "<=" => Self::Lte,
            "gt" | ">" => Self::Gt,
            "gte" | ">=" => Self::Gte,
            "in" => Self::In,
            "not_in" | "not in" => Self::NotIn,
            "between" => Self::Between,
            "contains" => Self::Contains,
            "is_null" => Self::IsNull,
            "is_not_null" => Self::IsNotNull,
            _ => return None,
        })
    }

    /// Canonical document name, e.g. `"not_in"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Between => "between",
            Self::Contains => "contains",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
        }
    }

    /// Whether the operator takes no operand.
    #[must_use]
    pub fn is_nullary(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Between => "between",
            Self::Contains => "contains",
            Self::IsNull => "is null",
            Self::IsNotNull => "is not null",
        };
        f.write_str(symbol)
    }
}

/// Boolean combinator of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "AND" | "ALL" => Some(Self::And),
            "OR" | "ANY" => Some(Self::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// The right-hand side of a condition leaf.
///
/// Serializes as the document's `value` key: a literal, a two-element array
/// for ranges, or an array for sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// No operand (`is_null`, `is_not_null`).
    Absent,
    Scalar(Value),
    /// Inclusive `[low, high]` range for `between`.
    Pair(Value, Value),
    /// Membership set for `in` / `not_in`.
    Set(Vec<Value>),
}

impl Operand {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Scalar(v) => f.write_str(&display(v)),
            Self::Pair(lo, hi) => write!(f, "[{}, {}]", display(lo), display(hi)),
            Self::Set(items) => {
                let parts: Vec<String> = items.iter().map(display).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// A single comparison of a payload field against an operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(rename = "value", skip_serializing_if = "Operand::is_absent")]
    pub operand: Operand,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand.is_absent() {
            write!(f, "{} {}", self.field, self.operator)
        } else {
            write!(f, "{} {} {}", self.field, self.operator, self.operand)
        }
    }
}

/// A node of the condition tree: a leaf comparison or a boolean group.
///
/// Groups evaluate their children in declared order; that order decides both
/// short-circuiting and which failure is reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionNode {
    Leaf(Condition),
    Group {
        combinator: Combinator,
        children: Vec<ConditionNode>,
    },
}

impl fmt::Display for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{leaf}"),
            Self::Group {
                combinator,
                children,
            } => {
                let parts: Vec<String> = children.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(&format!(" {combinator} ")))
            }
        }
    }
}

impl ConditionNode {
    /// Combine with AND. Chained calls extend a single group, keeping order.
    #[must_use]
    pub fn and(self, other: ConditionNode) -> ConditionNode {
        self.combine(Combinator::And, other)
    }

    /// Combine with OR. Chained calls extend a single group, keeping order.
    #[must_use]
    pub fn or(self, other: ConditionNode) -> ConditionNode {
        self.combine(Combinator::Or, other)
    }

    fn combine(self, with: Combinator, other: ConditionNode) -> ConditionNode {
        match self {
            ConditionNode::Group {
                combinator,
                mut children,
            } if combinator == with => {
                children.push(other);
                ConditionNode::Group {
                    combinator,
                    children,
                }
            }
            node => ConditionNode::Group {
                combinator: with,
                children: vec![node, other],
            },
        }
    }

    /// Number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }
}

/// AND group over `children`, in the given order.
#[must_use]
pub fn all(children: impl IntoIterator<Item = ConditionNode>) -> ConditionNode {
    ConditionNode::Group {
        combinator: Combinator::And,
        children: children.into_iter().collect(),
    }
}

/// OR group over `children`, in the given order.
#[must_use]
pub fn any(children: impl IntoIterator<Item = ConditionNode>) -> ConditionNode {
    ConditionNode::Group {
        combinator: Combinator::Or,
        children: children.into_iter().collect(),
    }
}

/// Intermediate builder for field conditions.
/// Created by [`field()`]; requires an operator method to produce a [`ConditionNode`].
#[derive(Debug, Clone)]
pub struct FieldCondition {
    path: String,
}

impl FieldCondition {
    fn leaf(self, operator: Operator, operand: Operand) -> ConditionNode {
        ConditionNode::Leaf(Condition {
            field: self.path,
            operator,
            operand,
        })
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Eq, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Neq, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Lt, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Lte, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Gt, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Gte, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn in_set<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> ConditionNode {
        let set = values.into_iter().map(Into::into).collect();
        self.leaf(Operator::In, Operand::Set(set))
    }

    #[must_use]
    pub fn not_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> ConditionNode {
        let set = values.into_iter().map(Into::into).collect();
        self.leaf(Operator::NotIn, Operand::Set(set))
    }

    #[must_use]
    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Between, Operand::Pair(low.into(), high.into()))
    }

    #[must_use]
    pub fn contains(self, value: impl Into<Value>) -> ConditionNode {
        self.leaf(Operator::Contains, Operand::Scalar(value.into()))
    }

    #[must_use]
    pub fn is_null(self) -> ConditionNode {
        self.leaf(Operator::IsNull, Operand::Absent)
    }

    #[must_use]
    pub fn is_not_null(self) -> ConditionNode {
        self.leaf(Operator::IsNotNull, Operand::Absent)
    }
}

#[must_use]
pub fn field(path: &str) -> FieldCondition {
    FieldCondition {
        path: path.to_owned(),
    }
}

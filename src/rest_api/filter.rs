//! # Condition Tree
//!
//! Boolean condition trees submitted in request bodies. A tree is a
//! [`ConditionGroup`] whose children are either nested groups or single
//! [`Condition`] leaves.
//!
//! Parsing validates the shape of every node, so a parsed tree can always be
//! rendered by the compiler.

use serde_json::Value;

use super::errors::CompileError;
use super::parser::render_scalar;

/// How the children of a group are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// Parse a conjunction name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("and") {
            Some(Conjunction::And)
        } else if name.eq_ignore_ascii_case("or") {
            Some(Conjunction::Or)
        } else {
            None
        }
    }

    /// SQL keyword
    pub fn as_sql(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// Condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Equal,
    SelectEquals,
    NotEqual,
    SelectNotEquals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Between,
    NotBetween,
    IsEmpty,
    IsNotEmpty,
    Like,
    NotLike,
    StartsWith,
    EndsWith,
    SelectAnyIn,
    SelectNotAnyIn,
}

impl OpCode {
    /// Look up an operator by its wire name
    pub fn parse(name: &str) -> Option<Self> {
        let op = match name {
            "equal" => OpCode::Equal,
            "select_equals" => OpCode::SelectEquals,
            "not_equal" => OpCode::NotEqual,
            "select_not_equals" => OpCode::SelectNotEquals,
            "less" => OpCode::Less,
            "less_or_equal" => OpCode::LessOrEqual,
            "greater" => OpCode::Greater,
            "greater_or_equal" => OpCode::GreaterOrEqual,
            "between" => OpCode::Between,
            "not_between" => OpCode::NotBetween,
            "is_empty" => OpCode::IsEmpty,
            "is_not_empty" => OpCode::IsNotEmpty,
            "like" => OpCode::Like,
            "not_like" => OpCode::NotLike,
            "starts_with" => OpCode::StartsWith,
            "ends_with" => OpCode::EndsWith,
            "select_any_in" => OpCode::SelectAnyIn,
            "select_not_any_in" => OpCode::SelectNotAnyIn,
            _ => return None,
        };
        Some(op)
    }

    /// Wire name of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            OpCode::Equal => "equal",
            OpCode::SelectEquals => "select_equals",
            OpCode::NotEqual => "not_equal",
            OpCode::SelectNotEquals => "select_not_equals",
            OpCode::Less => "less",
            OpCode::LessOrEqual => "less_or_equal",
            OpCode::Greater => "greater",
            OpCode::GreaterOrEqual => "greater_or_equal",
            OpCode::Between => "between",
            OpCode::NotBetween => "not_between",
            OpCode::IsEmpty => "is_empty",
            OpCode::IsNotEmpty => "is_not_empty",
            OpCode::Like => "like",
            OpCode::NotLike => "not_like",
            OpCode::StartsWith => "starts_with",
            OpCode::EndsWith => "ends_with",
            OpCode::SelectAnyIn => "select_any_in",
            OpCode::SelectNotAnyIn => "select_not_any_in",
        }
    }

    /// Shape the right operand must have for this operator
    fn arity(&self) -> Arity {
        match self {
            OpCode::Between | OpCode::NotBetween => Arity::Range,
            OpCode::SelectAnyIn | OpCode::SelectNotAnyIn => Arity::Set,
            OpCode::IsEmpty | OpCode::IsNotEmpty => Arity::Unary,
            _ => Arity::Scalar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Unary,
    Scalar,
    Range,
    Set,
}

/// Right-hand side of a condition, already rendered to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Unary operators take no value
    None,
    Scalar(String),
    Range(String, String),
    /// Never empty
    Set(Vec<String>),
}

/// A single comparison on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub op: OpCode,
    pub right: Operand,
}

/// AND/OR combination of conditions and nested groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionGroup {
    pub conjunction: Conjunction,
    pub children: Vec<ConditionNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionNode {
    Group(ConditionGroup),
    Leaf(Condition),
}

impl ConditionGroup {
    /// Parse a condition tree rooted at a group
    pub fn parse(value: &Value) -> Result<Self, CompileError> {
        let (conjunction, children) = match (value.get("conjunction"), value.get("children")) {
            (Some(conjunction), Some(children)) => (conjunction, children),
            _ => return Err(CompileError::NotAGroup),
        };

        let conjunction = match conjunction.as_str() {
            Some(name) => Conjunction::parse(name)
                .ok_or_else(|| CompileError::InvalidConjunction(name.to_string()))?,
            None => return Err(CompileError::InvalidConjunction(conjunction.to_string())),
        };

        let children = children
            .as_array()
            .ok_or(CompileError::NotAGroup)?
            .iter()
            .map(ConditionNode::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if children.is_empty() {
            return Err(CompileError::EmptyGroup);
        }

        Ok(Self {
            conjunction,
            children,
        })
    }
}

impl ConditionNode {
    /// A node with a `conjunction` field is a group, anything else must be a leaf
    pub fn parse(value: &Value) -> Result<Self, CompileError> {
        if value.get("conjunction").is_some() {
            return ConditionGroup::parse(value).map(ConditionNode::Group);
        }
        if value.get("op").is_some() && value.get("left").is_some() {
            return Condition::parse(value).map(ConditionNode::Leaf);
        }
        Err(CompileError::InvalidNode)
    }
}

impl Condition {
    /// Parse and validate a leaf condition
    pub fn parse(value: &Value) -> Result<Self, CompileError> {
        let field = parse_left(value.get("left"))?;

        let op_name = value.get("op").and_then(Value::as_str).unwrap_or_default();
        let op = OpCode::parse(op_name).ok_or_else(|| CompileError::UnknownOp(op_name.to_string()))?;

        let right = parse_right(op, value.get("right"))?;

        Ok(Self { field, op, right })
    }
}

/// Only `{type: "field", field: <string>}` is accepted on the left
fn parse_left(left: Option<&Value>) -> Result<String, CompileError> {
    let left = left.ok_or(CompileError::InvalidLeftOperand)?;
    if left.get("type").and_then(Value::as_str) != Some("field") {
        return Err(CompileError::InvalidLeftOperand);
    }
    left.get("field")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(CompileError::InvalidLeftOperand)
}

fn parse_right(op: OpCode, right: Option<&Value>) -> Result<Operand, CompileError> {
    let invalid = || CompileError::InvalidRightOperand(op.as_str());

    match op.arity() {
        Arity::Unary => Ok(Operand::None),
        Arity::Scalar => right
            .and_then(render_scalar)
            .map(Operand::Scalar)
            .ok_or_else(invalid),
        Arity::Range => match right.and_then(Value::as_array).map(Vec::as_slice) {
            Some([low, high]) => {
                let low = render_scalar(low).ok_or_else(invalid)?;
                let high = render_scalar(high).ok_or_else(invalid)?;
                Ok(Operand::Range(low, high))
            }
            _ => Err(invalid()),
        },
        Arity::Set => {
            let items = right.and_then(Value::as_array).ok_or_else(invalid)?;
            if items.is_empty() {
                return Err(invalid());
            }
            items
                .iter()
                .map(|item| render_scalar(item).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(Operand::Set)
        }
    }
}

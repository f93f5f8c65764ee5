//! # Where Clause Compiler
//!
//! Renders a condition tree into a SQL boolean expression.
//!
//! Field names and values are interpolated verbatim. Values are wrapped in
//! double quotes but not escaped, so a value containing `"` changes the
//! statement.

use serde_json::Value;

use super::errors::CompileError;
use super::filter::{Condition, ConditionGroup, ConditionNode, OpCode, Operand};

/// Parse and compile a condition tree submitted as JSON.
///
/// The returned fragment is never empty.
pub fn compile_where(value: &Value) -> Result<String, CompileError> {
    let group = ConditionGroup::parse(value)?;
    compile_group(&group)
}

/// Join the children of a group; nested groups are parenthesized
pub fn compile_group(group: &ConditionGroup) -> Result<String, CompileError> {
    if group.children.is_empty() {
        return Err(CompileError::EmptyGroup);
    }

    let separator = format!(" {} ", group.conjunction.as_sql());
    let fragments = group
        .children
        .iter()
        .map(|child| match child {
            ConditionNode::Group(inner) => compile_group(inner).map(|sub| format!("({})", sub)),
            ConditionNode::Leaf(condition) => compile_condition(condition),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(fragments.join(&separator))
}

/// Render a single condition, always wrapped in parentheses
pub fn compile_condition(condition: &Condition) -> Result<String, CompileError> {
    let field = condition.field.as_str();

    let fragment = match (condition.op, &condition.right) {
        (OpCode::Equal | OpCode::SelectEquals, Operand::Scalar(v)) => compare(field, "=", v),
        (OpCode::NotEqual | OpCode::SelectNotEquals, Operand::Scalar(v)) => compare(field, "!=", v),
        (OpCode::Less, Operand::Scalar(v)) => compare(field, "<", v),
        (OpCode::LessOrEqual, Operand::Scalar(v)) => compare(field, "<=", v),
        (OpCode::Greater, Operand::Scalar(v)) => compare(field, ">", v),
        (OpCode::GreaterOrEqual, Operand::Scalar(v)) => compare(field, ">=", v),
        (OpCode::Like, Operand::Scalar(v)) => compare(field, "LIKE", v),
        (OpCode::NotLike, Operand::Scalar(v)) => compare(field, "NOT LIKE", v),
        (OpCode::StartsWith, Operand::Scalar(v)) => format!("({} LIKE \"{}%\")", field, v),
        (OpCode::EndsWith, Operand::Scalar(v)) => format!("({} LIKE \"%{}\")", field, v),
        (OpCode::Between, Operand::Range(low, high)) => {
            format!("({} BETWEEN \"{}\" AND \"{}\")", field, low, high)
        }
        (OpCode::NotBetween, Operand::Range(low, high)) => {
            format!("({} NOT BETWEEN \"{}\" AND \"{}\")", field, low, high)
        }
        (OpCode::IsEmpty, _) => format!("({} IS NULL)", field),
        (OpCode::IsNotEmpty, _) => format!("({} IS NOT NULL)", field),
        (OpCode::SelectAnyIn, Operand::Set(items)) => membership(field, "IN", items),
        (OpCode::SelectNotAnyIn, Operand::Set(items)) => membership(field, "NOT IN", items),
        (op, _) => return Err(CompileError::InvalidRightOperand(op.as_str())),
    };

    Ok(fragment)
}

fn compare(field: &str, operator: &str, value: &str) -> String {
    format!("({} {} \"{}\")", field, operator, value)
}

fn membership(field: &str, operator: &str, items: &[String]) -> String {
    let list = items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(",");
    format!("({} {} ({}))", field, operator, list)
}

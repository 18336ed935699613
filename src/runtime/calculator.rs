//! Operator calculators: pure functions from evaluated operands to a result.
//!
//! `&&` and `||` short-circuit, so the evaluator asks [`logical::short_circuit`]
//! before evaluating the right operand and only then falls through to
//! [`binary`].

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

mod arithmetic;
mod bitwise;
mod comparison;
pub(crate) mod logical;
mod unary;

pub(crate) fn binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    match operator {
        BinaryOperator::Add
        | BinaryOperator::Sub
        | BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Rem => arithmetic::calculate(operator, left, right),
        BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::ShiftLeft
        | BinaryOperator::ShiftRight
        | BinaryOperator::UnsignedShiftRight => bitwise::calculate(operator, left, right),
        BinaryOperator::Equal | BinaryOperator::NotEqual => {
            comparison::equality(operator, left, right)
        }
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => comparison::relational(operator, left, right),
        BinaryOperator::And | BinaryOperator::Or => logical::calculate(operator, left, right),
    }
}

pub(crate) fn unary(operator: UnaryOperator, operand: &Value) -> Result<Value, RuntimeError> {
    unary::calculate(operator, operand)
}

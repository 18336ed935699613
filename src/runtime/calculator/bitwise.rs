use crate::ast::BinaryOperator;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// `& | ^ << >> >>>` on ints. Shift counts use their low five bits.
pub(super) fn calculate(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let (Value::Integer(left_value), Value::Integer(right_value)) = (left, right) else {
        return Err(RuntimeError::unsupported_types(operator.symbol(), left, right));
    };
    let (left_value, right_value) = (*left_value, *right_value);
    let shift = (right_value & 31) as u32;
    let value = match operator {
        BinaryOperator::BitAnd => left_value & right_value,
        BinaryOperator::BitOr => left_value | right_value,
        BinaryOperator::BitXor => left_value ^ right_value,
        BinaryOperator::ShiftLeft => left_value.wrapping_shl(shift),
        BinaryOperator::ShiftRight => left_value.wrapping_shr(shift),
        BinaryOperator::UnsignedShiftRight => ((left_value as u32) >> shift) as i32,
        _ => unreachable!("{operator} is not a bitwise operator"),
    };
    Ok(Value::Integer(value))
}

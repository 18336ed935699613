use crate::ast::BinaryOperator;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Decides `&&`/`||` from the left operand alone when possible.
///
/// Returns `Some(result)` when the right operand must not be evaluated.
pub(crate) fn short_circuit(
    operator: BinaryOperator,
    left: &Value,
) -> Result<Option<Value>, RuntimeError> {
    let Value::Boolean(left) = left else {
        return Err(RuntimeError::unsupported_type(operator.symbol(), left));
    };
    let decided = match operator {
        BinaryOperator::And => !*left,
        BinaryOperator::Or => *left,
        _ => unreachable!("{operator} is not a logical operator"),
    };
    Ok(decided.then_some(Value::Boolean(*left)))
}

pub(super) fn calculate(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let (Value::Boolean(left_value), Value::Boolean(right_value)) = (left, right) else {
        return Err(RuntimeError::unsupported_types(operator.symbol(), left, right));
    };
    let value = match operator {
        BinaryOperator::And => *left_value && *right_value,
        BinaryOperator::Or => *left_value || *right_value,
        _ => unreachable!("{operator} is not a logical operator"),
    };
    Ok(Value::Boolean(value))
}

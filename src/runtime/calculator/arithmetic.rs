use crate::ast::BinaryOperator;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// `+ - * / %`. Integers wrap on overflow; a double on either side promotes
/// both operands. `+` with a string on either side concatenates.
pub(super) fn calculate(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    if operator == BinaryOperator::Add
        && (matches!(left, Value::String(_)) || matches!(right, Value::String(_)))
    {
        return Ok(Value::string(format!("{left}{right}")));
    }

    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => integer(operator, *left, *right),
        _ => match (left.as_double(), right.as_double()) {
            (Some(left), Some(right)) => Ok(Value::Double(double(operator, left, right))),
            _ => Err(RuntimeError::unsupported_types(operator.symbol(), left, right)),
        },
    }
}

fn integer(operator: BinaryOperator, left: i32, right: i32) -> Result<Value, RuntimeError> {
    let value = match operator {
        BinaryOperator::Add => left.wrapping_add(right),
        BinaryOperator::Sub => left.wrapping_sub(right),
        BinaryOperator::Mul => left.wrapping_mul(right),
        BinaryOperator::Div | BinaryOperator::Rem if right == 0 => {
            return Err(RuntimeError::DivisionByZero {
                operator: operator.symbol(),
                left,
            });
        }
        BinaryOperator::Div => left.wrapping_div(right),
        BinaryOperator::Rem => left.wrapping_rem(right),
        _ => unreachable!("{operator} is not an arithmetic operator"),
    };
    Ok(Value::Integer(value))
}

fn double(operator: BinaryOperator, left: f64, right: f64) -> f64 {
    match operator {
        BinaryOperator::Add => left + right,
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div => left / right,
        BinaryOperator::Rem => left % right,
        _ => unreachable!("{operator} is not an arithmetic operator"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i32) -> Value {
        Value::Integer(value)
    }

    #[test]
    fn integer_division_truncates_toward_zero() {
        assert_eq!(calculate(BinaryOperator::Div, &int(7), &int(2)), Ok(int(3)));
        assert_eq!(calculate(BinaryOperator::Div, &int(7), &int(-2)), Ok(int(-3)));
        assert_eq!(calculate(BinaryOperator::Div, &int(-7), &int(2)), Ok(int(-3)));
        assert_eq!(calculate(BinaryOperator::Rem, &int(-7), &int(2)), Ok(int(-1)));
    }

    #[test]
    fn integer_division_by_zero_is_an_error() {
        let error = calculate(BinaryOperator::Div, &int(7), &int(0)).expect_err("division by zero");
        assert_eq!(error.to_string(), "Division by zero: 7 / 0");
        assert!(calculate(BinaryOperator::Rem, &int(7), &int(0)).is_err());
    }

    #[test]
    fn double_division_by_zero_follows_ieee() {
        assert_eq!(
            calculate(BinaryOperator::Div, &Value::Double(7.0), &int(0)),
            Ok(Value::Double(f64::INFINITY))
        );
        let Ok(Value::Double(nan)) = calculate(BinaryOperator::Rem, &Value::Double(1.0), &int(0))
        else {
            panic!("expected a double");
        };
        assert!(nan.is_nan());
    }

    #[test]
    fn integers_wrap_on_overflow() {
        assert_eq!(
            calculate(BinaryOperator::Add, &int(i32::MAX), &int(1)),
            Ok(int(i32::MIN))
        );
        assert_eq!(
            calculate(BinaryOperator::Div, &int(i32::MIN), &int(-1)),
            Ok(int(i32::MIN))
        );
    }

    #[test]
    fn promotes_mixed_operands_to_double() {
        assert_eq!(
            calculate(BinaryOperator::Mul, &int(3), &Value::Double(0.5)),
            Ok(Value::Double(1.5))
        );
        assert_eq!(
            calculate(BinaryOperator::Sub, &Value::Double(1.0), &int(3)),
            Ok(Value::Double(-2.0))
        );
    }

    #[test]
    fn plus_with_a_string_concatenates() {
        assert_eq!(
            calculate(BinaryOperator::Add, &Value::string("n="), &int(4)),
            Ok(Value::string("n=4"))
        );
        assert_eq!(
            calculate(BinaryOperator::Add, &Value::Double(1.0), &Value::string("!")),
            Ok(Value::string("1.0!"))
        );
        assert_eq!(
            calculate(BinaryOperator::Add, &Value::string("x"), &Value::Null),
            Ok(Value::string("xnull"))
        );
    }

    #[test]
    fn rejects_unsupported_types() {
        let error = calculate(BinaryOperator::Sub, &Value::string("a"), &int(1))
            .expect_err("unsupported");
        assert_eq!(
            error.to_string(),
            "Not supported types for operator '-': string and int"
        );
        assert!(calculate(BinaryOperator::Add, &Value::Boolean(true), &int(1)).is_err());
    }
}

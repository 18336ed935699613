use crate::ast::UnaryOperator;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

pub(super) fn calculate(operator: UnaryOperator, operand: &Value) -> Result<Value, RuntimeError> {
    let value = match (operator, operand) {
        (UnaryOperator::Minus, Value::Integer(value)) => Value::Integer(value.wrapping_neg()),
        (UnaryOperator::Minus, Value::Double(value)) => Value::Double(-value),
        (UnaryOperator::Plus, Value::Integer(_) | Value::Double(_)) => operand.clone(),
        (UnaryOperator::Not, Value::Boolean(value)) => Value::Boolean(!value),
        (UnaryOperator::BitwiseInverse, Value::Integer(value)) => Value::Integer(!value),
        (UnaryOperator::TypeOf, _) => Value::string(operand.type_name()),
        _ => return Err(RuntimeError::unsupported_type(operator.symbol(), operand)),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitwise_inverse_complements_ints() {
        for value in [0, -1, 1, 42, i32::MIN, i32::MAX] {
            assert_eq!(
                calculate(UnaryOperator::BitwiseInverse, &Value::Integer(value)),
                Ok(Value::Integer(!value))
            );
        }
        assert_eq!(
            calculate(UnaryOperator::BitwiseInverse, &Value::Integer(0)),
            Ok(Value::Integer(-1))
        );
    }

    #[test]
    fn bitwise_inverse_rejects_other_types() {
        let error = calculate(UnaryOperator::BitwiseInverse, &Value::Double(1.0))
            .expect_err("unsupported");
        assert_eq!(error.to_string(), "Not supported type for operator '~': double");
        let error = calculate(UnaryOperator::BitwiseInverse, &Value::string("1"))
            .expect_err("unsupported");
        assert_eq!(error.to_string(), "Not supported type for operator '~': string");
    }

    #[test]
    fn negates_and_inverts() {
        assert_eq!(
            calculate(UnaryOperator::Minus, &Value::Integer(i32::MIN)),
            Ok(Value::Integer(i32::MIN))
        );
        assert_eq!(
            calculate(UnaryOperator::Minus, &Value::Double(2.5)),
            Ok(Value::Double(-2.5))
        );
        assert_eq!(
            calculate(UnaryOperator::Not, &Value::Boolean(true)),
            Ok(Value::Boolean(false))
        );
        assert!(calculate(UnaryOperator::Not, &Value::Integer(0)).is_err());
        assert!(calculate(UnaryOperator::Minus, &Value::string("1")).is_err());
    }

    #[test]
    fn typeof_names_the_runtime_type() {
        let cases = [
            (Value::Integer(1), "int"),
            (Value::Double(1.0), "double"),
            (Value::Boolean(false), "boolean"),
            (Value::string(""), "string"),
            (Value::Null, "null"),
        ];
        for (value, expected) in cases {
            assert_eq!(
                calculate(UnaryOperator::TypeOf, &value),
                Ok(Value::string(expected))
            );
        }
    }
}

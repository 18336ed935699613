use std::cmp::Ordering;

use crate::ast::BinaryOperator;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// `==` and `!=`.
///
/// `null` may be compared with anything and equals only `null`; arrays are
/// equal when they are the same array.
pub(super) fn equality(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let equal = match (left, right) {
        (Value::Null, other) | (other, Value::Null) => matches!(other, Value::Null),
        (Value::Integer(left), Value::Integer(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Boolean(left), Value::Boolean(right)) => left == right,
        (Value::Array(left), Value::Array(right)) => left.ptr_eq(right),
        _ => match (left.as_double(), right.as_double()) {
            (Some(left), Some(right)) => left == right,
            _ => return Err(RuntimeError::unsupported_types(operator.symbol(), left, right)),
        },
    };
    Ok(Value::Boolean(equal == (operator == BinaryOperator::Equal)))
}

/// `< <= > >=` on numbers and strings. Strings order by UTF-16 code units.
pub(super) fn relational(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => Some(left.cmp(right)),
        (Value::String(left), Value::String(right)) => {
            Some(left.encode_utf16().cmp(right.encode_utf16()))
        }
        _ => match (left.as_double(), right.as_double()) {
            // NaN orders with nothing
            (Some(left), Some(right)) => left.partial_cmp(&right),
            _ => return Err(RuntimeError::unsupported_types(operator.symbol(), left, right)),
        },
    };
    let result = ordering.is_some_and(|ordering| match operator {
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => unreachable!("{operator} is not a relational operator"),
    });
    Ok(Value::Boolean(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Array;

    fn equals(left: &Value, right: &Value) -> bool {
        match equality(BinaryOperator::Equal, left, right) {
            Ok(Value::Boolean(value)) => value,
            other => panic!("unexpected result {other:?}"),
        }
    }

    fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> bool {
        match relational(operator, left, right) {
            Ok(Value::Boolean(value)) => value,
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn numeric_equality_promotes() {
        assert!(equals(&Value::Integer(2), &Value::Double(2.0)));
        assert!(!equals(&Value::Integer(2), &Value::Integer(3)));
        assert!(!equals(&Value::Double(f64::NAN), &Value::Double(f64::NAN)));
        assert_eq!(
            equality(BinaryOperator::NotEqual, &Value::Integer(1), &Value::Double(1.5)),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn null_compares_with_anything() {
        assert!(equals(&Value::Null, &Value::Null));
        assert!(!equals(&Value::string("null"), &Value::Null));
        assert!(!equals(&Value::Null, &Value::Integer(0)));
    }

    #[test]
    fn arrays_compare_by_identity() {
        let array = Array::new(vec![Value::Integer(1)]);
        let same = Value::Array(array.clone());
        assert!(equals(&Value::Array(array), &same));
        assert!(!equals(
            &same,
            &Value::Array(Array::new(vec![Value::Integer(1)]))
        ));
    }

    #[test]
    fn mixed_types_are_not_comparable() {
        let error = equality(BinaryOperator::Equal, &Value::string("1"), &Value::Integer(1))
            .expect_err("unsupported");
        assert_eq!(
            error.to_string(),
            "Not supported types for operator '==': string and int"
        );
        assert!(equality(BinaryOperator::Equal, &Value::Boolean(true), &Value::Integer(1)).is_err());
        assert!(relational(BinaryOperator::Less, &Value::Boolean(true), &Value::Boolean(false)).is_err());
    }

    #[test]
    fn orders_numbers_and_strings() {
        assert!(compare(BinaryOperator::Less, &Value::Integer(1), &Value::Double(1.5)));
        assert!(compare(BinaryOperator::GreaterEqual, &Value::Integer(2), &Value::Integer(2)));
        assert!(!compare(BinaryOperator::Greater, &Value::Integer(2), &Value::Integer(2)));
        assert!(compare(BinaryOperator::LessEqual, &Value::string("abc"), &Value::string("abd")));
        assert!(!compare(BinaryOperator::Less, &Value::Double(f64::NAN), &Value::Integer(1)));
        assert!(!compare(BinaryOperator::GreaterEqual, &Value::Double(f64::NAN), &Value::Integer(1)));
    }

    #[test]
    fn strings_order_by_utf16_code_units() {
        // U+1F600 is a surrogate pair starting at 0xD83D, below U+FF61
        assert!(compare(BinaryOperator::Less, &Value::string("\u{1F600}"), &Value::string("\u{FF61}")));
        assert!(compare(BinaryOperator::Less, &Value::string("Z"), &Value::string("a")));
        assert!(compare(BinaryOperator::Less, &Value::string("ab"), &Value::string("abc")));
    }
}

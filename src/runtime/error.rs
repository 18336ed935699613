use thiserror::Error;

use super::value::Value;

/// A condition that aborts the current run. The interpreter pairs it with the
/// failing line and a stack trace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Not supported type for operator '{operator}': {operand}")]
    UnsupportedType {
        operator: &'static str,
        operand: &'static str,
    },
    #[error("Not supported types for operator '{operator}': {left} and {right}")]
    UnsupportedTypes {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Division by zero: {left} {operator} 0")]
    DivisionByZero { operator: &'static str, left: i32 },
    #[error("Variable '{name}' is not defined")]
    UndefinedVariable { name: String },
    #[error("Variable '{name}' is already defined")]
    AlreadyDefined { name: String },
    #[error("Cannot assign a value to final variable '{name}'")]
    FinalAssignment { name: String },
    #[error("Condition must be boolean, but found {found}")]
    ConditionNotBoolean { found: &'static str },
    #[error("Expected an array, but found {found}")]
    NotAnArray { found: &'static str },
    #[error("Array index must be int, but found {found}")]
    IndexNotInteger { found: &'static str },
    #[error("Array index {index} is out of bounds for length {length}")]
    IndexOutOfBounds { index: i32, length: usize },
    #[error("Array size must be int, but found {found}")]
    SizeNotInteger { found: &'static str },
    #[error("Array size must not be negative: {size}")]
    NegativeArraySize { size: i32 },
    #[error("Array size {size} is too large")]
    ArrayTooLarge { size: i32 },
    #[error("'length' is not supported for type {found}")]
    LengthNotSupported { found: &'static str },
    #[error("Function '{name}' with {arity} parameter(s) is not defined")]
    UndefinedFunction { name: String, arity: usize },
    #[error("Stack overflow")]
    StackOverflow,
}

impl RuntimeError {
    pub(crate) fn unsupported_type(operator: &'static str, operand: &Value) -> Self {
        RuntimeError::UnsupportedType {
            operator,
            operand: operand.type_name(),
        }
    }

    pub(crate) fn unsupported_types(operator: &'static str, left: &Value, right: &Value) -> Self {
        RuntimeError::UnsupportedTypes {
            operator,
            left: left.type_name(),
            right: right.type_name(),
        }
    }
}

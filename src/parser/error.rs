use thiserror::Error;

/// Reasons a token stream is rejected. The parser pairs each with the line of
/// the offending token to form a [`SyntaxError`](crate::compiler::SyntaxError).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, but found '{found}'")]
    ExpectedToken { expected: String, found: String },
    #[error("Expected {expected}, but reached the end of the module")]
    UnexpectedEndOfInput { expected: String },
    #[error("Expected an expression, but found '{found}'")]
    ExpectedExpression { found: String },
    #[error("Expected 'function' declaration, but found '{found}'")]
    ExpectedFunctionDeclaration { found: String },
    #[error("Block opened at line {opened_at} is not closed by '}}'")]
    UnterminatedBlock { opened_at: usize },
    #[error("Missing condition in '{statement}' statement")]
    MissingCondition { statement: &'static str },
    #[error("Invalid assignment target: only a variable or an array element can be assigned")]
    InvalidAssignmentTarget,
    #[error("Operator '{operator}' requires a variable or an array element")]
    InvalidUpdateTarget { operator: &'static str },
    #[error("Integer literal is out of range: '{literal}'")]
    IntegerOutOfRange { literal: String },
    #[error("Not a statement")]
    NotAStatement,
    #[error("Variable declaration is not allowed here")]
    DeclarationNotAllowed,
    #[error("Final variable '{name}' must be initialized")]
    MissingFinalInitializer { name: String },
    #[error("Duplicate parameter '{name}' in function '{function}'")]
    DuplicateParameter { name: String, function: String },
    #[error("'{name}' is a reserved function name")]
    ReservedFunctionName { name: String },
    #[error("'{name}' expects {expected}, but found {found} argument(s)")]
    BuiltinArity {
        name: &'static str,
        expected: &'static str,
        found: usize,
    },
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unsupported character: '{character}'")]
    UnexpectedCharacter { character: char },
    #[error("String literal is not closed by '\"'")]
    UnterminatedString,
    #[error("Unsupported escape sequence: '\\{character}'")]
    InvalidEscape { character: char },
    #[error("Invalid number literal: '{literal}'")]
    InvalidNumberLiteral { literal: String },
    #[error("Integer literal is out of range: '{literal}'")]
    IntegerOutOfRange { literal: String },
    #[error("Multi-line comment is not closed")]
    UnterminatedComment,
}

pub type LexResult<T> = Result<T, LexError>;

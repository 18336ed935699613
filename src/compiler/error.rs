use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::source::SourceLine;

/// The single error a compilation can fail with: where, and why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Syntax error in '{module}' [Line: {line}]: {message}")]
pub struct SyntaxError {
    module: Arc<str>,
    line: usize,
    message: String,
}

impl SyntaxError {
    pub fn new(source_line: &SourceLine, reason: impl fmt::Display) -> Self {
        Self {
            module: Arc::from(source_line.module()),
            line: source_line.number(),
            message: reason.to_string(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Problems found once every module has been parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Function '{name}' with {arity} parameter(s) is already defined")]
    DuplicateFunction { name: String, arity: usize },
    #[error("Function '{name}' with {arity} parameter(s) is not defined")]
    UndefinedFunction { name: String, arity: usize },
    #[error("'{statement}' is only allowed inside a loop")]
    OutsideLoop { statement: &'static str },
    #[error("Entry point is not defined: expected 'main()' or 'main(args)'")]
    MissingEntryPoint,
}

use std::fmt;
use std::io;

use thiserror::Error;

use crate::runtime::error::RuntimeError;
use crate::runtime::execution::{ExecutionContext, StackTraceItem};
use crate::source::SourceLine;

/// Host-level failures of a run. A failing Javamm program is not one of these:
/// it ends in [`RunResult::RuntimeFailure`](super::RunResult::RuntimeFailure).
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Failed to write program output")]
    Output(#[from] io::Error),
    #[error("Failed to start the interpreter thread")]
    Spawn(#[source] io::Error),
    #[error("Interpreter thread panicked")]
    WorkerPanicked,
}

/// A runtime error together with where it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeFailure {
    pub error: RuntimeError,
    pub source_line: SourceLine,
    /// Innermost call first.
    pub stack_trace: Vec<StackTraceItem>,
}

impl RuntimeFailure {
    pub(crate) fn capture(
        error: RuntimeError,
        source_line: &SourceLine,
        context: &ExecutionContext<'_>,
    ) -> Self {
        Self {
            error,
            source_line: source_line.clone(),
            stack_trace: context.stack_trace(source_line),
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// The report written to the error sink.
impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.error)?;
        for item in &self.stack_trace {
            write!(
                f,
                "\n    at {} [{}]",
                item.function_name(),
                item.source_line
            )?;
        }
        Ok(())
    }
}

/// Why execution stopped before the entry function returned.
#[derive(Debug)]
pub(crate) enum Abort {
    Failure(Box<RuntimeFailure>),
    Terminated,
    Output(io::Error),
}

impl Abort {
    /// Captures the stack trace at the point of failure.
    pub(crate) fn failure(
        error: RuntimeError,
        source_line: &SourceLine,
        context: &ExecutionContext<'_>,
    ) -> Self {
        Abort::Failure(Box::new(RuntimeFailure::capture(error, source_line, context)))
    }
}

impl From<io::Error> for Abort {
    fn from(error: io::Error) -> Self {
        Abort::Output(error)
    }
}

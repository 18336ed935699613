//! Javamm: compiler front end and tree-walking interpreter.
//!
//! Source lines grouped into [`SourceModule`]s are compiled into an immutable
//! [`Program`], which any number of independent runs may then execute.

pub mod ast;
pub mod compiler;
pub mod config;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod runtime;
pub mod source;

pub use compiler::{Compiler, SyntaxError};
pub use config::Config;
pub use interpreter::{ExitInfo, Interpreter, InterpreterError, PreparedRun, RunResult};
pub use program::Program;
pub use runtime::Canceller;
pub use source::{SourceLine, SourceModule};

/// Wires the compiler and the interpreter together once, at startup.
#[derive(Debug, Clone, Default)]
pub struct Javamm {
    compiler: Compiler,
    interpreter: Interpreter,
}

impl Javamm {
    pub fn new(config: Config) -> Self {
        Self {
            compiler: Compiler::new(),
            interpreter: Interpreter::new(config),
        }
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn compile(&self, modules: &[SourceModule]) -> Result<Program, SyntaxError> {
        self.compiler.compile(modules)
    }
}

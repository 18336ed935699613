//! Tree-walking interpreter.
//!
//! Execution pipeline:
//! PreparedRun::run -> worker thread -> InterpreterRuntime::call (entry)
//! -> execute_operations -> execute -> evaluate -> invoke -> call.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::program::Program;
use crate::runtime::Canceller;
use crate::runtime::execution::ExecutionContext;
use crate::runtime::value::{Array, Value};

pub mod error;
mod expression;
mod operation;
mod runtime;

use error::Abort;
pub use error::{InterpreterError, RuntimeFailure};
use runtime::InterpreterRuntime;

const WORKER_NAME: &str = "javamm-run";

/// Runs compiled programs. Holds no per-run state; every run gets a fresh
/// call stack and cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sets up one run of `program`. The returned run's canceller may be
    /// handed to another thread before the run starts.
    pub fn prepare<'p>(&self, program: &'p Program, arguments: Vec<String>) -> PreparedRun<'p> {
        PreparedRun {
            program,
            arguments,
            canceller: Canceller::new(),
            config: self.config,
        }
    }

    pub fn run(
        &self,
        program: &Program,
        arguments: Vec<String>,
        output: &mut (dyn Write + Send),
        errors: &mut (dyn Write + Send),
    ) -> Result<RunResult, InterpreterError> {
        self.prepare(program, arguments).run(output, errors)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Success(ExitInfo),
    RuntimeFailure(RuntimeFailure),
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitInfo {
    /// Operations executed, including those of called functions.
    pub operations: u64,
    pub elapsed: Duration,
}

/// A single pending run of a program.
#[derive(Debug)]
pub struct PreparedRun<'p> {
    program: &'p Program,
    arguments: Vec<String>,
    canceller: Canceller,
    config: Config,
}

impl PreparedRun<'_> {
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    /// Executes the entry function on a dedicated thread and waits for it.
    ///
    /// Program output goes to `output`; a runtime failure report goes to
    /// `errors`. Only sink and thread failures are returned as `Err`.
    pub fn run(
        self,
        output: &mut (dyn Write + Send),
        errors: &mut (dyn Write + Send),
    ) -> Result<RunResult, InterpreterError> {
        let Self {
            program,
            arguments,
            canceller,
            config,
        } = self;

        thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name(WORKER_NAME.to_string())
                .stack_size(config.effective_stack_size())
                .spawn_scoped(scope, move || {
                    execute(program, arguments, canceller, config, output, errors)
                })
                .map_err(InterpreterError::Spawn)?;
            match worker.join() {
                Ok(result) => result,
                Err(_) => Err(InterpreterError::WorkerPanicked),
            }
        })
    }
}

fn execute(
    program: &Program,
    arguments: Vec<String>,
    canceller: Canceller,
    config: Config,
    output: &mut (dyn Write + Send),
    errors: &mut (dyn Write + Send),
) -> Result<RunResult, InterpreterError> {
    let started = Instant::now();
    let entry = program.entry_function().clone();
    info!(entry = %entry.signature(), arguments = arguments.len(), "run started");

    let arguments = if entry.parameters.is_empty() {
        Vec::new()
    } else {
        let arguments = arguments.into_iter().map(Value::string).collect();
        vec![Value::Array(Array::new(arguments))]
    };

    let mut context = ExecutionContext::new(program, canceller, config.max_call_depth);
    let mut runtime = InterpreterRuntime::new(output, config.max_array_length);
    let call_site = entry.source_line.clone();
    let result = runtime.call(entry, arguments, &call_site, &mut context);
    runtime.output.flush()?;

    let elapsed = started.elapsed();
    match result {
        Ok(_) => {
            info!(
                operations = context.operations(),
                elapsed_ms = elapsed.as_millis() as u64,
                "run finished"
            );
            Ok(RunResult::Success(ExitInfo {
                operations: context.operations(),
                elapsed,
            }))
        }
        Err(Abort::Failure(failure)) => {
            info!(
                line = %failure.source_line,
                error = %failure.error,
                "run failed"
            );
            writeln!(errors, "{failure}")?;
            errors.flush()?;
            Ok(RunResult::RuntimeFailure(*failure))
        }
        Err(Abort::Terminated) => {
            info!(operations = context.operations(), "run terminated");
            Ok(RunResult::Terminated)
        }
        Err(Abort::Output(error)) => Err(InterpreterError::Output(error)),
    }
}

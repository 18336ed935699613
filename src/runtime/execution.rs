use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::Variable;
use crate::program::{DeveloperFunction, Program};
use crate::runtime::cancellation::Canceller;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;
use crate::source::SourceLine;

/// One pending call in a stack trace.
#[derive(Debug, Clone, PartialEq)]
pub struct StackTraceItem {
    pub function: Arc<DeveloperFunction>,
    /// The failing line for the innermost item, the call site for the others.
    pub source_line: SourceLine,
}

impl StackTraceItem {
    pub fn function_name(&self) -> &str {
        &self.function.name
    }
}

/// Native stack kept free below the deepest call. One function body
/// evaluates nested expressions and operations within this margin.
pub(crate) const STACK_RED_ZONE: usize = 1024 * 1024;

#[derive(Debug)]
struct Binding {
    value: Value,
    is_final: bool,
}

/// Variable bindings of one lexical scope.
#[derive(Debug, Default)]
pub(crate) struct LocalContext {
    variables: FxHashMap<Arc<str>, Binding>,
}

impl LocalContext {
    fn declare(
        &mut self,
        variable: &Variable,
        value: Value,
        is_final: bool,
    ) -> Result<(), RuntimeError> {
        if self.variables.contains_key(variable.name()) {
            return Err(RuntimeError::AlreadyDefined {
                name: variable.name().to_string(),
            });
        }
        self.variables
            .insert(variable.shared_name().clone(), Binding { value, is_final });
        Ok(())
    }
}

/// A function activation: the function, where it was called from and its
/// scope chain, innermost scope last.
#[derive(Debug)]
struct Frame {
    function: Arc<DeveloperFunction>,
    call_site: SourceLine,
    scopes: Vec<LocalContext>,
}

/// State of one run, passed explicitly to every evaluator and interpreter.
///
/// Variables are resolved in the current frame only; a function body never
/// sees its caller's locals.
pub(crate) struct ExecutionContext<'p> {
    program: &'p Program,
    frames: Vec<Frame>,
    canceller: Canceller,
    max_call_depth: Option<usize>,
    operations: u64,
}

impl<'p> ExecutionContext<'p> {
    pub(crate) fn new(
        program: &'p Program,
        canceller: Canceller,
        max_call_depth: Option<usize>,
    ) -> Self {
        Self {
            program,
            frames: Vec::new(),
            canceller,
            max_call_depth,
            operations: 0,
        }
    }

    pub(crate) fn program(&self) -> &'p Program {
        self.program
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.canceller.is_cancelled()
    }

    pub(crate) fn count_operation(&mut self) {
        self.operations += 1;
    }

    pub(crate) fn operations(&self) -> u64 {
        self.operations
    }

    pub(crate) fn call_depth(&self) -> usize {
        self.frames.len()
    }

    /// Enters `function`, called from `call_site`, with one empty scope for
    /// its parameters.
    ///
    /// Fails with [`RuntimeError::StackOverflow`] when the configured depth is
    /// reached or when less than [`STACK_RED_ZONE`] bytes of the native stack
    /// are left.
    pub(crate) fn push_frame(
        &mut self,
        function: Arc<DeveloperFunction>,
        call_site: SourceLine,
    ) -> Result<(), RuntimeError> {
        let depth_exceeded = self
            .max_call_depth
            .is_some_and(|max_call_depth| self.frames.len() >= max_call_depth);
        let stack_exhausted =
            stacker::remaining_stack().is_some_and(|remaining| remaining < STACK_RED_ZONE);
        if depth_exceeded || stack_exhausted {
            return Err(RuntimeError::StackOverflow);
        }
        self.frames.push(Frame {
            function,
            call_site,
            scopes: vec![LocalContext::default()],
        });
        Ok(())
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn push_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.push(LocalContext::default());
        }
    }

    pub(crate) fn pop_scope(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scopes.pop();
        }
    }

    /// Declares `variable` in the innermost scope.
    pub(crate) fn declare(
        &mut self,
        variable: &Variable,
        value: Value,
        is_final: bool,
    ) -> Result<(), RuntimeError> {
        match self
            .frames
            .last_mut()
            .and_then(|frame| frame.scopes.last_mut())
        {
            Some(scope) => scope.declare(variable, value, is_final),
            None => Err(RuntimeError::UndefinedVariable {
                name: variable.name().to_string(),
            }),
        }
    }

    pub(crate) fn get(&self, variable: &Variable) -> Result<Value, RuntimeError> {
        self.frames
            .last()
            .into_iter()
            .flat_map(|frame| frame.scopes.iter().rev())
            .find_map(|scope| scope.variables.get(variable.name()))
            .map(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: variable.name().to_string(),
            })
    }

    /// Updates the nearest visible binding of `variable`.
    pub(crate) fn set(&mut self, variable: &Variable, value: Value) -> Result<(), RuntimeError> {
        let binding = self
            .frames
            .last_mut()
            .into_iter()
            .flat_map(|frame| frame.scopes.iter_mut().rev())
            .find_map(|scope| scope.variables.get_mut(variable.name()))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: variable.name().to_string(),
            })?;
        if binding.is_final {
            return Err(RuntimeError::FinalAssignment {
                name: variable.name().to_string(),
            });
        }
        binding.value = value;
        Ok(())
    }

    /// Snapshot of the pending calls, innermost first, for a failure at
    /// `failing_line`.
    pub(crate) fn stack_trace(&self, failing_line: &SourceLine) -> Vec<StackTraceItem> {
        let mut line = failing_line;
        let mut trace = Vec::with_capacity(self.frames.len());
        for frame in self.frames.iter().rev() {
            trace.push(StackTraceItem {
                function: frame.function.clone(),
                source_line: line.clone(),
            });
            line = &frame.call_site;
        }
        trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use crate::program::FunctionSignature;
    use crate::source::SourceModule;
    use indoc::indoc;

    fn program() -> Program {
        let source = indoc! {"
            function main() {
                walk(2);
            }
            function walk(n) {
                walk(n - 1);
            }
        "};
        Compiler::new()
            .compile(&[SourceModule::from_text("main", source)])
            .expect("compile failed")
    }

    fn function(program: &Program, name: &str, arity: usize) -> Arc<DeveloperFunction> {
        program
            .function(&FunctionSignature::new(name, arity))
            .cloned()
            .expect("function is declared")
    }

    fn line(number: usize) -> SourceLine {
        SourceLine::new("main", number, "")
    }

    #[test]
    fn inner_scopes_shadow_and_see_outer_bindings() {
        let program = program();
        let mut context = ExecutionContext::new(&program, Canceller::new(), Some(16));
        context
            .push_frame(function(&program, "main", 0), line(1))
            .expect("push frame");
        let x = Variable::new("x");
        context.declare(&x, Value::Integer(1), false).expect("declare");

        context.push_scope();
        assert_eq!(context.get(&x), Ok(Value::Integer(1)));
        context.declare(&x, Value::Integer(2), false).expect("shadow");
        assert_eq!(context.get(&x), Ok(Value::Integer(2)));
        context.pop_scope();

        assert_eq!(context.get(&x), Ok(Value::Integer(1)));
        context.set(&x, Value::Integer(5)).expect("update");
        assert_eq!(context.get(&x), Ok(Value::Integer(5)));
    }

    #[test]
    fn rejects_undeclared_redeclared_and_final_updates() {
        let program = program();
        let mut context = ExecutionContext::new(&program, Canceller::new(), Some(16));
        context
            .push_frame(function(&program, "main", 0), line(1))
            .expect("push frame");
        let x = Variable::new("x");
        assert_eq!(
            context.set(&x, Value::Integer(5)).map_err(|error| error.to_string()),
            Err("Variable 'x' is not defined".to_string())
        );

        context.declare(&x, Value::Null, true).expect("declare");
        assert_eq!(
            context.declare(&x, Value::Null, false),
            Err(RuntimeError::AlreadyDefined {
                name: "x".to_string()
            })
        );
        assert_eq!(
            context.set(&x, Value::Integer(1)),
            Err(RuntimeError::FinalAssignment {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn callee_does_not_see_caller_locals() {
        let program = program();
        let mut context = ExecutionContext::new(&program, Canceller::new(), Some(16));
        context
            .push_frame(function(&program, "main", 0), line(1))
            .expect("push frame");
        let x = Variable::new("x");
        context.declare(&x, Value::Integer(1), false).expect("declare");
        context
            .push_frame(function(&program, "walk", 1), line(2))
            .expect("push frame");
        assert!(context.get(&x).is_err());
        context.pop_frame();
        assert_eq!(context.get(&x), Ok(Value::Integer(1)));
    }

    #[test]
    fn stack_trace_is_innermost_first_with_call_sites() {
        let program = program();
        let main = function(&program, "main", 0);
        let walk = function(&program, "walk", 1);
        let mut context = ExecutionContext::new(&program, Canceller::new(), Some(16));
        context.push_frame(main, line(1)).expect("push main");
        context.push_frame(walk.clone(), line(2)).expect("push walk");
        context.push_frame(walk, line(5)).expect("push walk");
        assert_eq!(context.call_depth(), 3);

        let trace = context
            .stack_trace(&line(5))
            .into_iter()
            .map(|item| format!("{}@{}", item.function_name(), item.source_line.number()))
            .collect::<Vec<_>>();
        assert_eq!(trace, vec!["walk@5", "walk@5", "main@2"]);

        for _ in 0..3 {
            context.pop_frame();
        }
        assert_eq!(context.call_depth(), 0);
        assert!(context.stack_trace(&line(1)).is_empty());
    }

    #[test]
    fn call_depth_is_bounded() {
        let program = program();
        let walk = function(&program, "walk", 1);
        let mut context = ExecutionContext::new(&program, Canceller::new(), Some(2));
        context.push_frame(walk.clone(), line(1)).expect("first");
        context.push_frame(walk.clone(), line(5)).expect("second");
        assert_eq!(
            context.push_frame(walk, line(5)),
            Err(RuntimeError::StackOverflow)
        );
        assert_eq!(context.call_depth(), 2);
    }

    #[test]
    fn observes_cancellation() {
        let program = program();
        let canceller = Canceller::new();
        let context = ExecutionContext::new(&program, canceller.clone(), Some(16));
        assert!(!context.is_cancelled());
        canceller.cancel();
        assert!(context.is_cancelled());
    }
}

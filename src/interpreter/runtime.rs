use std::io::Write;
use std::sync::Arc;

use tracing::trace;

use crate::ast::{UpdatableExpression, Variable};
use crate::program::DeveloperFunction;
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::ExecutionContext;
use crate::runtime::value::{Array, Value};
use crate::source::SourceLine;

use super::error::Abort;

/// Control-flow marker for operation execution.
#[derive(Debug)]
pub(super) enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// A resolved assignment target. Array and index are evaluated once, so
/// `a[i++] += 1` touches a single element.
pub(super) enum Place<'e> {
    Variable(&'e Variable),
    Element { array: Array, index: usize },
}

/// Tree-walking executor. Output goes to the sink of the current run; all
/// other run state lives in the [`ExecutionContext`] passed to each call.
pub(super) struct InterpreterRuntime<'o> {
    pub(super) output: &'o mut dyn Write,
    pub(super) max_array_length: usize,
}

impl<'o> InterpreterRuntime<'o> {
    pub(super) fn new(output: &'o mut dyn Write, max_array_length: usize) -> Self {
        Self {
            output,
            max_array_length,
        }
    }

    /// Calls `function` from `call_site`. The frame is popped whether the body
    /// returns, fails or is terminated.
    pub(super) fn call(
        &mut self,
        function: Arc<DeveloperFunction>,
        arguments: Vec<Value>,
        call_site: &SourceLine,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Value, Abort> {
        context
            .push_frame(function.clone(), call_site.clone())
            .map_err(|error| Abort::failure(error, call_site, context))?;
        trace!(
            function = %function.signature(),
            depth = context.call_depth(),
            "invoking function"
        );
        let flow = self.enter(&function, arguments, context);
        context.pop_frame();
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Break | Flow::Continue => Ok(Value::Null),
        }
    }

    fn enter(
        &mut self,
        function: &DeveloperFunction,
        arguments: Vec<Value>,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Flow, Abort> {
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            context
                .declare(parameter, value, false)
                .map_err(|error| Abort::failure(error, &function.source_line, context))?;
        }
        self.execute_operations(&function.body.operations, context)
    }

    /// Evaluates the array and index of `target` once and checks the bounds.
    pub(super) fn place<'e>(
        &mut self,
        target: &'e UpdatableExpression,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Place<'e>, Abort> {
        match target {
            UpdatableExpression::Variable(expression) => Ok(Place::Variable(&expression.variable)),
            UpdatableExpression::ArrayAccess(access) => {
                let array = self.evaluate(&access.array, context)?;
                let index = self.evaluate(&access.index, context)?;
                element(array, index)
                    .map(|(array, index)| Place::Element { array, index })
                    .map_err(|error| Abort::failure(error, &access.source_line, context))
            }
        }
    }

    pub(super) fn read(
        &self,
        place: &Place<'_>,
        source_line: &SourceLine,
        context: &ExecutionContext<'_>,
    ) -> Result<Value, Abort> {
        let value = match place {
            Place::Variable(variable) => context.get(variable),
            Place::Element { array, index } => array
                .get(*index)
                .ok_or_else(|| out_of_bounds(*index, array.len())),
        };
        value.map_err(|error| Abort::failure(error, source_line, context))
    }

    pub(super) fn assign(
        &mut self,
        place: &Place<'_>,
        value: Value,
        source_line: &SourceLine,
        context: &mut ExecutionContext<'_>,
    ) -> Result<(), Abort> {
        let result = match place {
            Place::Variable(variable) => context.set(variable, value),
            Place::Element { array, index } => {
                if array.set(*index, value) {
                    Ok(())
                } else {
                    Err(out_of_bounds(*index, array.len()))
                }
            }
        };
        result.map_err(|error| Abort::failure(error, source_line, context))
    }
}

/// Checks that `array` is an array and `index` an int within its bounds.
pub(super) fn element(array: Value, index: Value) -> Result<(Array, usize), RuntimeError> {
    let Value::Array(array) = array else {
        return Err(RuntimeError::NotAnArray {
            found: array.type_name(),
        });
    };
    let Value::Integer(index) = index else {
        return Err(RuntimeError::IndexNotInteger {
            found: index.type_name(),
        });
    };
    let length = array.len();
    match usize::try_from(index) {
        Ok(position) if position < length => Ok((array, position)),
        _ => Err(RuntimeError::IndexOutOfBounds { index, length }),
    }
}

fn out_of_bounds(index: usize, length: usize) -> RuntimeError {
    RuntimeError::IndexOutOfBounds {
        index: i32::try_from(index).unwrap_or(i32::MAX),
        length,
    }
}

use crate::ast::{
    BinaryOperator, Expression, FunctionInvocation, UpdatableExpression, UpdateOperator,
};
use crate::runtime::calculator::{self, logical};
use crate::runtime::error::RuntimeError;
use crate::runtime::execution::ExecutionContext;
use crate::runtime::value::{Array, Value};
use crate::source::SourceLine;

use super::error::Abort;
use super::runtime::{InterpreterRuntime, element};

impl InterpreterRuntime<'_> {
    pub(super) fn evaluate(
        &mut self,
        expression: &Expression,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Value, Abort> {
        match expression {
            Expression::Constant { value, .. } => Ok(Value::from(value)),
            Expression::Variable(expression) => context
                .get(&expression.variable)
                .map_err(|error| Abort::failure(error, &expression.source_line, context)),
            Expression::ArrayAccess(access) => {
                let array = self.evaluate(&access.array, context)?;
                let index = self.evaluate(&access.index, context)?;
                element(array, index)
                    .and_then(|(array, index)| {
                        array.get(index).ok_or(RuntimeError::IndexOutOfBounds {
                            index: i32::try_from(index).unwrap_or(i32::MAX),
                            length: array.len(),
                        })
                    })
                    .map_err(|error| Abort::failure(error, &access.source_line, context))
            }
            Expression::Unary {
                operator,
                operand,
                source_line,
            } => {
                let operand = self.evaluate(operand, context)?;
                calculator::unary(*operator, &operand)
                    .map_err(|error| Abort::failure(error, source_line, context))
            }
            Expression::Binary {
                left,
                operator,
                right,
                source_line,
            } => self.binary(left, *operator, right, source_line, context),
            Expression::Conditional {
                condition,
                then_value,
                else_value,
                ..
            } => {
                if self.condition(condition, context)? {
                    self.evaluate(then_value, context)
                } else {
                    self.evaluate(else_value, context)
                }
            }
            Expression::Update {
                operator,
                prefix,
                target,
                source_line,
            } => {
                let (old, new) = self.update(*operator, target, source_line, context)?;
                Ok(if *prefix { new } else { old })
            }
            Expression::FunctionInvocation(invocation) => self.invoke(invocation, context),
            Expression::ArrayLiteral { elements, .. } => {
                let values = elements
                    .iter()
                    .map(|element| self.evaluate(element, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(Array::new(values)))
            }
            Expression::NewArray {
                element_type,
                length,
                source_line,
            } => {
                let size = match self.evaluate(length, context)? {
                    Value::Integer(size) => size,
                    other => {
                        let error = RuntimeError::SizeNotInteger {
                            found: other.type_name(),
                        };
                        return Err(Abort::failure(error, source_line, context));
                    }
                };
                self.allocate(size, Value::default_for(element_type))
                    .map(|elements| Value::Array(Array::new(elements)))
                    .map_err(|error| Abort::failure(error, source_line, context))
            }
            Expression::Length {
                operand,
                source_line,
            } => {
                let length = match self.evaluate(operand, context)? {
                    Value::Array(array) => array.len(),
                    Value::String(value) => value.encode_utf16().count(),
                    other => {
                        return Err(Abort::failure(
                            RuntimeError::LengthNotSupported {
                                found: other.type_name(),
                            },
                            source_line,
                            context,
                        ));
                    }
                };
                Ok(Value::Integer(i32::try_from(length).unwrap_or(i32::MAX)))
            }
        }
    }

    /// Elements of a `new T[size]` array, each set to `initial`. Sizes past
    /// the configured maximum or the allocator's reach are runtime errors.
    fn allocate(&self, size: i32, initial: Value) -> Result<Vec<Value>, RuntimeError> {
        let length = usize::try_from(size).map_err(|_| RuntimeError::NegativeArraySize { size })?;
        if length > self.max_array_length {
            return Err(RuntimeError::ArrayTooLarge { size });
        }
        let mut elements = Vec::new();
        elements
            .try_reserve_exact(length)
            .map_err(|_| RuntimeError::ArrayTooLarge { size })?;
        elements.resize(length, initial);
        Ok(elements)
    }

    /// Evaluates a condition of `if`, a loop or `?:`.
    pub(super) fn condition(
        &mut self,
        expression: &Expression,
        context: &mut ExecutionContext<'_>,
    ) -> Result<bool, Abort> {
        match self.evaluate(expression, context)? {
            Value::Boolean(value) => Ok(value),
            other => Err(Abort::failure(
                RuntimeError::ConditionNotBoolean {
                    found: other.type_name(),
                },
                expression.source_line(),
                context,
            )),
        }
    }

    pub(super) fn invoke(
        &mut self,
        invocation: &FunctionInvocation,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Value, Abort> {
        let arity = invocation.arguments.len();
        let Some(function) = context.program().resolve(&invocation.name, arity) else {
            return Err(Abort::failure(
                RuntimeError::UndefinedFunction {
                    name: invocation.name.to_string(),
                    arity,
                },
                &invocation.source_line,
                context,
            ));
        };
        let function = function.clone();
        let arguments = invocation
            .arguments
            .iter()
            .map(|argument| self.evaluate(argument, context))
            .collect::<Result<Vec<_>, _>>()?;
        self.call(function, arguments, &invocation.source_line, context)
    }

    /// Applies `++`/`--` to `target`; returns the old and the new value.
    pub(super) fn update(
        &mut self,
        operator: UpdateOperator,
        target: &UpdatableExpression,
        source_line: &SourceLine,
        context: &mut ExecutionContext<'_>,
    ) -> Result<(Value, Value), Abort> {
        let place = self.place(target, context)?;
        let old = self.read(&place, source_line, context)?;
        let new =
            step(operator, &old).map_err(|error| Abort::failure(error, source_line, context))?;
        self.assign(&place, new.clone(), source_line, context)?;
        Ok((old, new))
    }

    fn binary(
        &mut self,
        left: &Expression,
        operator: BinaryOperator,
        right: &Expression,
        source_line: &SourceLine,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Value, Abort> {
        let left = self.evaluate(left, context)?;
        if matches!(operator, BinaryOperator::And | BinaryOperator::Or) {
            let decided = logical::short_circuit(operator, &left)
                .map_err(|error| Abort::failure(error, source_line, context))?;
            if let Some(result) = decided {
                return Ok(result);
            }
        }
        let right = self.evaluate(right, context)?;
        calculator::binary(operator, &left, &right)
            .map_err(|error| Abort::failure(error, source_line, context))
    }
}

/// `++`/`--` on numbers.
fn step(operator: UpdateOperator, value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Integer(_) | Value::Double(_) => {
            calculator::binary(operator.binary_operator(), value, &Value::Integer(1))
        }
        other => Err(RuntimeError::unsupported_type(operator.symbol(), other)),
    }
}

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ast::{Expression, FunctionInvocation, Operation, UpdatableExpression};
use crate::program::{DeveloperFunction, FunctionSignature};
use crate::source::SourceLine;

use super::error::{SemanticError, SyntaxError};

/// Checks one function body against the declared signatures: every call must
/// resolve and `break`/`continue` must sit inside a loop.
pub(super) struct Validator<'p> {
    functions: &'p FxHashMap<FunctionSignature, Arc<DeveloperFunction>>,
    loop_depth: usize,
}

impl<'p> Validator<'p> {
    pub(super) fn new(functions: &'p FxHashMap<FunctionSignature, Arc<DeveloperFunction>>) -> Self {
        Self {
            functions,
            loop_depth: 0,
        }
    }

    pub(super) fn validate(&mut self, function: &DeveloperFunction) -> Result<(), SyntaxError> {
        self.loop_depth = 0;
        function
            .body
            .operations
            .iter()
            .try_for_each(|operation| self.operation(operation))
    }

    fn operation(&mut self, operation: &Operation) -> Result<(), SyntaxError> {
        match operation {
            Operation::Block(block) => block
                .operations
                .iter()
                .try_for_each(|operation| self.operation(operation)),
            Operation::VariableDeclaration { initializer, .. } => {
                initializer.iter().try_for_each(|value| self.expression(value))
            }
            Operation::Assignment { target, value, .. } => {
                self.updatable(target)?;
                self.expression(value)
            }
            Operation::Update { target, .. } => self.updatable(target),
            Operation::IfElse {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expression(condition)?;
                self.operation(then_branch)?;
                else_branch
                    .iter()
                    .try_for_each(|branch| self.operation(branch))
            }
            Operation::While {
                condition, body, ..
            }
            | Operation::DoWhile {
                condition, body, ..
            } => {
                self.expression(condition)?;
                self.loop_body(body)
            }
            Operation::For {
                initializers,
                condition,
                updates,
                body,
                ..
            } => {
                initializers
                    .iter()
                    .chain(updates)
                    .try_for_each(|operation| self.operation(operation))?;
                condition.iter().try_for_each(|value| self.expression(value))?;
                self.loop_body(body)
            }
            Operation::FunctionInvocation(invocation) => self.invocation(invocation),
            Operation::Return { value, .. } | Operation::Print { value, .. } => {
                value.iter().try_for_each(|value| self.expression(value))
            }
            Operation::Break { source_line } => self.inside_loop("break", source_line),
            Operation::Continue { source_line } => self.inside_loop("continue", source_line),
        }
    }

    fn loop_body(&mut self, body: &Operation) -> Result<(), SyntaxError> {
        self.loop_depth += 1;
        let result = self.operation(body);
        self.loop_depth -= 1;
        result
    }

    fn inside_loop(&self, statement: &'static str, source_line: &SourceLine) -> Result<(), SyntaxError> {
        if self.loop_depth == 0 {
            return Err(SyntaxError::new(
                source_line,
                SemanticError::OutsideLoop { statement },
            ));
        }
        Ok(())
    }

    fn invocation(&mut self, invocation: &FunctionInvocation) -> Result<(), SyntaxError> {
        if !self.functions.contains_key(&invocation.signature()) {
            return Err(SyntaxError::new(
                &invocation.source_line,
                SemanticError::UndefinedFunction {
                    name: invocation.name.to_string(),
                    arity: invocation.arguments.len(),
                },
            ));
        }
        invocation
            .arguments
            .iter()
            .try_for_each(|argument| self.expression(argument))
    }

    fn updatable(&mut self, target: &UpdatableExpression) -> Result<(), SyntaxError> {
        match target {
            UpdatableExpression::Variable(_) => Ok(()),
            UpdatableExpression::ArrayAccess(access) => {
                self.expression(&access.array)?;
                self.expression(&access.index)
            }
        }
    }

    fn expression(&mut self, expression: &Expression) -> Result<(), SyntaxError> {
        match expression {
            Expression::Constant { .. } | Expression::Variable(_) => Ok(()),
            Expression::ArrayAccess(access) => {
                self.expression(&access.array)?;
                self.expression(&access.index)
            }
            Expression::Unary { operand, .. } | Expression::Length { operand, .. } => {
                self.expression(operand)
            }
            Expression::Binary { left, right, .. } => {
                self.expression(left)?;
                self.expression(right)
            }
            Expression::Conditional {
                condition,
                then_value,
                else_value,
                ..
            } => {
                self.expression(condition)?;
                self.expression(then_value)?;
                self.expression(else_value)
            }
            Expression::Update { target, .. } => self.updatable(target),
            Expression::FunctionInvocation(invocation) => self.invocation(invocation),
            Expression::ArrayLiteral { elements, .. } => elements
                .iter()
                .try_for_each(|element| self.expression(element)),
            Expression::NewArray { length, .. } => self.expression(length),
        }
    }
}

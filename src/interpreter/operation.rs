use std::io::Write;

use crate::ast::{Block, Expression, Operation};
use crate::runtime::calculator;
use crate::runtime::execution::ExecutionContext;
use crate::runtime::value::Value;

use super::error::Abort;
use super::runtime::{Flow, InterpreterRuntime};

/// What a loop does after one execution of its body: `Some(flow)` leaves the
/// loop with `flow`, `None` goes on with the next iteration.
fn loop_exit(flow: Flow) -> Option<Flow> {
    match flow {
        Flow::Normal | Flow::Continue => None,
        Flow::Break => Some(Flow::Normal),
        Flow::Return(value) => Some(Flow::Return(value)),
    }
}

impl InterpreterRuntime<'_> {
    /// Executes one operation. Cancellation is checked first, so a terminated
    /// run executes nothing further.
    pub(super) fn execute(
        &mut self,
        operation: &Operation,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Flow, Abort> {
        if context.is_cancelled() {
            return Err(Abort::Terminated);
        }
        context.count_operation();

        match operation {
            Operation::Block(block) => self.execute_block(block, context),
            Operation::VariableDeclaration {
                variable,
                is_final,
                initializer,
                source_line,
            } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer, context)?,
                    None => Value::Null,
                };
                context
                    .declare(variable, value, *is_final)
                    .map_err(|error| Abort::failure(error, source_line, context))?;
                Ok(Flow::Normal)
            }
            Operation::Assignment {
                target,
                operator,
                value,
                source_line,
            } => {
                let place = self.place(target, context)?;
                let value = match operator {
                    None => self.evaluate(value, context)?,
                    Some(operator) => {
                        let current = self.read(&place, source_line, context)?;
                        let operand = self.evaluate(value, context)?;
                        calculator::binary(*operator, &current, &operand)
                            .map_err(|error| Abort::failure(error, source_line, context))?
                    }
                };
                self.assign(&place, value, source_line, context)?;
                Ok(Flow::Normal)
            }
            Operation::Update {
                operator,
                target,
                source_line,
            } => {
                self.update(*operator, target, source_line, context)?;
                Ok(Flow::Normal)
            }
            Operation::IfElse {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.condition(condition, context)? {
                    self.execute(then_branch, context)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, context)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Operation::While {
                condition, body, ..
            } => {
                while self.condition(condition, context)? {
                    if let Some(flow) = loop_exit(self.execute(body, context)?) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            Operation::DoWhile {
                body, condition, ..
            } => loop {
                if let Some(flow) = loop_exit(self.execute(body, context)?) {
                    return Ok(flow);
                }
                if !self.condition(condition, context)? {
                    return Ok(Flow::Normal);
                }
            },
            Operation::For {
                initializers,
                condition,
                updates,
                body,
                ..
            } => {
                // the initializers get a scope of their own around the loop
                context.push_scope();
                let flow = self.execute_for(initializers, condition.as_ref(), updates, body, context);
                context.pop_scope();
                flow
            }
            Operation::FunctionInvocation(invocation) => {
                self.invoke(invocation, context)?;
                Ok(Flow::Normal)
            }
            Operation::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value, context)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Operation::Break { .. } => Ok(Flow::Break),
            Operation::Continue { .. } => Ok(Flow::Continue),
            Operation::Print { value, newline, .. } => {
                if let Some(value) = value {
                    let value = self.evaluate(value, context)?;
                    write!(self.output, "{value}")?;
                }
                if *newline {
                    writeln!(self.output)?;
                }
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `operations` in order until one of them leaves the sequence.
    pub(super) fn execute_operations(
        &mut self,
        operations: &[Operation],
        context: &mut ExecutionContext<'_>,
    ) -> Result<Flow, Abort> {
        for operation in operations {
            match self.execute(operation, context)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_block(&mut self, block: &Block, context: &mut ExecutionContext<'_>) -> Result<Flow, Abort> {
        context.push_scope();
        let flow = self.execute_operations(&block.operations, context);
        context.pop_scope();
        flow
    }

    fn execute_for(
        &mut self,
        initializers: &[Operation],
        condition: Option<&Expression>,
        updates: &[Operation],
        body: &Operation,
        context: &mut ExecutionContext<'_>,
    ) -> Result<Flow, Abort> {
        for initializer in initializers {
            self.execute(initializer, context)?;
        }
        loop {
            if let Some(condition) = condition
                && !self.condition(condition, context)?
            {
                return Ok(Flow::Normal);
            }
            if let Some(flow) = loop_exit(self.execute(body, context)?) {
                return Ok(flow);
            }
            for update in updates {
                self.execute(update, context)?;
            }
        }
    }
}

use crate::ast::{BinaryOperator, Block, Expression, Operation, UpdatableExpression, Variable};
use crate::compiler::SyntaxError;
use crate::lexer::TokenKind;
use crate::source::SourceLine;

use super::{ParseError, ParseResult, Parser, PRINT, PRINTLN};

/// `Some(None)` for plain `=`, `Some(Some(op))` for a compound assignment.
fn assignment_operator(kind: &TokenKind<'_>) -> Option<Option<BinaryOperator>> {
    let operator = match kind {
        TokenKind::Assign => None,
        TokenKind::PlusAssign => Some(BinaryOperator::Add),
        TokenKind::MinusAssign => Some(BinaryOperator::Sub),
        TokenKind::StarAssign => Some(BinaryOperator::Mul),
        TokenKind::SlashAssign => Some(BinaryOperator::Div),
        TokenKind::PercentAssign => Some(BinaryOperator::Rem),
        TokenKind::AmpersandAssign => Some(BinaryOperator::BitAnd),
        TokenKind::PipeAssign => Some(BinaryOperator::BitOr),
        TokenKind::CaretAssign => Some(BinaryOperator::BitXor),
        TokenKind::ShiftLeftAssign => Some(BinaryOperator::ShiftLeft),
        TokenKind::ShiftRightAssign => Some(BinaryOperator::ShiftRight),
        TokenKind::UnsignedShiftAssign => Some(BinaryOperator::UnsignedShiftRight),
        _ => return None,
    };
    Some(operator)
}

impl<'a> Parser<'a> {
    /// `{ ... }`. The block's line is the line of its opening brace.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let source_line = self.expect(&TokenKind::LBrace, "to open a block")?.clone();
        let mut operations = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::RBrace) => {
                    self.advance();
                    break;
                }
                Some(_) => self.parse_statement(&mut operations)?,
                None => {
                    return Err(SyntaxError::new(
                        &self.end_line,
                        ParseError::UnterminatedBlock {
                            opened_at: source_line.number(),
                        },
                    ));
                }
            }
        }
        Ok(Block {
            operations,
            source_line,
        })
    }

    /// A statement directly inside a block, where declarations are allowed.
    fn parse_statement(&mut self, operations: &mut Vec<Operation>) -> ParseResult<()> {
        match self.peek_kind() {
            Some(TokenKind::Var | TokenKind::Final) => {
                let declarations = self.parse_declaration()?;
                self.expect(&TokenKind::Semicolon, "after variable declaration")?;
                operations.extend(declarations);
            }
            Some(TokenKind::Semicolon) => self.advance(),
            _ => operations.push(self.parse_operation()?),
        }
        Ok(())
    }

    /// Any statement except a declaration: loop bodies and `if` branches go through here.
    pub fn parse_operation(&mut self) -> ParseResult<Operation> {
        let Some(token) = self.peek() else {
            return Err(self.end_of_input("a statement"));
        };
        let source_line = token.source_line.clone();
        match &token.kind {
            TokenKind::LBrace => self.parse_block().map(Operation::Block),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Operation::Block(Block {
                    operations: Vec::new(),
                    source_line,
                }))
            }
            TokenKind::Var | TokenKind::Final => {
                Err(self.error_at(&source_line, ParseError::DeclarationNotAllowed))
            }
            TokenKind::If => self.parse_if(source_line),
            TokenKind::While => {
                self.advance();
                let condition = self.parse_condition("while")?;
                let body = self.parse_operation()?;
                Ok(Operation::While {
                    condition,
                    body: Box::new(body),
                    source_line,
                })
            }
            TokenKind::Do => self.parse_do_while(source_line),
            TokenKind::For => self.parse_for(source_line),
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(&TokenKind::Semicolon, "after 'return'")?;
                Ok(Operation::Return { value, source_line })
            }
            TokenKind::Break => {
                self.advance();
                self.expect(&TokenKind::Semicolon, "after 'break'")?;
                Ok(Operation::Break { source_line })
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(&TokenKind::Semicolon, "after 'continue'")?;
                Ok(Operation::Continue { source_line })
            }
            TokenKind::Identifier(name)
                if (*name == PRINT || *name == PRINTLN)
                    && self.peek_kind_at(1) == Some(&TokenKind::LParen) =>
            {
                let newline = *name == PRINTLN;
                self.parse_print(newline, source_line)
            }
            _ => {
                let operation = self.parse_simple_operation()?;
                self.expect(&TokenKind::Semicolon, "after statement")?;
                Ok(operation)
            }
        }
    }

    /// `var a = 1, b` or `final var c = 2`, without the trailing `;`.
    fn parse_declaration(&mut self) -> ParseResult<Vec<Operation>> {
        let is_final = self.match_token(&TokenKind::Final);
        self.expect(&TokenKind::Var, "after 'final'")?;
        let mut declarations = Vec::new();
        loop {
            let (name, source_line) = self.expect_identifier("variable name")?;
            let initializer = if self.match_token(&TokenKind::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            if is_final && initializer.is_none() {
                return Err(self.error_at(
                    source_line,
                    ParseError::MissingFinalInitializer {
                        name: name.to_string(),
                    },
                ));
            }
            declarations.push(Operation::VariableDeclaration {
                variable: Variable::new(name),
                is_final,
                initializer,
                source_line: source_line.clone(),
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(declarations)
    }

    /// Assignment, update or invocation without the trailing `;`.
    ///
    /// `x++` and `--x` used as statements become [`Operation::Update`].
    fn parse_simple_operation(&mut self) -> ParseResult<Operation> {
        let source_line = self.current_line();
        let expression = self.parse_expression()?;

        if let Some(operator) = self.peek_kind().and_then(assignment_operator) {
            self.advance();
            let target = UpdatableExpression::try_from(expression).map_err(|rejected| {
                self.error_at(rejected.source_line(), ParseError::InvalidAssignmentTarget)
            })?;
            let value = self.parse_expression()?;
            return Ok(Operation::Assignment {
                target,
                operator,
                value,
                source_line,
            });
        }

        match expression {
            Expression::Update {
                operator,
                target,
                source_line,
                ..
            } => Ok(Operation::Update {
                operator,
                target: *target,
                source_line,
            }),
            Expression::FunctionInvocation(invocation) => {
                Ok(Operation::FunctionInvocation(invocation))
            }
            other => Err(self.error_at(other.source_line(), ParseError::NotAStatement)),
        }
    }

    /// Comma separated simple operations, as used by `for` headers.
    fn parse_simple_operations(&mut self) -> ParseResult<Vec<Operation>> {
        let mut operations = vec![self.parse_simple_operation()?];
        while self.match_token(&TokenKind::Comma) {
            operations.push(self.parse_simple_operation()?);
        }
        Ok(operations)
    }

    /// `(condition)` following `if`, `while` or the `while` of a `do` loop.
    fn parse_condition(&mut self, statement: &'static str) -> ParseResult<Expression> {
        self.expect(&TokenKind::LParen, &format!("after '{statement}'"))?;
        if let Some(token) = self.peek()
            && token.kind == TokenKind::RParen
        {
            return Err(self.error_at(token.source_line, ParseError::MissingCondition { statement }));
        }
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen, &format!("after '{statement}' condition"))?;
        Ok(condition)
    }

    fn parse_if(&mut self, source_line: SourceLine) -> ParseResult<Operation> {
        self.advance();
        let condition = self.parse_condition("if")?;
        let then_branch = self.parse_operation()?;
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_operation()?))
        } else {
            None
        };
        Ok(Operation::IfElse {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
            source_line,
        })
    }

    fn parse_do_while(&mut self, source_line: SourceLine) -> ParseResult<Operation> {
        self.advance();
        let body = self.parse_operation()?;
        self.expect(&TokenKind::While, "after 'do' body")?;
        let condition = self.parse_condition("while")?;
        self.expect(&TokenKind::Semicolon, "after 'do-while' statement")?;
        Ok(Operation::DoWhile {
            body: Box::new(body),
            condition,
            source_line,
        })
    }

    /// `for (init; condition; update) body`; each of the three parts may be empty.
    fn parse_for(&mut self, source_line: SourceLine) -> ParseResult<Operation> {
        self.advance();
        self.expect(&TokenKind::LParen, "after 'for'")?;

        let initializers = match self.peek_kind() {
            Some(TokenKind::Var | TokenKind::Final) => self.parse_declaration()?,
            Some(TokenKind::Semicolon) => Vec::new(),
            _ => self.parse_simple_operations()?,
        };
        self.expect(&TokenKind::Semicolon, "after 'for' initializer")?;

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "after 'for' condition")?;

        let updates = if self.check(&TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_simple_operations()?
        };
        self.expect(&TokenKind::RParen, "after 'for' update")?;

        let body = self.parse_operation()?;
        Ok(Operation::For {
            initializers,
            condition,
            updates,
            body: Box::new(body),
            source_line,
        })
    }

    /// `print(value);` takes exactly one argument, `println(value?);` at most one.
    fn parse_print(&mut self, newline: bool, source_line: SourceLine) -> ParseResult<Operation> {
        self.advance();
        self.advance();
        let mut arguments = self.parse_arguments()?;
        let (name, expected, valid) = if newline {
            (PRINTLN, "at most one argument", arguments.len() <= 1)
        } else {
            (PRINT, "exactly one argument", arguments.len() == 1)
        };
        if !valid {
            return Err(self.error_at(
                &source_line,
                ParseError::BuiltinArity {
                    name,
                    expected,
                    found: arguments.len(),
                },
            ));
        }
        self.expect(&TokenKind::Semicolon, "after statement")?;
        Ok(Operation::Print {
            value: arguments.pop(),
            newline,
            source_line,
        })
    }
}

use std::sync::Arc;

use crate::ast::{
    ArrayAccessExpression, BinaryOperator, Expression, FunctionInvocation, Literal,
    UnaryOperator, UpdatableExpression, UpdateOperator, Variable, VariableExpression,
};
use crate::lexer::TokenKind;

use super::{ParseError, ParseResult, Parser};

/// Binding power of each binary operator; higher binds tighter.
fn binary_operator(kind: &TokenKind<'_>) -> Option<(BinaryOperator, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOperator::Or, 1),
        TokenKind::And => (BinaryOperator::And, 2),
        TokenKind::Pipe => (BinaryOperator::BitOr, 3),
        TokenKind::Caret => (BinaryOperator::BitXor, 4),
        TokenKind::Ampersand => (BinaryOperator::BitAnd, 5),
        TokenKind::Equal => (BinaryOperator::Equal, 6),
        TokenKind::NotEqual => (BinaryOperator::NotEqual, 6),
        TokenKind::Less => (BinaryOperator::Less, 7),
        TokenKind::LessEqual => (BinaryOperator::LessEqual, 7),
        TokenKind::Greater => (BinaryOperator::Greater, 7),
        TokenKind::GreaterEqual => (BinaryOperator::GreaterEqual, 7),
        TokenKind::ShiftLeft => (BinaryOperator::ShiftLeft, 8),
        TokenKind::ShiftRight => (BinaryOperator::ShiftRight, 8),
        TokenKind::UnsignedShiftRight => (BinaryOperator::UnsignedShiftRight, 8),
        TokenKind::Plus => (BinaryOperator::Add, 9),
        TokenKind::Minus => (BinaryOperator::Sub, 9),
        TokenKind::Star => (BinaryOperator::Mul, 10),
        TokenKind::Slash => (BinaryOperator::Div, 10),
        TokenKind::Percent => (BinaryOperator::Rem, 10),
        _ => return None,
    };
    Some(entry)
}

fn unary_operator(kind: &TokenKind<'_>) -> Option<UnaryOperator> {
    match kind {
        TokenKind::Minus => Some(UnaryOperator::Minus),
        TokenKind::Plus => Some(UnaryOperator::Plus),
        TokenKind::Not => Some(UnaryOperator::Not),
        TokenKind::Tilde => Some(UnaryOperator::BitwiseInverse),
        TokenKind::TypeOf => Some(UnaryOperator::TypeOf),
        _ => None,
    }
}

fn update_operator(kind: &TokenKind<'_>) -> Option<UpdateOperator> {
    match kind {
        TokenKind::Increment => Some(UpdateOperator::Increment),
        TokenKind::Decrement => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

/// Tokens that extend the primary expression before them.
fn continues_postfix(kind: &TokenKind<'_>) -> bool {
    matches!(kind, TokenKind::LBracket | TokenKind::Dot) || update_operator(kind).is_some()
}

impl<'a> Parser<'a> {
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_conditional()
    }

    /// `condition ? a : b`, right-associative and below every binary operator.
    fn parse_conditional(&mut self) -> ParseResult<Expression> {
        let condition = self.parse_binary(1)?;
        let Some(source_line) = self
            .peek()
            .filter(|token| token.kind == TokenKind::Question)
            .map(|token| token.source_line.clone())
        else {
            return Ok(condition);
        };
        self.advance();
        let then_value = self.parse_expression()?;
        self.expect(&TokenKind::Colon, "in conditional expression")?;
        let else_value = self.parse_conditional()?;
        Ok(Expression::Conditional {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
            source_line,
        })
    }

    /// Precedence climbing: operators below `min_precedence` are left to the caller.
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let Some((operator, precedence)) = binary_operator(&token.kind) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            let source_line = token.source_line.clone();
            self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = Expression::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                source_line,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.peek() else {
            return Err(self.end_of_input("an expression"));
        };
        let source_line = token.source_line.clone();

        // `-2147483648` is one literal; its magnitude alone is out of range.
        if token.kind == TokenKind::Minus
            && let Some(&TokenKind::Integer(magnitude)) = self.peek_kind_at(1)
            && !self.peek_kind_at(2).is_some_and(continues_postfix)
        {
            let value = i32::try_from(-magnitude).map_err(|_| {
                self.error_at(
                    &source_line,
                    ParseError::IntegerOutOfRange {
                        literal: format!("-{magnitude}"),
                    },
                )
            })?;
            self.advance();
            self.advance();
            return Ok(Expression::Constant {
                value: Literal::Integer(value),
                source_line,
            });
        }

        if let Some(operator) = unary_operator(&token.kind) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary {
                operator,
                operand: Box::new(operand),
                source_line,
            });
        }

        if let Some(operator) = update_operator(&token.kind) {
            self.advance();
            let operand = self.parse_unary()?;
            let target = self.updatable(operand, operator)?;
            return Ok(Expression::Update {
                operator,
                prefix: true,
                target: Box::new(target),
                source_line,
            });
        }

        self.parse_postfix()
    }

    /// Array access, `.length` and postfix `++`/`--` bind tighter than any prefix operator.
    fn parse_postfix(&mut self) -> ParseResult<Expression> {
        let mut expression = self.parse_primary()?;
        while let Some(token) = self.peek() {
            let source_line = token.source_line.clone();
            match &token.kind {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket, "to close array index")?;
                    expression = Expression::ArrayAccess(ArrayAccessExpression {
                        array: Box::new(expression),
                        index: Box::new(index),
                        source_line,
                    });
                }
                TokenKind::Dot => {
                    self.advance();
                    match self.peek_kind() {
                        Some(TokenKind::Identifier("length")) => {
                            self.advance();
                        }
                        _ => return Err(self.expected("'length' after '.'")),
                    }
                    expression = Expression::Length {
                        operand: Box::new(expression),
                        source_line,
                    };
                }
                kind => {
                    let Some(operator) = update_operator(kind) else {
                        break;
                    };
                    self.advance();
                    let target = self.updatable(expression, operator)?;
                    return Ok(Expression::Update {
                        operator,
                        prefix: false,
                        target: Box::new(target),
                        source_line,
                    });
                }
            }
        }
        Ok(expression)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let Some(token) = self.next_token() else {
            return Err(self.end_of_input("an expression"));
        };
        let source_line = token.source_line;
        let constant = |value: Literal| Expression::Constant {
            value,
            source_line: source_line.clone(),
        };
        let expression = match token.kind {
            TokenKind::Integer(value) => match i32::try_from(value) {
                Ok(value) => constant(Literal::Integer(value)),
                Err(_) => {
                    let literal = value.to_string();
                    return Err(self.error_at(source_line, ParseError::IntegerOutOfRange { literal }));
                }
            },
            TokenKind::Double(value) => constant(Literal::Double(value)),
            TokenKind::String(value) => constant(Literal::String(Arc::from(value.as_ref()))),
            TokenKind::True => constant(Literal::Boolean(true)),
            TokenKind::False => constant(Literal::Boolean(false)),
            TokenKind::Null => constant(Literal::Null),
            TokenKind::Identifier(name) => {
                if self.match_token(&TokenKind::LParen) {
                    let arguments = self.parse_arguments()?;
                    Expression::FunctionInvocation(FunctionInvocation {
                        name: Arc::from(name),
                        arguments,
                        source_line: source_line.clone(),
                    })
                } else {
                    Expression::Variable(VariableExpression {
                        variable: Variable::new(name),
                        source_line: source_line.clone(),
                    })
                }
            }
            TokenKind::LParen => {
                let expression = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "to close '('")?;
                expression
            }
            TokenKind::LBrace => {
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    loop {
                        elements.push(self.parse_expression()?);
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RBrace, "to close array literal")?;
                Expression::ArrayLiteral {
                    elements,
                    source_line: source_line.clone(),
                }
            }
            TokenKind::New => {
                let (element_type, _) = self.expect_identifier("array element type after 'new'")?;
                self.expect(&TokenKind::LBracket, "after array element type")?;
                let length = self.parse_expression()?;
                self.expect(&TokenKind::RBracket, "to close array length")?;
                Expression::NewArray {
                    element_type: Arc::from(element_type),
                    length: Box::new(length),
                    source_line: source_line.clone(),
                }
            }
            other => {
                let found = other.to_string();
                return Err(self.error_at(source_line, ParseError::ExpectedExpression { found }));
            }
        };
        Ok(expression)
    }

    /// Arguments after the opening `(` up to and including the closing `)`.
    pub(super) fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        let mut arguments = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "to close the argument list")?;
        Ok(arguments)
    }

    fn updatable(
        &self,
        expression: Expression,
        operator: UpdateOperator,
    ) -> ParseResult<UpdatableExpression> {
        UpdatableExpression::try_from(expression).map_err(|rejected| {
            self.error_at(
                rejected.source_line(),
                ParseError::InvalidUpdateTarget {
                    operator: operator.symbol(),
                },
            )
        })
    }
}

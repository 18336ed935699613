//! Recursive-descent parser over the token stream of one module.
//!
//! Each public `parse_*` method consumes exactly one construct and leaves the
//! cursor on the first token after it. Expressions live in [`expression`],
//! statements in [`operation`].

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::ast::Variable;
use crate::compiler::SyntaxError;
use crate::lexer::{Token, TokenKind};
use crate::program::DeveloperFunction;
use crate::source::SourceLine;

pub mod error;
mod expression;
mod operation;

pub use error::ParseError;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Builtin output functions; their names cannot be declared.
pub(crate) const PRINT: &str = "print";
pub(crate) const PRINTLN: &str = "println";

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    end_line: SourceLine,
}

impl<'a> Parser<'a> {
    /// `end_line` is reported when the module ends in the middle of a construct.
    pub fn new(tokens: Vec<Token<'a>>, end_line: SourceLine) -> Self {
        Self {
            tokens,
            position: 0,
            end_line,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Parses every function declaration of the module.
    pub fn parse_module(mut self) -> ParseResult<Vec<DeveloperFunction>> {
        let mut functions = Vec::new();
        while !self.is_at_end() {
            functions.push(self.parse_function()?);
        }
        Ok(functions)
    }

    /// `function name(p1, p2) { ... }`
    pub fn parse_function(&mut self) -> ParseResult<DeveloperFunction> {
        let source_line = match self.peek() {
            Some(token) if token.kind == TokenKind::Function => token.source_line.clone(),
            Some(token) => {
                return Err(self.error_at(
                    token.source_line,
                    ParseError::ExpectedFunctionDeclaration {
                        found: token.kind.to_string(),
                    },
                ));
            }
            None => return Err(self.end_of_input("'function' declaration")),
        };
        self.advance();

        let (name, name_line) = self.expect_identifier("function name after 'function'")?;
        if name == PRINT || name == PRINTLN {
            return Err(self.error_at(
                name_line,
                ParseError::ReservedFunctionName {
                    name: name.to_string(),
                },
            ));
        }

        self.expect(&TokenKind::LParen, "after function name")?;
        let mut parameters = Vec::new();
        let mut seen = FxHashSet::default();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (parameter, line) = self.expect_identifier("parameter name")?;
                if !seen.insert(parameter) {
                    return Err(self.error_at(
                        line,
                        ParseError::DuplicateParameter {
                            name: parameter.to_string(),
                            function: name.to_string(),
                        },
                    ));
                }
                parameters.push(Variable::new(parameter));
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "to close the parameter list")?;

        if !self.check(&TokenKind::LBrace) {
            return Err(self.expected("'{' to open the function body"));
        }
        let body = self.parse_block()?;

        Ok(DeveloperFunction {
            name: Arc::from(name),
            parameters,
            body,
            source_line,
        })
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<&TokenKind<'a>> {
        self.peek().map(Token::kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind<'a>> {
        self.tokens.get(self.position + offset).map(Token::kind)
    }

    fn check(&self, kind: &TokenKind<'_>) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        let token = self.peek().cloned()?;
        self.position += 1;
        Some(token)
    }

    fn match_token(&mut self, kind: &TokenKind<'_>) -> bool {
        if self.check(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consumes `kind` and returns the line it was on.
    fn expect(&mut self, kind: &TokenKind<'_>, context: &str) -> ParseResult<&'a SourceLine> {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                let line = token.source_line;
                self.position += 1;
                Ok(line)
            }
            _ => Err(self.expected(&format!("'{kind}' {context}"))),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<(&'a str, &'a SourceLine)> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                source_line,
            }) => {
                let found = (*name, *source_line);
                self.position += 1;
                Ok(found)
            }
            _ => Err(self.expected(what)),
        }
    }

    /// Line of the next token, or the module's last line at the end of input.
    fn current_line(&self) -> SourceLine {
        self.peek()
            .map(|token| token.source_line.clone())
            .unwrap_or_else(|| self.end_line.clone())
    }

    fn expected(&self, expected: &str) -> SyntaxError {
        match self.peek() {
            Some(token) => self.error_at(
                token.source_line,
                ParseError::ExpectedToken {
                    expected: expected.to_string(),
                    found: token.kind.to_string(),
                },
            ),
            None => self.end_of_input(expected),
        }
    }

    fn end_of_input(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            &self.end_line,
            ParseError::UnexpectedEndOfInput {
                expected: expected.to_string(),
            },
        )
    }

    fn error_at(&self, line: &SourceLine, error: ParseError) -> SyntaxError {
        SyntaxError::new(line, error)
    }
}

/// Parses a module's full token stream into its function declarations.
pub fn parse_tokens(tokens: Vec<Token<'_>>, end_line: SourceLine) -> ParseResult<Vec<DeveloperFunction>> {
    Parser::new(tokens, end_line).parse_module()
}

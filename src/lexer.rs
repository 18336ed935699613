//! Line-at-a-time tokenizer.
//!
//! A `/* ... */` comment may straddle lines, so every call receives the comment
//! state left behind by the previous line and returns the state for the next one.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::CharIndices;

pub mod error;
pub mod token;

pub use error::{LexError, LexResult};
pub use token::{Token, TokenKind};

use crate::source::SourceLine;

/// Largest integer literal the lexer accepts: the magnitude of `i32::MIN`.
pub const MAX_INTEGER_MAGNITUDE: i64 = 1 << 31;

/// Tokens of one line plus the comment state carried into the next line.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedLine<'a> {
    pub tokens: Vec<Token<'a>>,
    pub multi_line_comment: bool,
}

pub struct Lexer<'a> {
    line: &'a SourceLine,
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    multi_line_comment: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a SourceLine, multi_line_comment: bool) -> Self {
        let input = line.content();
        Self {
            line,
            input,
            chars: input.char_indices().peekable(),
            multi_line_comment,
        }
    }

    pub fn tokenize(mut self) -> LexResult<TokenizedLine<'a>> {
        let mut tokens = Vec::new();
        while let Some(kind) = self.next_kind()? {
            tokens.push(Token::new(kind, self.line));
        }
        Ok(TokenizedLine {
            tokens,
            multi_line_comment: self.multi_line_comment,
        })
    }

    fn next_kind(&mut self) -> LexResult<Option<TokenKind<'a>>> {
        loop {
            if self.multi_line_comment && !self.skip_comment_body() {
                return Ok(None);
            }
            self.skip_whitespace();

            let Some(&(start, ch)) = self.chars.peek() else {
                return Ok(None);
            };
            if ch == '/' {
                match self.peek_second() {
                    Some('/') => {
                        // The rest of the line is a comment.
                        while self.chars.next().is_some() {}
                        return Ok(None);
                    }
                    Some('*') => {
                        self.chars.next();
                        self.chars.next();
                        self.multi_line_comment = true;
                        continue;
                    }
                    _ => {}
                }
            }

            let kind = match ch {
                '"' => self.read_string()?,
                c if c.is_ascii_digit() => self.read_number(start)?,
                c if c.is_alphabetic() || c == '_' || c == '$' => self.read_identifier(start),
                _ => self.read_operator()?,
            };
            return Ok(Some(kind));
        }
    }

    /// Consumes comment text up to and including `*/`. Returns `false` when the
    /// line ends first.
    fn skip_comment_body(&mut self) -> bool {
        while let Some((_, c)) = self.chars.next() {
            if c == '*' && self.match_char('/') {
                self.multi_line_comment = false;
                return true;
            }
        }
        false
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }

    fn read_identifier(&mut self, start: usize) -> TokenKind<'a> {
        self.chars.next();
        while self
            .chars
            .next_if(|&(_, c)| c.is_alphanumeric() || c == '_' || c == '$')
            .is_some()
        {}
        let end = self.current_index();
        let ident = &self.input[start..end];
        TokenKind::keyword(ident).unwrap_or(TokenKind::Identifier(ident))
    }

    fn read_number(&mut self, start: usize) -> LexResult<TokenKind<'a>> {
        let mut is_double = false;
        self.consume_digits();
        if self.peek_char() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit())
        {
            is_double = true;
            self.chars.next();
            self.consume_digits();
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            lookahead.next_if(|&(_, c)| c == '+' || c == '-');
            if lookahead.peek().is_some_and(|&(_, c)| c.is_ascii_digit()) {
                is_double = true;
                self.chars = lookahead;
                self.consume_digits();
            }
        }

        // `12abc` is one malformed literal, not a number followed by a name.
        if self
            .chars
            .next_if(|&(_, c)| c.is_alphanumeric() || c == '_')
            .is_some()
        {
            let end = self.current_index();
            return Err(LexError::InvalidNumberLiteral {
                literal: self.input[start..end].to_string(),
            });
        }

        let end = self.current_index();
        let literal = &self.input[start..end];
        if is_double {
            literal
                .parse::<f64>()
                .map(TokenKind::Double)
                .map_err(|_| LexError::InvalidNumberLiteral {
                    literal: literal.to_string(),
                })
        } else {
            literal
                .parse::<i64>()
                .ok()
                .filter(|&value| value <= MAX_INTEGER_MAGNITUDE)
                .map(TokenKind::Integer)
                .ok_or_else(|| LexError::IntegerOutOfRange {
                    literal: literal.to_string(),
                })
        }
    }

    fn read_string(&mut self) -> LexResult<TokenKind<'a>> {
        self.chars.next(); // Consume opening quote
        let content_start = self.current_index();
        let mut escaped: Option<String> = None;
        while let Some((idx, c)) = self.chars.next() {
            match c {
                '"' => {
                    let value = match escaped {
                        Some(owned) => Cow::Owned(owned),
                        None => Cow::Borrowed(&self.input[content_start..idx]),
                    };
                    return Ok(TokenKind::String(value));
                }
                '\\' => {
                    let buffer = escaped
                        .get_or_insert_with(|| self.input[content_start..idx].to_string());
                    let Some((_, next)) = self.chars.next() else {
                        return Err(LexError::UnterminatedString);
                    };
                    buffer.push(match next {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '"' => '"',
                        '\'' => '\'',
                        '\\' => '\\',
                        other => return Err(LexError::InvalidEscape { character: other }),
                    });
                }
                other => {
                    if let Some(buffer) = escaped.as_mut() {
                        buffer.push(other);
                    }
                }
            }
        }
        Err(LexError::UnterminatedString)
    }

    fn read_operator(&mut self) -> LexResult<TokenKind<'a>> {
        let Some((_, ch)) = self.chars.next() else {
            return Err(LexError::UnexpectedCharacter { character: '\0' });
        };
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,
            '+' if self.match_char('+') => TokenKind::Increment,
            '+' if self.match_char('=') => TokenKind::PlusAssign,
            '+' => TokenKind::Plus,
            '-' if self.match_char('-') => TokenKind::Decrement,
            '-' if self.match_char('=') => TokenKind::MinusAssign,
            '-' => TokenKind::Minus,
            '*' if self.match_char('=') => TokenKind::StarAssign,
            '*' => TokenKind::Star,
            '/' if self.match_char('=') => TokenKind::SlashAssign,
            '/' => TokenKind::Slash,
            '%' if self.match_char('=') => TokenKind::PercentAssign,
            '%' => TokenKind::Percent,
            '=' if self.match_char('=') => TokenKind::Equal,
            '=' => TokenKind::Assign,
            '!' if self.match_char('=') => TokenKind::NotEqual,
            '!' => TokenKind::Not,
            '&' if self.match_char('&') => TokenKind::And,
            '&' if self.match_char('=') => TokenKind::AmpersandAssign,
            '&' => TokenKind::Ampersand,
            '|' if self.match_char('|') => TokenKind::Or,
            '|' if self.match_char('=') => TokenKind::PipeAssign,
            '|' => TokenKind::Pipe,
            '^' if self.match_char('=') => TokenKind::CaretAssign,
            '^' => TokenKind::Caret,
            '<' if self.match_char('<') => {
                if self.match_char('=') {
                    TokenKind::ShiftLeftAssign
                } else {
                    TokenKind::ShiftLeft
                }
            }
            '<' if self.match_char('=') => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.match_char('>') => {
                if self.match_char('>') {
                    if self.match_char('=') {
                        TokenKind::UnsignedShiftAssign
                    } else {
                        TokenKind::UnsignedShiftRight
                    }
                } else if self.match_char('=') {
                    TokenKind::ShiftRightAssign
                } else {
                    TokenKind::ShiftRight
                }
            }
            '>' if self.match_char('=') => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            other => return Err(LexError::UnexpectedCharacter { character: other }),
        };
        Ok(kind)
    }

    fn consume_digits(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}
    }

    fn match_char(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.next().map(|(_, c)| c)
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

/// Tokenizes one source line given whether a `/*` comment is still open.
pub fn tokenize(line: &SourceLine, multi_line_comment: bool) -> LexResult<TokenizedLine<'_>> {
    Lexer::new(line, multi_line_comment).tokenize()
}

use std::borrow::Cow;
use std::fmt;

use crate::source::SourceLine;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    Identifier(&'a str),
    /// Magnitude of an integer literal. `2147483648` is only valid after a
    /// unary minus, which the parser checks.
    Integer(i64),
    Double(f64),
    String(Cow<'a, str>),
    True,
    False,
    Null,

    // Keywords
    Var,
    Final,
    Function,
    Return,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    New,
    TypeOf,

    // Operators
    Assign,              // =
    PlusAssign,          // +=
    MinusAssign,         // -=
    StarAssign,          // *=
    SlashAssign,         // /=
    PercentAssign,       // %=
    AmpersandAssign,     // &=
    PipeAssign,          // |=
    CaretAssign,         // ^=
    ShiftLeftAssign,     // <<=
    ShiftRightAssign,    // >>=
    UnsignedShiftAssign, // >>>=
    Plus,                // +
    Minus,               // -
    Star,                // *
    Slash,               // /
    Percent,             // %
    Increment,           // ++
    Decrement,           // --
    Equal,               // ==
    NotEqual,            // !=
    Less,                // <
    LessEqual,           // <=
    Greater,             // >
    GreaterEqual,        // >=
    And,                 // &&
    Or,                  // ||
    Not,                 // !
    Tilde,               // ~
    Ampersand,           // &
    Pipe,                // |
    Caret,               // ^
    ShiftLeft,           // <<
    ShiftRight,          // >>
    UnsignedShiftRight,  // >>>
    Question,            // ?

    // Delimiters
    Colon,     // :
    Semicolon, // ;
    Comma,     // ,
    Dot,       // .
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }
}

impl TokenKind<'_> {
    pub(crate) fn keyword(ident: &str) -> Option<TokenKind<'static>> {
        let kind = match ident {
            "var" => TokenKind::Var,
            "final" => TokenKind::Final,
            "function" => TokenKind::Function,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "new" => TokenKind::New,
            "typeof" => TokenKind::TypeOf,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    /// Source spelling of fixed tokens; literals and identifiers render their value.
    pub fn lexeme(&self) -> Cow<'_, str> {
        let fixed = match self {
            TokenKind::Identifier(name) => return Cow::Borrowed(*name),
            TokenKind::Integer(value) => return Cow::Owned(value.to_string()),
            TokenKind::Double(value) => return Cow::Owned(format!("{value:?}")),
            TokenKind::String(value) => return Cow::Owned(format!("\"{value}\"")),
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Var => "var",
            TokenKind::Final => "final",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::New => "new",
            TokenKind::TypeOf => "typeof",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PercentAssign => "%=",
            TokenKind::AmpersandAssign => "&=",
            TokenKind::PipeAssign => "|=",
            TokenKind::CaretAssign => "^=",
            TokenKind::ShiftLeftAssign => "<<=",
            TokenKind::ShiftRightAssign => ">>=",
            TokenKind::UnsignedShiftAssign => ">>>=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::Tilde => "~",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::UnsignedShiftRight => ">>>",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
        };
        Cow::Borrowed(fixed)
    }
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme())
    }
}

/// A lexical unit together with the line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub source_line: &'a SourceLine,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, source_line: &'a SourceLine) -> Self {
        Self { kind, source_line }
    }

    pub fn kind(&self) -> &TokenKind<'a> {
        &self.kind
    }
}

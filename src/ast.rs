//! Syntax tree produced by the parser and walked by the interpreter.
//!
//! Both [`Expression`] and [`Operation`] are closed enums: the interpreter matches
//! them exhaustively, so a node kind without runtime semantics cannot be built.
//! Every node that can fail at runtime carries the [`SourceLine`] it came from.

use std::fmt;
use std::sync::Arc;

use crate::program::FunctionSignature;
use crate::source::SourceLine;

/// A named binding slot.
///
/// Two variables with the same name declared in different scopes are distinct
/// bindings; the scope that declares a variable owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: Arc<str>,
}

impl Variable {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i32),
    Double(f64),
    String(Arc<str>),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitwiseInverse,
    TypeOf,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitwiseInverse => "~",
            Self::TypeOf => "typeof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl UpdateOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    /// The binary operator an update applies with a right operand of `1`.
    pub fn binary_operator(self) -> BinaryOperator {
        match self {
            Self::Increment => BinaryOperator::Add,
            Self::Decrement => BinaryOperator::Sub,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    pub variable: Variable,
    pub source_line: SourceLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccessExpression {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
    pub source_line: SourceLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInvocation {
    pub name: Arc<str>,
    pub arguments: Vec<Expression>,
    pub source_line: SourceLine,
}

impl FunctionInvocation {
    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature::new(self.name.clone(), self.arguments.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant {
        value: Literal,
        source_line: SourceLine,
    },
    Variable(VariableExpression),
    ArrayAccess(ArrayAccessExpression),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
        source_line: SourceLine,
    },
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
        source_line: SourceLine,
    },
    Conditional {
        condition: Box<Expression>,
        then_value: Box<Expression>,
        else_value: Box<Expression>,
        source_line: SourceLine,
    },
    /// `++x`, `x--` and friends used as a value.
    Update {
        operator: UpdateOperator,
        prefix: bool,
        target: Box<UpdatableExpression>,
        source_line: SourceLine,
    },
    FunctionInvocation(FunctionInvocation),
    ArrayLiteral {
        elements: Vec<Expression>,
        source_line: SourceLine,
    },
    NewArray {
        element_type: Arc<str>,
        length: Box<Expression>,
        source_line: SourceLine,
    },
    Length {
        operand: Box<Expression>,
        source_line: SourceLine,
    },
}

impl Expression {
    pub fn source_line(&self) -> &SourceLine {
        match self {
            Expression::Variable(expression) => &expression.source_line,
            Expression::ArrayAccess(expression) => &expression.source_line,
            Expression::FunctionInvocation(invocation) => &invocation.source_line,
            Expression::Constant { source_line, .. }
            | Expression::Unary { source_line, .. }
            | Expression::Binary { source_line, .. }
            | Expression::Conditional { source_line, .. }
            | Expression::Update { source_line, .. }
            | Expression::ArrayLiteral { source_line, .. }
            | Expression::NewArray { source_line, .. }
            | Expression::Length { source_line, .. } => source_line,
        }
    }
}

/// The expressions a value can be written to.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatableExpression {
    Variable(VariableExpression),
    ArrayAccess(ArrayAccessExpression),
}

impl UpdatableExpression {
    pub fn source_line(&self) -> &SourceLine {
        match self {
            UpdatableExpression::Variable(expression) => &expression.source_line,
            UpdatableExpression::ArrayAccess(expression) => &expression.source_line,
        }
    }
}

impl TryFrom<Expression> for UpdatableExpression {
    /// The rejected expression is handed back for error reporting.
    type Error = Expression;

    fn try_from(expression: Expression) -> Result<Self, Self::Error> {
        match expression {
            Expression::Variable(variable) => Ok(UpdatableExpression::Variable(variable)),
            Expression::ArrayAccess(access) => Ok(UpdatableExpression::ArrayAccess(access)),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub operations: Vec<Operation>,
    pub source_line: SourceLine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Block(Block),
    VariableDeclaration {
        variable: Variable,
        is_final: bool,
        initializer: Option<Expression>,
        source_line: SourceLine,
    },
    /// `target = value`, or a compound form such as `target += value` when
    /// `operator` is set.
    Assignment {
        target: UpdatableExpression,
        operator: Option<BinaryOperator>,
        value: Expression,
        source_line: SourceLine,
    },
    /// `x++;` or `--a[i];` used as a statement.
    Update {
        operator: UpdateOperator,
        target: UpdatableExpression,
        source_line: SourceLine,
    },
    IfElse {
        condition: Expression,
        then_branch: Box<Operation>,
        else_branch: Option<Box<Operation>>,
        source_line: SourceLine,
    },
    While {
        condition: Expression,
        body: Box<Operation>,
        source_line: SourceLine,
    },
    DoWhile {
        body: Box<Operation>,
        condition: Expression,
        source_line: SourceLine,
    },
    For {
        initializers: Vec<Operation>,
        condition: Option<Expression>,
        updates: Vec<Operation>,
        body: Box<Operation>,
        source_line: SourceLine,
    },
    FunctionInvocation(FunctionInvocation),
    Return {
        value: Option<Expression>,
        source_line: SourceLine,
    },
    Break {
        source_line: SourceLine,
    },
    Continue {
        source_line: SourceLine,
    },
    Print {
        value: Option<Expression>,
        newline: bool,
        source_line: SourceLine,
    },
}

impl Operation {
    pub fn source_line(&self) -> &SourceLine {
        match self {
            Operation::Block(block) => &block.source_line,
            Operation::FunctionInvocation(invocation) => &invocation.source_line,
            Operation::VariableDeclaration { source_line, .. }
            | Operation::Assignment { source_line, .. }
            | Operation::Update { source_line, .. }
            | Operation::IfElse { source_line, .. }
            | Operation::While { source_line, .. }
            | Operation::DoWhile { source_line, .. }
            | Operation::For { source_line, .. }
            | Operation::Return { source_line, .. }
            | Operation::Break { source_line }
            | Operation::Continue { source_line }
            | Operation::Print { source_line, .. } => source_line,
        }
    }
}

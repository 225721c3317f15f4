//! Abstract Syntax Tree (AST) definitions for scripts.

/// A complete script program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Statement>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (var, let, const)
    VariableDeclaration(VariableDeclaration),
    /// Expression statement
    Expression(Expression),
    /// Throw statement
    Throw(Expression),
    /// Empty statement (;)
    Empty,
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The kind of declaration
    pub kind: VariableKind,
    /// The declared name
    pub name: String,
    /// Optional initializer
    pub init: Option<Expression>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Identifier reference
    Identifier(String),
    /// Object literal `{ a: 1 }`
    Object(Vec<(String, Expression)>),
    /// Member access `a.b` or `a[b]`
    Member(MemberExpression),
    /// Function call `f(a, b)`
    Call(CallExpression),
    /// Unary operation
    Unary(UnaryOperator, Box<Expression>),
    /// Binary operation
    Binary(BinaryExpression),
    /// Assignment `a = b`, `a.b += c`
    Assignment(AssignmentExpression),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// undefined
    Undefined,
    /// null
    Null,
    /// true / false
    Boolean(bool),
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
}

/// Member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// The object being accessed
    pub object: Box<Expression>,
    /// The property being read
    pub property: MemberProperty,
}

/// The property part of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `a.name`
    Static(String),
    /// `a[expr]`
    Computed(Box<Expression>),
}

/// Call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The function being called
    pub callee: Box<Expression>,
    /// Call arguments
    pub arguments: Vec<Expression>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// !
    Not,
    /// typeof
    Typeof,
}

/// Binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// Left operand
    pub left: Box<Expression>,
    /// Right operand
    pub right: Box<Expression>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Modulo,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
}

/// Assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The operator
    pub operator: AssignmentOperator,
    /// Identifier or member expression being assigned
    pub target: Box<Expression>,
    /// The assigned value
    pub value: Box<Expression>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// +=
    AddAssign,
}

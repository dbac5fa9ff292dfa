use std::rc::Rc;

use crate::diagnostic::Position;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Equals,
    Greater,
    Less,
    And,
    Or,
}

impl BinaryOp {
    pub fn verb(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "subtract",
            BinaryOp::Mul => "multiply",
            BinaryOp::Div => "divide",
            BinaryOp::Equals => "compare",
            BinaryOp::Greater | BinaryOp::Less => "order",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Set { name: Rc<str>, value: Expr },
    Print(Expr),
    Ask { prompt: String, name: Rc<str> },
    If { condition: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>> },
    RepeatWhile { condition: Expr, body: Vec<Stmt> },
    RepeatTimes { count: Expr, body: Vec<Stmt> },
    ForEach { item: Rc<str>, iterable: Expr, body: Vec<Stmt> },
    FunctionDef(Rc<FunctionDef>),
    Call(FunctionCall),
    Return(Option<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Rc<str>,
    pub args: Vec<Expr>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Value),
    /// Comma-separated items, e.g. `set colors to red, green, blue.`
    List(Vec<Expr>),
    Variable {
        name: Rc<str>,
        /// When set, an unbound name evaluates to its own text instead of failing.
        literal_fallback: bool,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Call(FunctionCall),
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn literal(value: Value, position: Position) -> Self {
        Self::new(ExprKind::Literal(value), position)
    }

    pub fn variable(name: impl Into<Rc<str>>, literal_fallback: bool, position: Position) -> Self {
        Self::new(
            ExprKind::Variable {
                name: name.into(),
                literal_fallback,
            },
            position,
        )
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        let position = left.position;
        Self::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            position,
        )
    }

    /// Flags every variable reachable through operators and list items for literal
    /// fallback. Call arguments keep strict lookup.
    pub fn mark_literal_fallback(&mut self) {
        match &mut self.kind {
            ExprKind::Variable { literal_fallback, .. } => *literal_fallback = true,
            ExprKind::Binary { left, right, .. } => {
                left.mark_literal_fallback();
                right.mark_literal_fallback();
            }
            ExprKind::Unary { expr, .. } => expr.mark_literal_fallback(),
            ExprKind::List(items) => items.iter_mut().for_each(Expr::mark_literal_fallback),
            ExprKind::Literal(_) | ExprKind::Call(_) => {}
        }
    }
}

//! The abstract syntax tree.
//!
//! Pure data: a tagged tree of statement and expression variants with no
//! behavior beyond the derived `Serialize` impl used for the driver's
//! optional `AST.json` debug dump. Everything here is produced by the
//! parser and consumed by the emitter; nothing in this module walks itself.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    Identifier(String),
    Infix {
        op: InfixOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee_name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    Expression(Expr),
    Var {
        name: String,
        declared_type: String,
        value: Expr,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Function {
        name: String,
        params: Vec<FunctionParameter>,
        return_type: String,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Return(Expr),
    If {
        condition: Expr,
        consequence: Box<Stmt>,
        alternative: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

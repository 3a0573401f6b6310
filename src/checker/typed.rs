//! Checked program representation
//!
//! The output of the checker: the same tree shape as the AST, but every
//! expression carries its resolved [`Type`], every call names its callee by
//! index, and declarations carry their resolved types. The interpreter only
//! ever sees this form.

use super::types::{FunctionType, Type};
use crate::parser::ast::{BinOp, IncDec, LogicalOp, SourceLocation, UnOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee {
    /// Index into [`CheckedProgram::functions`]
    User(usize),
    /// Index into [`CheckedProgram::externals`]
    Foreign(usize),
}

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Type,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    IntLiteral(i32),
    CharLiteral(u8),
    Variable(String),
    Binary {
        op: BinOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Unary {
        op: UnOp,
        operand: Box<TypedExpr>,
    },
    Assign {
        target: String,
        op: Option<BinOp>,
        value: Box<TypedExpr>,
    },
    IncDec {
        op: IncDec,
        target: String,
    },
    Call {
        callee: Callee,
        args: Vec<TypedExpr>,
    },
    /// Conversion to `ty`
    Cast(Box<TypedExpr>),
}

#[derive(Debug, Clone)]
pub struct TypedDeclarator {
    pub name: String,
    pub ty: Type,
    pub init: Option<TypedExpr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum TypedStmt {
    Let {
        declarators: Vec<TypedDeclarator>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<TypedStmt>>,
        condition: Option<TypedExpr>,
        increment: Option<TypedExpr>,
        body: Vec<TypedStmt>,
        location: SourceLocation,
    },
    While {
        condition: TypedExpr,
        body: Vec<TypedStmt>,
        location: SourceLocation,
    },
    If {
        condition: TypedExpr,
        then_branch: Vec<TypedStmt>,
        else_branch: Option<Vec<TypedStmt>>,
        location: SourceLocation,
    },
    Return {
        value: Option<TypedExpr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Block {
        statements: Vec<TypedStmt>,
        location: SourceLocation,
    },
    Expression {
        expr: TypedExpr,
        location: SourceLocation,
    },
}

impl TypedStmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            TypedStmt::Let { location, .. }
            | TypedStmt::For { location, .. }
            | TypedStmt::While { location, .. }
            | TypedStmt::If { location, .. }
            | TypedStmt::Return { location, .. }
            | TypedStmt::Break { location }
            | TypedStmt::Continue { location }
            | TypedStmt::Block { location, .. }
            | TypedStmt::Expression { location, .. } => *location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypedParam {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct CheckedFunction {
    pub name: String,
    pub params: Vec<TypedParam>,
    pub signature: FunctionType,
    pub body: Vec<TypedStmt>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct ExternalSignature {
    pub name: String,
    pub signature: FunctionType,
    pub location: SourceLocation,
}

/// A fully type-checked program, ready to run
#[derive(Debug, Clone, Default)]
pub struct CheckedProgram {
    pub functions: Vec<CheckedFunction>,
    pub externals: Vec<ExternalSignature>,
    /// Top-level statements, in source order
    pub entry: Vec<TypedStmt>,
}

impl CheckedProgram {
    pub fn function(&self, name: &str) -> Option<&CheckedFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn callee_name(&self, callee: Callee) -> &str {
        match callee {
            Callee::User(idx) => self.functions.get(idx).map_or("<unknown>", |f| &f.name),
            Callee::Foreign(idx) => self.externals.get(idx).map_or("<unknown>", |e| &e.name),
        }
    }
}

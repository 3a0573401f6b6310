// AST (Abstract Syntax Tree) definitions for toyscript source

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A type as written in source (`int`, `char`, ...).
///
/// Names are resolved by the checker, so an unknown name is a type error
/// rather than a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub location: SourceLocation,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod)
    }

    pub fn is_ordering(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }
}

/// Short-circuiting logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And, // &&
    Or,  // ||
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

/// Increment / decrement forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDec {
    PreInc,  // ++x
    PreDec,  // --x
    PostInc, // x++
    PostDec, // x--
}

impl IncDec {
    pub fn is_prefix(self) -> bool {
        matches!(self, IncDec::PreInc | IncDec::PreDec)
    }

    pub fn is_increment(self) -> bool {
        matches!(self, IncDec::PreInc | IncDec::PostInc)
    }
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub param_type: TypeName,
    pub location: SourceLocation,
}

/// One `name [: type] [= init]` entry of a `let`/`const` declaration
#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub var_type: Option<TypeName>,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    IntLiteral(i32, SourceLocation),
    CharLiteral(u8, SourceLocation),
    Variable(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    /// `left && right`, `left || right`; `right` runs only when needed
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    /// `name = value` or `name op= value`
    Assignment {
        target: String,
        op: Option<BinOp>,
        value: Box<Expr>,
        location: SourceLocation,
    },
    IncDec {
        op: IncDec,
        target: String,
        location: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Cast {
        target_type: TypeName,
        expr: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc) | Expr::CharLiteral(_, loc) | Expr::Variable(_, loc) => *loc,
            Expr::BinaryOp { location, .. }
            | Expr::Logical { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::Assignment { location, .. }
            | Expr::IncDec { location, .. }
            | Expr::FunctionCall { location, .. }
            | Expr::Cast { location, .. } => *location,
        }
    }
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        is_const: bool,
        declarators: Vec<Declarator>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::VarDecl { location, .. }
            | Stmt::For { location, .. }
            | Stmt::While { location, .. }
            | Stmt::If { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Block { location, .. }
            | Stmt::Expression { location, .. } => *location,
        }
    }
}

/// `function name(params): ret { body }`
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeName>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// `declare function name(params): ret`
#[derive(Debug, Clone)]
pub struct ExternalDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeName>,
    pub location: SourceLocation,
}

/// Top-level items, in source order
#[derive(Debug, Clone)]
pub enum Item {
    Function(FunctionDecl),
    External(ExternalDecl),
    Statement(Stmt),
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn externals(&self) -> impl Iterator<Item = &ExternalDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::External(e) => Some(e),
            _ => None,
        })
    }

    /// Top-level statements forming the implicit entry point
    pub fn statements(&self) -> impl Iterator<Item = &Stmt> {
        self.items.iter().filter_map(|item| match item {
            Item::Statement(s) => Some(s),
            _ => None,
        })
    }
}

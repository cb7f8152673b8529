//! Statement nodes.
//!
//! Provides nodes for:
//! - Expression statements and variable declarations
//! - Control flow (if, while, for) and jumps (return, break, continue)
//! - The scripting-specific `wait` and `fire` statements

use bulletscript_core::Span;

use crate::Ident;
use crate::expr::Expr;

/// Firing function used by `fire T(...)` when no name is given.
pub const DEFAULT_FIRING_FUNCTION: &str = "fire";

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Expression statement (expr;)
    Expr(ExprStmt<'ast>),
    /// Numerical variable declaration (`var x = e;`)
    VarDecl(VarDeclStmt<'ast>),
    /// Entity-reference declaration (`ref target;`)
    RefDecl(RefDeclStmt<'ast>),
    /// Return statement
    Return(ReturnStmt<'ast>),
    /// Break statement
    Break(BreakStmt),
    /// Continue statement
    Continue(ContinueStmt),
    /// Block statement
    Block(Block<'ast>),
    /// If statement
    If(&'ast IfStmt<'ast>),
    /// While loop
    While(&'ast WhileStmt<'ast>),
    /// For loop
    For(&'ast ForStmt<'ast>),
    /// Suspend for a number of frames
    Wait(WaitStmt<'ast>),
    /// Spawn an entity through a firing function
    Fire(&'ast FireStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::VarDecl(s) => s.span,
            Self::RefDecl(s) => s.span,
            Self::Return(s) => s.span,
            Self::Break(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::Wait(s) => s.span,
            Self::Fire(s) => s.span,
        }
    }
}

/// An expression statement; its value is discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A numerical variable declaration.
///
/// Examples:
/// - `var x;`
/// - `var x = 5;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclStmt<'ast> {
    /// Variable name
    pub name: Ident<'ast>,
    /// Optional initializer
    pub init: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// An entity-reference declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefDeclStmt<'ast> {
    /// Reference name
    pub name: Ident<'ast>,
    /// Source location
    pub span: Span,
}

/// A return statement.
///
/// Examples:
/// - `return;`
/// - `return expr;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Optional return value
    pub value: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// A break statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    /// Source location
    pub span: Span,
}

/// A continue statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    /// Source location
    pub span: Span,
}

/// A block of statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    /// Statements in the block
    pub stmts: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// An if statement.
///
/// Examples:
/// - `if (condition) statement`
/// - `if (condition) statement else statement`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Then branch
    pub then_stmt: &'ast Stmt<'ast>,
    /// Optional else branch
    pub else_stmt: Option<&'ast Stmt<'ast>>,
    /// Source location
    pub span: Span,
}

/// A while loop.
///
/// Example: `while (condition) statement`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Body
    pub body: &'ast Stmt<'ast>,
    /// Source location
    pub span: Span,
}

/// A for loop.
///
/// Example: `for (init; condition; update) statement`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    /// Initializer (variable declaration or expression)
    pub init: Option<ForInit<'ast>>,
    /// Condition; a missing condition loops until `break`
    pub condition: Option<&'ast Expr<'ast>>,
    /// Update expression
    pub update: Option<&'ast Expr<'ast>>,
    /// Body
    pub body: &'ast Stmt<'ast>,
    /// Source location
    pub span: Span,
}

/// The initializer in a for loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForInit<'ast> {
    /// Variable declaration
    VarDecl(VarDeclStmt<'ast>),
    /// Expression
    Expr(&'ast Expr<'ast>),
}

/// `wait N frames;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitStmt<'ast> {
    /// Frame count
    pub frames: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A fire statement.
///
/// Examples:
/// - `fire bullet(x, y);`
/// - `fire bullet.spread(x, y) with updater homing(speed);`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireStmt<'ast> {
    /// The fired entity type
    pub type_name: Ident<'ast>,
    /// Firing function name; `None` means [`DEFAULT_FIRING_FUNCTION`]
    pub function: Option<Ident<'ast>>,
    /// Firing function arguments
    pub args: &'ast [Expr<'ast>],
    /// Optional bullet updater attached to the spawned entity
    pub updater: Option<UpdaterClause<'ast>>,
    /// Source location
    pub span: Span,
}

impl<'ast> FireStmt<'ast> {
    /// The firing function this statement invokes.
    pub fn function_name(&self) -> &'ast str {
        self.function
            .map(|f| f.name)
            .unwrap_or(DEFAULT_FIRING_FUNCTION)
    }
}

/// `with updater U(b1..bm)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdaterClause<'ast> {
    /// Updater name
    pub name: Ident<'ast>,
    /// Updater arguments
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

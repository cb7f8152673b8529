//! Expression nodes.
//!
//! Every expression evaluates to a single float. Nodes that own children
//! hold them as arena references so the whole tree shares one lifetime.

use bulletscript_core::Span;

use crate::{AssignOp, BinaryOp, Ident, PostfixOp, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Numeric literal
    Literal(LiteralExpr),
    /// Local variable reference
    Ident(Ident<'ast>),
    /// Entity property reference (`$name`)
    Property(PropertyExpr<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Assignment, simple or compound
    Assign(&'ast AssignExpr<'ast>),
    /// Postfix increment/decrement
    Postfix(&'ast PostfixExpr<'ast>),
    /// Ternary conditional (? :)
    Ternary(&'ast TernaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Property(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Postfix(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::Call(e) => e.span,
        }
    }

    /// Whether this expression names a storage location.
    pub fn is_lvalue(&self) -> bool {
        matches!(self, Self::Ident(_) | Self::Property(_))
    }
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr {
    /// The value
    pub value: f32,
    /// Source location
    pub span: Span,
}

/// A `$property` reference on the entity the script runs against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyExpr<'ast> {
    /// Property name, without the `$`
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An assignment expression.
///
/// The target is any expression so the compiler can reject non-lvalues
/// with a located error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    /// Target
    pub target: &'ast Expr<'ast>,
    /// Operator
    pub op: AssignOp,
    /// Value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A postfix increment or decrement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostfixExpr<'ast> {
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Operator
    pub op: PostfixOp,
    /// Source location
    pub span: Span,
}

/// A ternary conditional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Value if the condition is non-zero
    pub then_expr: &'ast Expr<'ast>,
    /// Value if the condition is zero
    pub else_expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A call to a script function or a registered external function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// Callee name
    pub callee: Ident<'ast>,
    /// Arguments in source order
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

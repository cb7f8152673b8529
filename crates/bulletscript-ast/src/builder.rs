//! Arena-backed construction helpers.
//!
//! Front ends and tests build trees through [`AstBuilder`] instead of
//! wiring `arena.alloc` calls by hand. Every node gets the builder's
//! current span; use [`AstBuilder::at`] to stamp a different one.
//!
//! ```
//! use bulletscript_ast::{AstBuilder, BinaryOp};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let sum = b.binary(b.num(1.0), BinaryOp::Add, b.var("x"));
//! assert!(!sum.is_lvalue());
//! ```

use bulletscript_core::Span;
use bumpalo::Bump;

use crate::*;

/// Builds tree nodes inside a [`Bump`] arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    span: Span,
}

impl<'ast> AstBuilder<'ast> {
    /// Create a builder whose nodes carry an unknown span.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Span::default(),
        }
    }

    /// A copy of this builder that stamps `line:col` on its nodes.
    pub fn at(&self, line: u32, col: u32) -> Self {
        Self {
            arena: self.arena,
            span: Span::new(line, col),
        }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn alloc_expr(&self, expr: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(expr)
    }

    fn alloc_stmt(&self, stmt: Stmt<'ast>) -> &'ast Stmt<'ast> {
        self.arena.alloc(stmt)
    }

    /// Identifier.
    pub fn ident(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.arena.alloc_str(name), self.span)
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    /// Numeric literal.
    pub fn num(&self, value: f32) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            value,
            span: self.span,
        })
    }

    /// Variable reference.
    pub fn var(&self, name: &str) -> Expr<'ast> {
        Expr::Ident(self.ident(name))
    }

    /// `$name` property reference.
    pub fn prop(&self, name: &str) -> Expr<'ast> {
        Expr::Property(PropertyExpr {
            name: self.arena.alloc_str(name),
            span: self.span,
        })
    }

    /// `left op right`.
    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.arena.alloc(BinaryExpr {
            left: self.arena.alloc(left),
            op,
            right: self.arena.alloc(right),
            span: self.span,
        }))
    }

    /// `op operand`.
    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Unary(self.arena.alloc(UnaryExpr {
            op,
            operand: self.arena.alloc(operand),
            span: self.span,
        }))
    }

    /// `target op value`.
    pub fn assign(&self, target: Expr<'ast>, op: AssignOp, value: Expr<'ast>) -> Expr<'ast> {
        Expr::Assign(self.arena.alloc(AssignExpr {
            target: self.arena.alloc(target),
            op,
            value: self.arena.alloc(value),
            span: self.span,
        }))
    }

    /// `operand++` / `operand--`.
    pub fn postfix(&self, operand: Expr<'ast>, op: PostfixOp) -> Expr<'ast> {
        Expr::Postfix(self.arena.alloc(PostfixExpr {
            operand: self.arena.alloc(operand),
            op,
            span: self.span,
        }))
    }

    /// `condition ? then_expr : else_expr`.
    pub fn ternary(
        &self,
        condition: Expr<'ast>,
        then_expr: Expr<'ast>,
        else_expr: Expr<'ast>,
    ) -> Expr<'ast> {
        Expr::Ternary(self.arena.alloc(TernaryExpr {
            condition: self.arena.alloc(condition),
            then_expr: self.arena.alloc(then_expr),
            else_expr: self.arena.alloc(else_expr),
            span: self.span,
        }))
    }

    /// `callee(args...)`.
    pub fn call(&self, callee: &str, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.arena.alloc(CallExpr {
            callee: self.ident(callee),
            args: self.arena.alloc_slice_copy(args),
            span: self.span,
        }))
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    /// `expr;`
    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: self.arena.alloc(expr),
            span: self.span,
        })
    }

    fn var_decl_node(&self, name: &str, init: Option<Expr<'ast>>) -> VarDeclStmt<'ast> {
        VarDeclStmt {
            name: self.ident(name),
            init: init.map(|e| self.alloc_expr(e)),
            span: self.span,
        }
    }

    /// `var name = init;`
    pub fn var_decl(&self, name: &str, init: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::VarDecl(self.var_decl_node(name, init))
    }

    /// `ref name;`
    pub fn ref_decl(&self, name: &str) -> Stmt<'ast> {
        Stmt::RefDecl(RefDeclStmt {
            name: self.ident(name),
            span: self.span,
        })
    }

    /// `return value;`
    pub fn ret(&self, value: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value: value.map(|e| self.alloc_expr(e)),
            span: self.span,
        })
    }

    /// `break;`
    pub fn brk(&self) -> Stmt<'ast> {
        Stmt::Break(BreakStmt { span: self.span })
    }

    /// `continue;`
    pub fn cont(&self) -> Stmt<'ast> {
        Stmt::Continue(ContinueStmt { span: self.span })
    }

    /// `{ stmts... }` as a bare block.
    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Block<'ast> {
        Block {
            stmts: self.arena.alloc_slice_copy(stmts),
            span: self.span,
        }
    }

    /// `{ stmts... }` as a statement.
    pub fn block_stmt(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.block(stmts))
    }

    /// `if (condition) then_stmt else else_stmt`
    pub fn if_stmt(
        &self,
        condition: Expr<'ast>,
        then_stmt: Stmt<'ast>,
        else_stmt: Option<Stmt<'ast>>,
    ) -> Stmt<'ast> {
        Stmt::If(self.arena.alloc(IfStmt {
            condition: self.arena.alloc(condition),
            then_stmt: self.arena.alloc(then_stmt),
            else_stmt: else_stmt.map(|s| self.alloc_stmt(s)),
            span: self.span,
        }))
    }

    /// `while (condition) body`
    pub fn while_stmt(&self, condition: Expr<'ast>, body: Stmt<'ast>) -> Stmt<'ast> {
        Stmt::While(self.arena.alloc(WhileStmt {
            condition: self.arena.alloc(condition),
            body: self.arena.alloc(body),
            span: self.span,
        }))
    }

    /// `for (var name = init; condition; update) body`
    pub fn for_var(
        &self,
        name: &str,
        init: Expr<'ast>,
        condition: Option<Expr<'ast>>,
        update: Option<Expr<'ast>>,
        body: Stmt<'ast>,
    ) -> Stmt<'ast> {
        let init = ForInit::VarDecl(self.var_decl_node(name, Some(init)));
        self.for_stmt(Some(init), condition, update, body)
    }

    /// `for (init; condition; update) body`
    pub fn for_stmt(
        &self,
        init: Option<ForInit<'ast>>,
        condition: Option<Expr<'ast>>,
        update: Option<Expr<'ast>>,
        body: Stmt<'ast>,
    ) -> Stmt<'ast> {
        Stmt::For(self.arena.alloc(ForStmt {
            init,
            condition: condition.map(|e| self.alloc_expr(e)),
            update: update.map(|e| self.alloc_expr(e)),
            body: self.arena.alloc(body),
            span: self.span,
        }))
    }

    /// `wait frames frames;`
    pub fn wait(&self, frames: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Wait(WaitStmt {
            frames: self.arena.alloc(frames),
            span: self.span,
        })
    }

    /// `fire type_name(args...);`
    pub fn fire(&self, type_name: &str, args: &[Expr<'ast>]) -> Stmt<'ast> {
        self.fire_full(type_name, None, args, None)
    }

    /// `fire type_name(args...) with updater updater(updater_args...);`
    pub fn fire_with_updater(
        &self,
        type_name: &str,
        args: &[Expr<'ast>],
        updater: &str,
        updater_args: &[Expr<'ast>],
    ) -> Stmt<'ast> {
        self.fire_full(type_name, None, args, Some((updater, updater_args)))
    }

    /// Fire statement with every part explicit.
    pub fn fire_full(
        &self,
        type_name: &str,
        function: Option<&str>,
        args: &[Expr<'ast>],
        updater: Option<(&str, &[Expr<'ast>])>,
    ) -> Stmt<'ast> {
        Stmt::Fire(self.arena.alloc(FireStmt {
            type_name: self.ident(type_name),
            function: function.map(|f| self.ident(f)),
            args: self.arena.alloc_slice_copy(args),
            updater: updater.map(|(name, args)| UpdaterClause {
                name: self.ident(name),
                args: self.arena.alloc_slice_copy(args),
                span: self.span,
            }),
            span: self.span,
        }))
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// A declaration of `kind` with the given parameters and body.
    pub fn declaration(
        &self,
        kind: DeclKind,
        name: &str,
        params: &[&str],
        body: &[Stmt<'ast>],
    ) -> Declaration<'ast> {
        let params: Vec<Ident<'ast>> = params.iter().map(|p| self.ident(p)).collect();
        Declaration {
            kind,
            name: self.ident(name),
            params: self.arena.alloc_slice_copy(&params),
            body: self.block(body),
            span: self.span,
        }
    }

    /// A script from declarations.
    pub fn script(&self, declarations: &[Declaration<'ast>]) -> Script<'ast> {
        Script {
            declarations: self.arena.alloc_slice_copy(declarations),
            span: self.span,
        }
    }
}

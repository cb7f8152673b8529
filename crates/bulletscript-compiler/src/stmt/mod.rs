//! Statement compilation.
//!
//! The [`StmtCompiler`] appends statement code straight onto a target
//! [`CodeBlock`] (the body of the declaration being compiled), handling:
//! - Variable and entity-reference declarations
//! - Expression, return and wait statements
//! - If/else, while and for with absolute back-patched jumps
//! - `break`/`continue` against the innermost enclosing loop
//! - `fire` with and without an attached updater
//!
//! Because statements write into the final block, the jump targets they
//! patch are absolute addresses in that block.
//!
//! # Example
//!
//! ```ignore
//! let mut code = CodeBlock::new();
//! let mut compiler = StmtCompiler::new(&mut scopes, &registry);
//! compiler.emit_to(&stmt, &mut code)?;
//! ```

mod block;
mod fire_stmt;
mod for_stmt;
mod if_stmt;
mod return_stmt;
mod var_decl;
mod wait_stmt;
mod while_stmt;

use bulletscript_ast::{BreakStmt, ContinueStmt, ExprStmt, Stmt};
use bulletscript_core::{CodeBlock, CompilationError, Instruction};
use bulletscript_registry::ScriptRegistry;

use crate::ScopeStack;
use crate::expr::ExprCompiler;
use crate::jumps::LoopFixups;

type Result<T> = std::result::Result<T, CompilationError>;

/// Compiles statements into an existing code block.
pub struct StmtCompiler<'a, 'reg> {
    /// Scope stack; declarations go into the current scope
    scopes: &'a mut ScopeStack,
    /// Registry used to resolve properties, calls and firing functions
    registry: &'reg ScriptRegistry,
    /// Fix-up lists of the innermost enclosing loop, if any
    fixups: Option<&'a mut LoopFixups>,
}

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Create a statement compiler outside any loop.
    pub fn new(scopes: &'a mut ScopeStack, registry: &'reg ScriptRegistry) -> Self {
        Self {
            scopes,
            registry,
            fixups: None,
        }
    }

    /// Append the code for `stmt` onto `target`.
    pub fn emit_to<'ast>(&mut self, stmt: &Stmt<'ast>, target: &mut CodeBlock) -> Result<()> {
        match stmt {
            Stmt::Expr(expr_stmt) => self.emit_expr_stmt(expr_stmt, target),
            Stmt::VarDecl(var_decl) => self.emit_var_decl(var_decl, target),
            Stmt::RefDecl(ref_decl) => self.emit_ref_decl(ref_decl),
            Stmt::Return(ret) => self.emit_return(ret, target),
            Stmt::Break(brk) => self.emit_break(brk, target),
            Stmt::Continue(cont) => self.emit_continue(cont, target),
            Stmt::Block(block) => self.emit_block(block, target),
            Stmt::If(if_stmt) => self.emit_if(if_stmt, target),
            Stmt::While(while_stmt) => self.emit_while(while_stmt, target),
            Stmt::For(for_stmt) => self.emit_for(for_stmt, target),
            Stmt::Wait(wait) => self.emit_wait(wait, target),
            Stmt::Fire(fire) => self.emit_fire(fire, target),
        }
    }

    /// An expression compiler over the same scopes and registry.
    fn expr_compiler(&self) -> ExprCompiler<'_, 'reg> {
        ExprCompiler::new(self.scopes, self.registry)
    }

    /// A compiler for a loop body whose `break`/`continue` go to `fixups`.
    fn nested<'b>(&'b mut self, fixups: &'b mut LoopFixups) -> StmtCompiler<'b, 'reg> {
        StmtCompiler {
            scopes: &mut *self.scopes,
            registry: self.registry,
            fixups: Some(fixups),
        }
    }

    /// Compile an expression statement.
    ///
    /// Every expression leaves one value, which is discarded.
    fn emit_expr_stmt<'ast>(
        &mut self,
        expr_stmt: &ExprStmt<'ast>,
        target: &mut CodeBlock,
    ) -> Result<()> {
        target.append(&self.expr_compiler().generate(expr_stmt.expr)?);
        target.write_instruction(Instruction::Pop);
        Ok(())
    }

    /// `Jump 0`, patched to the loop exit.
    fn emit_break(&mut self, brk: &BreakStmt, target: &mut CodeBlock) -> Result<()> {
        let fixups = self
            .fixups
            .as_deref_mut()
            .ok_or(CompilationError::BreakOutsideLoop { span: brk.span })?;
        fixups.add_break(target.emit_jump(Instruction::Jump));
        Ok(())
    }

    /// `Jump 0`, patched to the loop's condition.
    fn emit_continue(&mut self, cont: &ContinueStmt, target: &mut CodeBlock) -> Result<()> {
        let fixups = self
            .fixups
            .as_deref_mut()
            .ok_or(CompilationError::ContinueOutsideLoop { span: cont.span })?;
        fixups.add_continue(target.emit_jump(Instruction::Jump));
        Ok(())
    }
}

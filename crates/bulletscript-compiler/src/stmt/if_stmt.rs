//! If/else statement compilation.
//!
//! Handles if statements with optional else branches, including chained
//! `else if`, which is just an if statement in the else position.

use bulletscript_ast::IfStmt;
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile an if statement.
    ///
    /// `IfZeroBranch` pops the condition on both paths, so neither branch
    /// needs a compensating `Pop`.
    ///
    /// Bytecode layout:
    /// ```text
    /// [condition]
    /// IfZeroBranch -> else | end
    /// [then branch]
    /// Jump -> end            (only with else)
    /// else:
    /// [else branch]
    /// end:
    /// ```
    pub fn emit_if<'ast>(&mut self, if_stmt: &IfStmt<'ast>, target: &mut CodeBlock) -> Result<()> {
        target.append(&self.expr_compiler().generate(if_stmt.condition)?);
        let else_jump = target.emit_jump(Instruction::IfZeroBranch);

        self.emit_to(if_stmt.then_stmt, target)?;

        match if_stmt.else_stmt {
            None => target.patch_to_here(else_jump),
            Some(else_stmt) => {
                let end_jump = target.emit_jump(Instruction::Jump);
                target.patch_to_here(else_jump);
                self.emit_to(else_stmt, target)?;
                target.patch_to_here(end_jump);
            }
        }
        Ok(())
    }
}

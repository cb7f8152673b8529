//! While loop compilation.

use bulletscript_ast::WhileStmt;
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};
use crate::jumps::LoopFixups;

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile a while loop.
    ///
    /// Bytecode layout:
    /// ```text
    /// loop_start:
    /// [condition]
    /// IfZeroBranch -> exit
    /// [body]                 (continue -> loop_start, break -> exit)
    /// Jump -> loop_start
    /// exit:
    /// ```
    pub fn emit_while<'ast>(
        &mut self,
        while_stmt: &WhileStmt<'ast>,
        target: &mut CodeBlock,
    ) -> Result<()> {
        let loop_start = target.len();
        target.append(&self.expr_compiler().generate(while_stmt.condition)?);
        let exit_jump = target.emit_jump(Instruction::IfZeroBranch);

        let mut fixups = LoopFixups::new();
        self.nested(&mut fixups).emit_to(while_stmt.body, target)?;

        target.write_indexed(Instruction::Jump, loop_start);
        target.patch_to_here(exit_jump);
        let exit = target.len();
        fixups.patch(target, exit, loop_start);
        Ok(())
    }
}

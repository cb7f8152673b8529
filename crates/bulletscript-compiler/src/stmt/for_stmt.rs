//! For loop compilation.
//!
//! Handles C-style for loops with optional init, condition, and update parts.

use bulletscript_ast::{ForInit, ForStmt};
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};
use crate::jumps::LoopFixups;

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile a for loop.
    ///
    /// For loops have the form: `for (init; condition; update) body`
    /// All parts are optional:
    /// - `for (;;)` loops until a `break` or `return`
    /// - `for (; condition;)` is like while
    ///
    /// The update runs between the condition test and the body, and
    /// `continue` jumps back to the condition.
    ///
    /// Bytecode layout:
    /// ```text
    /// [init]                 (var decl, or expr + Pop)
    /// loop_start:
    /// [condition]            (if present)
    /// IfZeroBranch -> exit   (if condition)
    /// [update] Pop           (if update)
    /// [body]                 (continue -> loop_start, break -> exit)
    /// Jump -> loop_start
    /// exit:
    /// ```
    pub fn emit_for<'ast>(
        &mut self,
        for_stmt: &ForStmt<'ast>,
        target: &mut CodeBlock,
    ) -> Result<()> {
        match &for_stmt.init {
            Some(ForInit::VarDecl(var_decl)) => self.emit_var_decl(var_decl, target)?,
            Some(ForInit::Expr(expr)) => {
                target.append(&self.expr_compiler().generate(expr)?);
                target.write_instruction(Instruction::Pop);
            }
            None => {}
        }

        let loop_start = target.len();
        let exit_jump = match for_stmt.condition {
            Some(condition) => {
                target.append(&self.expr_compiler().generate(condition)?);
                Some(target.emit_jump(Instruction::IfZeroBranch))
            }
            None => None,
        };

        if let Some(update) = for_stmt.update {
            target.append(&self.expr_compiler().generate(update)?);
            target.write_instruction(Instruction::Pop);
        }

        let mut fixups = LoopFixups::new();
        self.nested(&mut fixups).emit_to(for_stmt.body, target)?;

        target.write_indexed(Instruction::Jump, loop_start);
        let exit = target.len();
        if let Some(exit_jump) = exit_jump {
            target.patch_to_here(exit_jump);
        }
        fixups.patch(target, exit, loop_start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use bulletscript_ast::{AssignOp, AstBuilder, BinaryOp, ForInit, PostfixOp};
    use bulletscript_core::Instruction;
    use bumpalo::Bump;

    #[test]
    fn break_patched_to_exit() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        // for (var i = 5; i < 10; i++) { break; }
        let stmt = b.for_var(
            "i",
            b.num(5.0),
            Some(b.binary(b.var("i"), BinaryOp::Less, b.num(10.0))),
            Some(b.postfix(b.var("i"), PostfixOp::PostInc)),
            b.block_stmt(&[b.brk()]),
        );
        let code = fixture.emit(&mut scopes, &[stmt]).unwrap();

        assert_eq!(code.len(), 24);
        code.assert_words(&[
            Instruction::Push.word(),
            5.0,
            Instruction::SetVariable.word(),
            0.0,
            Instruction::Pop.word(),
            // loop_start = 5
            Instruction::GetVariable.word(),
            0.0,
            Instruction::Push.word(),
            10.0,
            Instruction::OpLessThan.word(),
            Instruction::IfZeroBranch.word(),
            24.0,
            Instruction::GetVariable.word(),
            0.0,
            Instruction::Push.word(),
            1.0,
            Instruction::OpAdd.word(),
            Instruction::SetVariable.word(),
            0.0,
            Instruction::Pop.word(),
            Instruction::Jump.word(),
            24.0,
            Instruction::Jump.word(),
            5.0,
        ]);
    }

    #[test]
    fn continue_targets_condition() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        let stmt = b.for_var(
            "i",
            b.num(0.0),
            Some(b.binary(b.var("i"), BinaryOp::Less, b.num(3.0))),
            Some(b.postfix(b.var("i"), PostfixOp::PostInc)),
            b.block_stmt(&[b.cont()]),
        );
        let code = fixture.emit(&mut scopes, &[stmt]).unwrap();
        assert_eq!(code.word(21), Some(5.0));
    }

    #[test]
    fn empty_header_loops_forever() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        // for (;;) { break; }
        let stmt = b.for_stmt(None, None, None, b.block_stmt(&[b.brk()]));
        fixture.emit(&mut scopes, &[stmt]).unwrap().assert_words(&[
            Instruction::Jump.word(),
            4.0,
            Instruction::Jump.word(),
            0.0,
        ]);
    }

    #[test]
    fn expression_init_is_popped() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&["i"]);

        let reset = b.assign(b.var("i"), AssignOp::Assign, b.num(0.0));
        let init = ForInit::Expr(b.arena().alloc(reset));
        let stmt = b.for_stmt(Some(init), None, None, b.block_stmt(&[b.brk()]));
        fixture.emit(&mut scopes, &[stmt]).unwrap().assert_opcodes(&[
            Instruction::Push,
            Instruction::SetVariable,
            Instruction::Pop,
            Instruction::Jump,
            Instruction::Jump,
        ]);
    }
}

//! Return statements.

use bulletscript_ast::ReturnStmt;
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile `return E;`. A bare `return;` returns `0`.
    ///
    /// ```text
    /// [E] | Push 0
    /// Return
    /// ```
    pub fn emit_return<'ast>(
        &mut self,
        ret: &ReturnStmt<'ast>,
        target: &mut CodeBlock,
    ) -> Result<()> {
        match ret.value {
            Some(value) => target.append(&self.expr_compiler().generate(value)?),
            None => {
                target.write_instruction(Instruction::Push);
                target.write_word(0.0);
            }
        }
        target.write_instruction(Instruction::Return);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use bulletscript_ast::{AstBuilder, BinaryOp};
    use bulletscript_core::Instruction;
    use bumpalo::Bump;

    #[test]
    fn return_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&["v"]);

        let stmt = b.ret(Some(b.binary(b.var("v"), BinaryOp::Mul, b.num(2.0))));
        fixture.emit(&mut scopes, &[stmt]).unwrap().assert_opcodes(&[
            Instruction::GetVariable,
            Instruction::Push,
            Instruction::OpMultiply,
            Instruction::Return,
        ]);
    }

    #[test]
    fn bare_return_pushes_zero() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        fixture.emit(&mut scopes, &[b.ret(None)]).unwrap().assert_words(&[
            Instruction::Push.word(),
            0.0,
            Instruction::Return.word(),
        ]);
    }
}

//! `wait N frames;`

use bulletscript_ast::WaitStmt;
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// `{N}`, `WaitFrames`
    pub fn emit_wait<'ast>(&mut self, wait: &WaitStmt<'ast>, target: &mut CodeBlock) -> Result<()> {
        target.append(&self.expr_compiler().generate(wait.frames)?);
        target.write_instruction(Instruction::WaitFrames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use bulletscript_ast::AstBuilder;
    use bulletscript_core::Instruction;
    use bumpalo::Bump;

    #[test]
    fn wait_pushes_count() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        fixture
            .emit(&mut scopes, &[b.wait(b.num(10.0))])
            .unwrap()
            .assert_words(&[
                Instruction::Push.word(),
                10.0,
                Instruction::WaitFrames.word(),
            ]);
    }
}

//! Block statements.

use bulletscript_ast::Block;
use bulletscript_core::CodeBlock;

use super::{Result, StmtCompiler};

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile each statement of a block in order.
    ///
    /// Blocks do not open a scope; names declared inside stay visible for
    /// the rest of the declaration.
    pub fn emit_block<'ast>(&mut self, block: &Block<'ast>, target: &mut CodeBlock) -> Result<()> {
        for stmt in block.stmts {
            self.emit_to(stmt, target)?;
        }
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
    fn statements_in_order() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        let stmt = b.block_stmt(&[b.expr_stmt(b.num(1.0)), b.expr_stmt(b.num(2.0))]);
        fixture.emit(&mut scopes, &[stmt]).unwrap().assert_words(&[
            Instruction::Push.word(),
            1.0,
            Instruction::Pop.word(),
            Instruction::Push.word(),
            2.0,
            Instruction::Pop.word(),
        ]);
    }

    #[test]
    fn names_outlive_the_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        let inner = b.block_stmt(&[b.var_decl("x", None)]);
        let after = b.expr_stmt(b.var("x"));
        assert!(fixture.emit(&mut scopes, &[inner, after]).is_ok());
    }
}

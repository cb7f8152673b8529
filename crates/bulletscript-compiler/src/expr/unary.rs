//! Unary operator compilation.

use bulletscript_ast::{UnaryExpr, UnaryOp};
use bulletscript_core::{CodeBlock, Instruction};

use super::{ExprCompiler, Result};

/// Compile `-e` or `!e`.
pub fn generate_unary<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    expr: &UnaryExpr<'ast>,
) -> Result<CodeBlock> {
    let mut code = compiler.generate(expr.operand)?;
    code.write_instruction(match expr.op {
        UnaryOp::Neg => Instruction::Negate,
        UnaryOp::LogicalNot => Instruction::OpNot,
    });
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use bulletscript_ast::AstBuilder;
    use bumpalo::Bump;

    #[test]
    fn negate_and_not() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&[]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        compiler
            .generate(&b.unary(UnaryOp::Neg, b.num(3.0)))
            .unwrap()
            .assert_words(&[Instruction::Push.word(), 3.0, Instruction::Negate.word()]);
        compiler
            .generate(&b.unary(UnaryOp::LogicalNot, b.prop("x")))
            .unwrap()
            .assert_opcodes(&[Instruction::GetProperty, Instruction::OpNot]);
    }
}

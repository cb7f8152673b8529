//! Ternary conditional compilation.
//!
//! Expression fragments are appended into their parents at arbitrary
//! addresses, so both jumps are relative to the word after their operand.

use bulletscript_ast::TernaryExpr;
use bulletscript_core::{CodeBlock, Instruction};

use super::{ExprCompiler, Result};

/// Compile `condition ? then : else`.
///
/// ```text
/// [condition]
/// IfZeroBranchOffset len(then) + 2
/// [then]
/// JumpOffset len(else)
/// [else]
/// ```
pub fn generate_ternary<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    expr: &TernaryExpr<'ast>,
) -> Result<CodeBlock> {
    let condition = compiler.generate(expr.condition)?;
    let then_code = compiler.generate(expr.then_expr)?;
    let else_code = compiler.generate(expr.else_expr)?;

    let size = condition.len() + then_code.len() + else_code.len() + 4;
    let mut code = CodeBlock::with_capacity(size);
    code.append(&condition);
    code.write_instruction(Instruction::IfZeroBranchOffset);
    code.write_word((then_code.len() + 2) as f32);
    code.append(&then_code);
    code.write_instruction(Instruction::JumpOffset);
    code.write_word(else_code.len() as f32);
    code.append(&else_code);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use bulletscript_ast::{AstBuilder, BinaryOp};
    use bumpalo::Bump;

    #[test]
    fn ternary_layout() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&[]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        // 1 % 2 == 0 ? 1 : 2
        let condition = b.binary(
            b.binary(b.num(1.0), BinaryOp::Mod, b.num(2.0)),
            BinaryOp::Equal,
            b.num(0.0),
        );
        let expr = b.ternary(condition, b.num(1.0), b.num(2.0));
        let code = compiler.generate(&expr).unwrap();

        assert_eq!(code.len(), 16);
        code.assert_words(&[
            Instruction::Push.word(),
            1.0,
            Instruction::Push.word(),
            2.0,
            Instruction::OpMod.word(),
            Instruction::Push.word(),
            0.0,
            Instruction::OpEqual.word(),
            Instruction::IfZeroBranchOffset.word(),
            4.0,
            Instruction::Push.word(),
            1.0,
            Instruction::JumpOffset.word(),
            2.0,
            Instruction::Push.word(),
            2.0,
        ]);
    }

    #[test]
    fn nested_ternary_stays_relative() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&["a"]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        let inner = b.ternary(b.var("a"), b.num(1.0), b.num(2.0));
        let outer = b.ternary(b.num(0.0), inner, b.num(3.0));
        let code = compiler.generate(&outer).unwrap();

        // Outer then-branch is the whole inner ternary (10 words).
        assert_eq!(code.word(3), Some(12.0));
        // Inner offsets are unchanged by where the fragment lands.
        assert_eq!(code.word(7), Some(4.0));
        assert_eq!(code.word(11), Some(2.0));
        assert_eq!(code.word(15), Some(2.0));
    }
}

//! Literal compilation.

use bulletscript_core::{CodeBlock, Instruction};

/// `Push value`
pub fn generate_literal(value: f32) -> CodeBlock {
    let mut code = CodeBlock::with_capacity(2);
    code.write_instruction(Instruction::Push);
    code.write_word(value);
    code
}

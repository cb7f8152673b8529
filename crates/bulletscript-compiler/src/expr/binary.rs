//! Binary operator compilation.

use bulletscript_ast::BinaryExpr;
use bulletscript_core::CodeBlock;

use super::{ExprCompiler, Result, binary_operator};

/// Compile `left op right`.
///
/// Both operands are always evaluated; `&&` and `||` do not short-circuit.
///
/// ```text
/// [left]
/// [right]
/// Op
/// ```
pub fn generate_binary<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    expr: &BinaryExpr<'ast>,
) -> Result<CodeBlock> {
    let mut code = compiler.generate(expr.left)?;
    code.append(&compiler.generate(expr.right)?);
    code.write_instruction(binary_operator(expr.op).instruction());
    Ok(code)
}

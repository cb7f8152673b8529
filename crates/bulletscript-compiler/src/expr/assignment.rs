//! Assignment and postfix increment/decrement.
//!
//! Every form leaves the stored value on the stack: `SetVariable` and
//! `SetProperty` write the top of the stack without popping it. Postfix
//! operators therefore yield the updated value.

use bulletscript_ast::{AssignExpr, PostfixExpr};
use bulletscript_core::{CodeBlock, Instruction};

use super::{ExprCompiler, Result, binary_operator};

/// Compile `target = value` or `target op= value`.
///
/// ```text
/// simple:    [value] Set
/// compound:  Get [value] Op Set
/// ```
pub fn generate_assign<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    expr: &AssignExpr<'ast>,
) -> Result<CodeBlock> {
    let target = compiler.resolve_lvalue(expr.target)?;
    let value = compiler.generate(expr.value)?;

    let mut code = CodeBlock::with_capacity(value.len() + 5);
    match expr.op.binary_op() {
        None => code.append(&value),
        Some(op) => {
            target.emit_get(&mut code);
            code.append(&value);
            code.write_instruction(binary_operator(op).instruction());
        }
    }
    target.emit_set(&mut code);
    Ok(code)
}

/// Compile `target++` / `target--`.
///
/// ```text
/// Get
/// Push 1
/// OpAdd | OpSubtract
/// Set
/// ```
pub fn generate_postfix<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    expr: &PostfixExpr<'ast>,
) -> Result<CodeBlock> {
    let target = compiler.resolve_lvalue(expr.operand)?;

    let mut code = CodeBlock::with_capacity(7);
    target.emit_get(&mut code);
    code.write_instruction(Instruction::Push);
    code.write_word(1.0);
    code.write_instruction(binary_operator(expr.op.binary_op()).instruction());
    target.emit_set(&mut code);
    Ok(code)
}

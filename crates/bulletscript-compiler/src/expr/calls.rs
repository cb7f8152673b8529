//! Function call compilation.
//!
//! A callee name resolves to a script function first and a native
//! external function second. Script functions have a declared parameter
//! count that is checked here; external functions manage the stack
//! themselves, so their argument count is not checked.

use bulletscript_ast::CallExpr;
use bulletscript_core::{CodeBlock, CompilationError, Instruction};
use bulletscript_registry::ScopeKind;

use super::{ExprCompiler, Result, check_arity};

/// Compile `name(args...)`.
///
/// ```text
/// [arg 0] .. [arg n-1]
/// FunctionCall index | ExternalFunctionCall index
/// ```
pub fn generate_call<'ast>(
    compiler: &ExprCompiler<'_, '_>,
    call: &CallExpr<'ast>,
) -> Result<CodeBlock> {
    let name = call.callee.name;
    let registry = compiler.registry();
    let functions = registry.code_scopes(ScopeKind::Function);

    let (instruction, index) = if let Some(index) = functions.index_of(name) {
        let expected = functions
            .by_index(index)
            .map(|scope| scope.parameter_count())
            .unwrap_or_default();
        check_arity("function", name, expected, call.args.len(), call.span)?;
        (Instruction::FunctionCall, index)
    } else if let Some(external) = registry.get_external_function(name) {
        (Instruction::ExternalFunctionCall, external.index)
    } else {
        return Err(CompilationError::UnknownFunction {
            name: name.to_string(),
            span: call.callee.span,
        });
    };

    let mut code = compiler.generate_all(call.args)?;
    code.write_indexed(instruction, index);
    Ok(code)
}

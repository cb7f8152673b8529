//! Declaration bodies.
//!
//! A function, action or updater compiles into a fresh [`CodeScope`]
//! whose parameters occupy the first numerical slots. The scope is pushed
//! for the duration of the body and always popped again, even when the
//! body fails to compile.

use bulletscript_ast::{DeclKind, Declaration};
use bulletscript_core::{CodeBlock, CodeScope, CompilationError};
use bulletscript_registry::{ScopeKind, ScriptRegistry};

use crate::{ScopeStack, StmtCompiler};

type Result<T> = std::result::Result<T, CompilationError>;

/// The registry table a declaration kind is stored in.
pub fn scope_kind(kind: DeclKind) -> ScopeKind {
    match kind {
        DeclKind::Function => ScopeKind::Function,
        DeclKind::Action => ScopeKind::Action,
        DeclKind::EmitterUpdater => ScopeKind::EmitterUpdater,
        DeclKind::BulletUpdater => ScopeKind::BulletUpdater,
    }
}

/// An empty scope with the declaration's parameters declared.
pub fn parameter_scope<'ast>(decl: &Declaration<'ast>) -> Result<CodeScope> {
    let names: Vec<&str> = decl.params.iter().map(|param| param.name).collect();
    CodeScope::with_parameters(&names, decl.name.span)
}

/// Compile a declaration's body into a finished scope.
pub fn compile_body<'ast>(
    scopes: &mut ScopeStack,
    registry: &ScriptRegistry,
    decl: &Declaration<'ast>,
) -> Result<CodeScope> {
    scopes.push(parameter_scope(decl)?);

    let mut code = CodeBlock::new();
    let emitted = {
        let mut compiler = StmtCompiler::new(scopes, registry);
        decl.body
            .stmts
            .iter()
            .try_for_each(|stmt| compiler.emit_to(stmt, &mut code))
    };

    let mut scope = scopes.pop()?;
    emitted?;
    scope.code = code;
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use bulletscript_ast::{AstBuilder, BinaryOp};
    use bulletscript_core::Instruction;
    use bumpalo::Bump;

    #[test]
    fn parameters_are_slots() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = ScopeStack::new();

        let sum = b.binary(b.var("a"), BinaryOp::Add, b.var("b"));
        let decl = b.declaration(DeclKind::Function, "sum", &["a", "b"], &[b.ret(Some(sum))]);
        let scope = compile_body(&mut scopes, &fixture.registry, &decl).unwrap();

        assert!(scopes.is_empty());
        assert_eq!(scope.parameter_count(), 2);
        scope.code.assert_words(&[
            Instruction::GetVariable.word(),
            0.0,
            Instruction::GetVariable.word(),
            1.0,
            Instruction::OpAdd.word(),
            Instruction::Return.word(),
        ]);
    }

    #[test]
    fn failed_body_still_pops() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = ScopeStack::new();

        let decl = b.declaration(DeclKind::Action, "bad", &[], &[b.expr_stmt(b.var("nope"))]);
        assert!(matches!(
            compile_body(&mut scopes, &fixture.registry, &decl),
            Err(CompilationError::UnknownVariable { .. })
        ));
        assert!(scopes.is_empty());
    }

    #[test]
    fn duplicate_parameters_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = ScopeStack::new();

        let decl = b.declaration(DeclKind::Function, "f", &["x", "x"], &[]);
        assert!(matches!(
            compile_body(&mut scopes, &fixture.registry, &decl),
            Err(CompilationError::VariableRedeclaration { .. })
        ));
        assert!(scopes.is_empty());
    }

    #[test]
    fn kinds_map_to_tables() {
        assert_eq!(scope_kind(DeclKind::Function), ScopeKind::Function);
        assert_eq!(scope_kind(DeclKind::Action), ScopeKind::Action);
        assert_eq!(
            scope_kind(DeclKind::EmitterUpdater),
            ScopeKind::EmitterUpdater
        );
        assert_eq!(
            scope_kind(DeclKind::BulletUpdater),
            ScopeKind::BulletUpdater
        );
    }
}

//! Variable and property reads.
//!
//! Bare names resolve against the numerical table of the current scope.
//! `$name` resolves against the registry's global property table, so the
//! same index reads the same property on whichever entity type runs it.

use bulletscript_core::{CodeBlock, CompilationError, Instruction, Span, SymbolKind};

use super::{ExprCompiler, Result};

/// Slot of a numerical variable in the current scope.
pub fn numerical_slot(compiler: &ExprCompiler<'_, '_>, name: &str, span: Span) -> Result<usize> {
    let scope = compiler.current_scope()?;
    match scope.kind_of(name) {
        Some(SymbolKind::Numerical) => scope
            .numerical(name)
            .map(|record| record.index)
            .ok_or_else(|| unknown_variable(name, span)),
        Some(SymbolKind::EntityRef) => Err(CompilationError::NotNumerical {
            name: name.to_string(),
            span,
        }),
        None => Err(unknown_variable(name, span)),
    }
}

/// Global index of a property.
pub fn property_slot(compiler: &ExprCompiler<'_, '_>, name: &str, span: Span) -> Result<usize> {
    compiler
        .registry()
        .global_property_index(name)
        .ok_or_else(|| CompilationError::UnknownProperty {
            name: name.to_string(),
            span,
        })
}

/// `GetVariable slot`
pub fn generate_variable(
    compiler: &ExprCompiler<'_, '_>,
    name: &str,
    span: Span,
) -> Result<CodeBlock> {
    let index = numerical_slot(compiler, name, span)?;
    let mut code = CodeBlock::with_capacity(2);
    code.write_indexed(Instruction::GetVariable, index);
    Ok(code)
}

/// `GetProperty global`
pub fn generate_property(
    compiler: &ExprCompiler<'_, '_>,
    name: &str,
    span: Span,
) -> Result<CodeBlock> {
    let index = property_slot(compiler, name, span)?;
    let mut code = CodeBlock::with_capacity(2);
    code.write_indexed(Instruction::GetProperty, index);
    Ok(code)
}

fn unknown_variable(name: &str, span: Span) -> CompilationError {
    CompilationError::UnknownVariable {
        name: name.to_string(),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use bulletscript_ast::AstBuilder;
    use bumpalo::Bump;

    #[test]
    fn variable_reads_its_slot() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&["a", "b"]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        compiler
            .generate(&b.var("b"))
            .unwrap()
            .assert_words(&[Instruction::GetVariable.word(), 1.0]);
    }

    #[test]
    fn unknown_variable_reports_span() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&[]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        let err = compiler.generate(&b.at(4, 9).var("nope")).unwrap_err();
        assert_eq!(
            err,
            CompilationError::UnknownVariable {
                name: "nope".into(),
                span: Span::new(4, 9)
            }
        );
    }

    #[test]
    fn entity_ref_is_not_numerical() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);
        scopes
            .current_mut()
            .unwrap()
            .declare_entity_ref("target", Span::default())
            .unwrap();
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        assert!(matches!(
            compiler.generate(&b.var("target")),
            Err(CompilationError::NotNumerical { .. })
        ));
    }

    #[test]
    fn property_uses_global_index() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let scopes = fixture.scopes_with(&[]);
        let compiler = ExprCompiler::new(&scopes, &fixture.registry);

        let angle = fixture.registry.global_property_index("angle").unwrap();
        compiler
            .generate(&b.prop("angle"))
            .unwrap()
            .assert_words(&[Instruction::GetProperty.word(), angle as f32]);
        assert!(matches!(
            compiler.generate(&b.prop("colour")),
            Err(CompilationError::UnknownProperty { .. })
        ));
    }
}

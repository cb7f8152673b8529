//! Variable declarations.

use bulletscript_ast::{RefDeclStmt, VarDeclStmt};
use bulletscript_core::{CodeBlock, Instruction};

use super::{Result, StmtCompiler};

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile `var name = init;`.
    ///
    /// The name is declared before the initializer compiles, so the
    /// initializer already sees it. A missing initializer stores `0`.
    ///
    /// ```text
    /// [init] | Push 0
    /// SetVariable slot
    /// Pop
    /// ```
    pub fn emit_var_decl<'ast>(
        &mut self,
        var_decl: &VarDeclStmt<'ast>,
        target: &mut CodeBlock,
    ) -> Result<()> {
        let record = self
            .scopes
            .current_mut()?
            .declare_numerical(var_decl.name.name, var_decl.name.span)?;

        match var_decl.init {
            Some(init) => target.append(&self.expr_compiler().generate(init)?),
            None => {
                target.write_instruction(Instruction::Push);
                target.write_word(0.0);
            }
        }
        target.write_indexed(Instruction::SetVariable, record.index);
        target.write_instruction(Instruction::Pop);
        Ok(())
    }

    /// Compile `ref name;`. Only reserves an entity-reference slot.
    pub fn emit_ref_decl<'ast>(&mut self, ref_decl: &RefDeclStmt<'ast>) -> Result<()> {
        self.scopes
            .current_mut()?
            .declare_entity_ref(ref_decl.name.name, ref_decl.name.span)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use bulletscript_ast::AstBuilder;
    use bulletscript_core::{CompilationError, Instruction, Span};
    use bumpalo::Bump;

    #[test]
    fn var_decl_with_initializer() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&["p"]);

        let code = fixture
            .emit(&mut scopes, &[b.var_decl("x", Some(b.num(1.35)))])
            .unwrap();
        let index = scopes.current().unwrap().numerical("x").unwrap().index;
        assert_eq!(index, 1);
        code.assert_words(&[
            Instruction::Push.word(),
            1.35,
            Instruction::SetVariable.word(),
            index as f32,
            Instruction::Pop.word(),
        ]);
    }

    #[test]
    fn var_decl_defaults_to_zero() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        let code = fixture.emit(&mut scopes, &[b.var_decl("x", None)]).unwrap();
        code.assert_words(&[
            Instruction::Push.word(),
            0.0,
            Instruction::SetVariable.word(),
            0.0,
            Instruction::Pop.word(),
        ]);
    }

    #[test]
    fn redeclaration_fails() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&["x"]);

        let err = fixture
            .emit(&mut scopes, &[b.at(2, 1).var_decl("x", Some(b.num(1.0)))])
            .unwrap_err();
        assert_eq!(
            err,
            CompilationError::VariableRedeclaration {
                name: "x".into(),
                span: Span::new(2, 1)
            }
        );
    }

    #[test]
    fn ref_decl_emits_nothing() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let fixture = Fixture::new();
        let mut scopes = fixture.scopes_with(&[]);

        let code = fixture.emit(&mut scopes, &[b.ref_decl("target")]).unwrap();
        assert!(code.is_empty());
        let target = scopes.current().unwrap().entity_ref("target").unwrap();
        assert_eq!(target.index, 0);

        // The name is taken in both tables.
        let redeclared = fixture.emit(&mut scopes, &[b.var_decl("target", None)]);
        assert!(redeclared.is_err());
    }
}

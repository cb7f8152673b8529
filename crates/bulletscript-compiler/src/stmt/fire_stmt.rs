//! `fire` statements.
//!
//! A fire statement names an entity type and, optionally, a firing
//! function on it (`fire` when omitted). Its arguments are checked
//! against the firing function's arity, and an attached updater's
//! arguments against the bullet updater's parameter count.

use bulletscript_ast::{FireStmt, UpdaterClause};
use bulletscript_core::{CodeBlock, CompilationError, Instruction};
use bulletscript_registry::ScopeKind;

use super::{Result, StmtCompiler};
use crate::expr::check_arity;

impl<'a, 'reg> StmtCompiler<'a, 'reg> {
    /// Compile a fire statement.
    ///
    /// ```text
    /// [arg 0] .. [arg n-1]
    /// [updater arg 0] .. [updater arg m-1]     (with updater)
    /// Fire firing | FireWithUpdater firing updater
    /// ```
    pub fn emit_fire<'ast>(&mut self, fire: &FireStmt<'ast>, target: &mut CodeBlock) -> Result<()> {
        let type_name = fire.type_name.name;
        let function_name = fire.function_name();
        let function = self
            .registry
            .get_firing_function(type_name, function_name)
            .map_err(|_| CompilationError::UnknownFiringFunction {
                type_name: type_name.to_string(),
                function: function_name.to_string(),
                span: fire.span,
            })?;
        check_arity(
            "firing function",
            &format!("{type_name}.{function_name}"),
            function.arity,
            fire.args.len(),
            fire.span,
        )?;

        let updater = match &fire.updater {
            Some(clause) => Some((self.resolve_updater(clause)?, clause)),
            None => None,
        };

        let exprs = self.expr_compiler();
        target.append(&exprs.generate_all(fire.args)?);
        match updater {
            Some((updater, clause)) => {
                target.append(&exprs.generate_all(clause.args)?);
                target.write_instruction(Instruction::FireWithUpdater);
                target.write_word(function.index as f32);
                target.write_word(updater as f32);
            }
            None => target.write_indexed(Instruction::Fire, function.index),
        }
        Ok(())
    }

    /// Bullet-updater index for an updater clause, with its arity checked.
    fn resolve_updater<'ast>(&self, clause: &UpdaterClause<'ast>) -> Result<usize> {
        let name = clause.name.name;
        let updaters = self.registry.code_scopes(ScopeKind::BulletUpdater);
        let index = updaters
            .index_of(name)
            .ok_or_else(|| CompilationError::UnknownUpdater {
                name: name.to_string(),
                span: clause.name.span,
            })?;
        let expected = updaters
            .by_index(index)
            .map(|scope| scope.parameter_count())
            .unwrap_or_default();
        check_arity("updater", name, expected, clause.args.len(), clause.span)?;
        Ok(index)
    }
}

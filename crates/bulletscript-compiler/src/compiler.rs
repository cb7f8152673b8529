//! The compilation driver.
//!
//! [`Compiler::compile_script`] runs two passes over a script:
//!
//! - **Pass 1 (Declaration)**: register every declaration's name and
//!   parameters as a placeholder scope, so calls and `with updater`
//!   clauses resolve regardless of declaration order (and recursion works)
//! - **Pass 2 (Compilation)**: compile each body and replace its
//!   placeholder, keeping the index pass 1 handed out
//!
//! Errors are collected per declaration; one bad body does not stop the
//! rest of the script from compiling.

use rustc_hash::FxHashSet;
use tracing::debug;

use bulletscript_ast::{Declaration, Script};
use bulletscript_core::{CompilationError, RegistrationError, Span};
use bulletscript_registry::{ScopeKind, ScriptRegistry};

use crate::ScopeStack;
use crate::decl::{compile_body, parameter_scope, scope_kind};

type Result<T> = std::result::Result<T, CompilationError>;

/// A declaration that compiled and was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDeclaration {
    /// Table it was registered in.
    pub kind: ScopeKind,
    /// Declared name.
    pub name: String,
    /// Index within its table.
    pub index: usize,
}

/// Result of compiling a script.
#[derive(Debug, Default)]
pub struct CompilationResult {
    /// Successfully compiled declarations, in source order.
    pub declarations: Vec<CompiledDeclaration>,
    /// Any errors that occurred.
    pub errors: Vec<CompilationError>,
}

impl CompilationResult {
    /// Check if compilation succeeded (no errors).
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Index of a compiled declaration.
    pub fn index_of(&self, kind: ScopeKind, name: &str) -> Option<usize> {
        self.declarations
            .iter()
            .find(|decl| decl.kind == kind && decl.name == name)
            .map(|decl| decl.index)
    }
}

/// Compiles declarations into a registry's code-scope tables.
pub struct Compiler<'reg> {
    registry: &'reg mut ScriptRegistry,
    scopes: ScopeStack,
    /// Names registered by pass 1 whose bodies have not compiled yet.
    placeholders: FxHashSet<(ScopeKind, String)>,
}

impl<'reg> Compiler<'reg> {
    /// Create a compiler writing into `registry`.
    ///
    /// Types, properties and firing functions should already be
    /// registered and the property mappings rebuilt.
    pub fn new(registry: &'reg mut ScriptRegistry) -> Self {
        Self {
            registry,
            scopes: ScopeStack::new(),
            placeholders: FxHashSet::default(),
        }
    }

    /// The registry being compiled into.
    pub fn registry(&self) -> &ScriptRegistry {
        self.registry
    }

    /// Compile a whole script in two passes.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_script<'ast>(&mut self, script: &Script<'ast>) -> CompilationResult {
        let mut result = CompilationResult::default();

        let declared: Vec<&Declaration<'ast>> = script
            .declarations
            .iter()
            .filter(|decl| match self.declare(decl) {
                Ok(_) => true,
                Err(err) => {
                    result.errors.push(err);
                    false
                }
            })
            .collect();

        for decl in declared {
            match self.compile_declaration(decl) {
                Ok(compiled) => result.declarations.push(compiled),
                Err(err) => result.errors.push(err),
            }
        }

        debug!(
            compiled = result.declarations.len(),
            errors = result.errors.len(),
            "compiled script"
        );
        result
    }

    /// Register a placeholder scope carrying only the parameters.
    pub fn declare<'ast>(&mut self, decl: &Declaration<'ast>) -> Result<usize> {
        let kind = scope_kind(decl.kind);
        let name = decl.name.name;
        if self.registry.code_scopes(kind).index_of(name).is_some() {
            return Err(duplicate(kind, name, decl.name.span));
        }

        let scope = parameter_scope(decl)?;
        let index = self
            .registry
            .add_code_scope(kind, name, scope)
            .map_err(|source| registration(source, decl.span))?;
        self.placeholders.insert((kind, name.to_string()));
        Ok(index)
    }

    /// Compile one declaration and register it.
    ///
    /// Fills in the placeholder left by [`declare`](Self::declare) if there
    /// is one, otherwise declares it first. A name that already has a
    /// compiled body is a duplicate.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_declaration<'ast>(
        &mut self,
        decl: &Declaration<'ast>,
    ) -> Result<CompiledDeclaration> {
        let kind = scope_kind(decl.kind);
        let name = decl.name.name;
        let key = (kind, name.to_string());

        let index = match self.registry.code_scopes(kind).index_of(name) {
            Some(index) if self.placeholders.contains(&key) => index,
            Some(_) => return Err(duplicate(kind, name, decl.name.span)),
            None => self.declare(decl)?,
        };

        let scope = compile_body(&mut self.scopes, &*self.registry, decl)?;
        let words = scope.code.len();
        self.registry
            .replace_code_scope(kind, index, scope)
            .map_err(|source| registration(source, decl.span))?;
        self.placeholders.remove(&key);

        debug!(%kind, name, index, words, "compiled declaration");
        Ok(CompiledDeclaration {
            kind,
            name: key.1,
            index,
        })
    }
}

fn duplicate(kind: ScopeKind, name: &str, span: Span) -> CompilationError {
    CompilationError::DuplicateDeclaration {
        kind: kind.as_str(),
        name: name.to_string(),
        span,
    }
}

fn registration(source: RegistrationError, span: Span) -> CompilationError {
    CompilationError::Registration { source, span }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use bulletscript_ast::{AstBuilder, BinaryOp, DeclKind};
    use bulletscript_core::Instruction;
    use bumpalo::Bump;

    #[test]
    fn forward_call_resolves() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let caller = b.declaration(
            DeclKind::EmitterUpdater,
            "pattern",
            &[],
            &[b.expr_stmt(b.call("triple", &[b.num(2.0)]))],
        );
        let callee = b.declaration(
            DeclKind::Function,
            "triple",
            &["v"],
            &[b.ret(Some(b.binary(b.var("v"), BinaryOp::Mul, b.num(3.0))))],
        );
        let script = b.script(&[caller, callee]);

        let mut compiler = Compiler::new(&mut fixture.registry);
        let result = compiler.compile_script(&script);
        assert!(result.is_success(), "{:?}", result.errors);

        let triple = result.index_of(ScopeKind::Function, "triple").unwrap();
        let pattern = fixture
            .registry
            .get_emitter_updater_code_scope("pattern")
            .unwrap();
        pattern.code.assert_words(&[
            Instruction::Push.word(),
            2.0,
            Instruction::FunctionCall.word(),
            triple as f32,
            Instruction::Pop.word(),
        ]);
        let triple_scope = fixture.registry.function_code_scope(triple).unwrap();
        assert_eq!(triple_scope.code.len(), 6);
    }

    #[test]
    fn recursion_resolves() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let body = b.ret(Some(b.call("countdown", &[b.var("n")])));
        let decl = b.declaration(DeclKind::Function, "countdown", &["n"], &[body]);

        let mut compiler = Compiler::new(&mut fixture.registry);
        let compiled = compiler.compile_declaration(&decl).unwrap();
        let scope = fixture
            .registry
            .function_code_scope(compiled.index)
            .unwrap();
        assert_eq!(scope.code.word(3), Some(compiled.index as f32));
        assert_eq!(scope.index(), Some(compiled.index));
    }

    #[test]
    fn duplicate_declaration() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let first = b.declaration(DeclKind::Action, "move", &[], &[]);
        let second = b
            .at(5, 1)
            .declaration(DeclKind::Action, "move", &["x"], &[]);
        let other_kind = b.declaration(DeclKind::BulletUpdater, "move", &[], &[]);
        let script = b.script(&[first, second, other_kind]);

        let mut compiler = Compiler::new(&mut fixture.registry);
        let result = compiler.compile_script(&script);

        assert_eq!(
            result.errors,
            vec![CompilationError::DuplicateDeclaration {
                kind: "action",
                name: "move".into(),
                span: Span::new(5, 1)
            }]
        );
        assert_eq!(result.declarations.len(), 2);
        let moved = fixture.registry.get_action_code_scope("move").unwrap();
        assert_eq!(moved.parameter_count(), 0);
    }

    #[test]
    fn compiled_name_cannot_be_redefined() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let decl = b.declaration(DeclKind::EmitterUpdater, "spin", &[], &[]);
        let mut compiler = Compiler::new(&mut fixture.registry);
        compiler.compile_declaration(&decl).unwrap();
        assert!(matches!(
            compiler.compile_declaration(&decl),
            Err(CompilationError::DuplicateDeclaration {
                kind: "emitter updater",
                ..
            })
        ));
    }

    #[test]
    fn errors_do_not_stop_other_declarations() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let bad = b.declaration(DeclKind::Action, "bad", &[], &[b.expr_stmt(b.var("x"))]);
        let good = b.declaration(DeclKind::Action, "good", &[], &[b.wait(b.num(1.0))]);
        let script = b.script(&[bad, good]);

        let mut compiler = Compiler::new(&mut fixture.registry);
        let result = compiler.compile_script(&script);

        assert!(!result.is_success());
        assert_eq!(result.errors.len(), 1);
        assert!(result.index_of(ScopeKind::Action, "good").is_some());
        assert!(result.index_of(ScopeKind::Action, "bad").is_none());
    }

    #[test]
    fn updater_declared_later_in_script() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut fixture = Fixture::new();

        let args = [b.num(0.0), b.num(0.0)];
        let fire = b.fire_with_updater("bullet", &args, "curve", &[b.num(2.0), b.num(3.0)]);
        let emitter = b.declaration(DeclKind::EmitterUpdater, "burst", &[], &[fire]);
        let updater = b.declaration(
            DeclKind::BulletUpdater,
            "curve",
            &["turn", "accel"],
            &[b.wait(b.num(1.0))],
        );
        let script = b.script(&[emitter, updater]);

        let mut compiler = Compiler::new(&mut fixture.registry);
        let result = compiler.compile_script(&script);
        assert!(result.is_success(), "{:?}", result.errors);
    }
}

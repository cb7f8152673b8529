//! BulletScript compiler.
//!
//! Turns the tree from `bulletscript-ast` into flat word code stored in
//! the code-scope tables of a [`ScriptRegistry`](bulletscript_registry::ScriptRegistry).
//!
//! ## Architecture
//!
//! - **Pass 1 (Declaration)**: register every declaration's name and parameters
//! - **Pass 2 (Compilation)**: generate each body and replace its placeholder
//!
//! ## Modules
//!
//! - [`compiler`]: The two-pass driver and [`CompilationResult`]
//! - [`decl`]: Compiling one declaration body into a [`CodeScope`](bulletscript_core::CodeScope)
//! - [`expr`]: Expression generators producing standalone code blocks
//! - [`jumps`]: Break/continue fix-up lists
//! - [`scope_stack`]: The stack of scopes being compiled
//! - [`stmt`]: Statement emitters writing into the enclosing block
//!
//! # Example
//!
//! ```
//! use bulletscript_ast::{AstBuilder, DeclKind};
//! use bulletscript_compiler::Compiler;
//! use bulletscript_registry::{FireContext, ScriptRegistry};
//! use bumpalo::Bump;
//!
//! struct Bullet;
//!
//! let mut registry = ScriptRegistry::new();
//! registry.add_type::<Bullet>("bullet").unwrap();
//! registry.update_property_mappings();
//! registry
//!     .add_firing_function("bullet", "fire", |_: &FireContext, _x: f32, _y: f32| {})
//!     .unwrap();
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let decl = b.declaration(
//!     DeclKind::EmitterUpdater,
//!     "spray",
//!     &[],
//!     &[b.fire("bullet", &[b.num(0.0), b.num(0.0)]), b.wait(b.num(5.0))],
//! );
//!
//! let result = Compiler::new(&mut registry).compile_script(&b.script(&[decl]));
//! assert!(result.is_success());
//! assert!(registry.get_emitter_updater_code_scope("spray").is_ok());
//! ```

pub mod compiler;
pub mod decl;
pub mod expr;
pub mod jumps;
pub mod scope_stack;
pub mod stmt;

pub use compiler::{CompilationResult, CompiledDeclaration, Compiler};
pub use expr::ExprCompiler;
pub use jumps::LoopFixups;
pub use scope_stack::ScopeStack;
pub use stmt::StmtCompiler;

// Re-export CompilationError from core for convenience
pub use bulletscript_core::CompilationError;

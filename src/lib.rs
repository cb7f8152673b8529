//! BulletScript: a compiler and resumable VM for bullet-pattern scripts.
//!
//! The toolchain is split into layers, each its own crate and re-exported
//! here:
//!
//! - [`core`]: instruction set, code blocks, scopes, errors and limits
//! - [`ast`]: the declaration/statement/expression tree
//! - [`registry`]: entity types, firing functions, code scopes and natives
//! - [`compiler`]: turns declarations into code scopes in a registry
//! - [`vm`]: interprets code against a per-entity [`ScriptState`]
//!
//! A host registers its entity types and firing functions, compiles a
//! script once, then calls [`VirtualMachine::interpret_code`] for every
//! scripted entity each tick.
//!
//! # Example
//!
//! ```
//! use bulletscript::prelude::*;
//! use bumpalo::Bump;
//!
//! #[derive(Default)]
//! struct Emitter { angle: f32 }
//!
//! let mut registry = ScriptRegistry::new();
//! registry.add_type::<Emitter>("emitter").unwrap();
//! registry
//!     .add_property::<Emitter>("emitter", "angle", |e| e.angle, |e, v| e.angle = v)
//!     .unwrap();
//! registry.update_property_mappings();
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! // $angle += 15; wait 1;
//! let decl = b.declaration(
//!     DeclKind::EmitterUpdater,
//!     "spin",
//!     &[],
//!     &[
//!         b.expr_stmt(b.assign(b.prop("angle"), AssignOp::AddAssign, b.num(15.0))),
//!         b.wait(b.num(1.0)),
//!     ],
//! );
//! assert!(Compiler::new(&mut registry).compile_script(&b.script(&[decl])).is_success());
//!
//! let code = &registry.get_emitter_updater_code_scope("spin").unwrap().code;
//! let vm = VirtualMachine::new(&registry);
//! let mut state = ScriptState::new(VmLimits::default());
//! let mut emitter = Emitter::default();
//!
//! // Tick 1 turns and waits, tick 2 finishes the wait, tick 3 turns again.
//! for _ in 0..3 {
//!     vm.interpret_code(code, &mut state, &mut emitter, true).unwrap();
//! }
//! assert_eq!(emitter.angle, 30.0);
//! ```

pub use bulletscript_ast as ast;
pub use bulletscript_compiler as compiler;
pub use bulletscript_core as core;
pub use bulletscript_registry as registry;
pub use bulletscript_vm as vm;

pub use bulletscript_compiler::{CompilationResult, Compiler};
pub use bulletscript_core::{
    BulletScriptError, CodeBlock, CodeScope, CompilationError, ErrorCategory, Instruction,
    RegistrationError, RuntimeError, Span, VmLimits,
};
pub use bulletscript_registry::{FireContext, ScopeKind, ScriptRegistry};
pub use bulletscript_vm::{ScriptState, ScriptStatus, VirtualMachine};

/// Everything a host usually needs.
pub mod prelude {
    pub use bulletscript_ast::{AssignOp, AstBuilder, BinaryOp, DeclKind, PostfixOp, UnaryOp};
    pub use bulletscript_compiler::{CompilationResult, Compiler};
    pub use bulletscript_core::{
        BulletScriptError, CodeBlock, CompilationError, ErrorCategory, Instruction,
        OperandStack, RuntimeError, VmLimits,
    };
    pub use bulletscript_registry::{AttachedUpdater, FireContext, ScopeKind, ScriptRegistry};
    pub use bulletscript_vm::{ScriptState, ScriptStatus, VirtualMachine};
}

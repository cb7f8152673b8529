//! Resumable bytecode interpreter for BulletScript.
//!
//! The VM is stateless apart from a registry borrow. Each scripted entity
//! owns a [`ScriptState`] that carries its instruction pointer, operand
//! stack, variable slots and call frames from one tick to the next, so a
//! `wait` inside a nested function call resumes exactly where it stopped.
//!
//! # Example
//!
//! ```
//! use bulletscript_core::{CodeBlock, Instruction};
//! use bulletscript_registry::ScriptRegistry;
//! use bulletscript_vm::{ScriptState, ScriptStatus, VirtualMachine, VmLimits};
//!
//! struct Emitter;
//!
//! let mut registry = ScriptRegistry::new();
//! registry.add_type::<Emitter>("emitter").unwrap();
//!
//! // wait 1; return 4;
//! let code = CodeBlock::from(vec![
//!     Instruction::Push.word(), 1.0,
//!     Instruction::WaitFrames.word(),
//!     Instruction::Push.word(), 4.0,
//!     Instruction::Return.word(),
//! ]);
//!
//! let vm = VirtualMachine::new(&registry);
//! let mut state = ScriptState::new(VmLimits::default());
//! let mut emitter = Emitter;
//!
//! let status = vm.interpret_code(&code, &mut state, &mut emitter, true);
//! assert_eq!(status, Ok(ScriptStatus::Suspended));
//! let status = vm.interpret_code(&code, &mut state, &mut emitter, true);
//! assert_eq!(status, Ok(ScriptStatus::Ok));
//! assert_eq!(state.last_return(), Some(4.0));
//! ```

pub mod interpreter;
pub mod state;

pub use bulletscript_core::{OperandStack, VmLimits};
pub use interpreter::VirtualMachine;
pub use state::{CallFrame, ScriptState, ScriptStatus, StateFlags};

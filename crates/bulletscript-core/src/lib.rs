//! Core types for the BulletScript toolchain.
//!
//! This crate holds everything the compiler and the VM both need:
//!
//! - [`bytecode`]: The instruction set and the [`CodeBlock`] word container
//! - [`code_scope`]: [`CodeScope`] and its symbol tables
//! - [`error`]: Registration, compilation and runtime errors
//! - [`limits`]: [`VmLimits`], the fixed runtime capacities
//! - [`span`]: Source positions attached to tree nodes
//! - [`stack`]: [`OperandStack`], shared by the VM and native delegates

pub mod bytecode;
pub mod code_scope;
pub mod error;
pub mod limits;
pub mod span;
pub mod stack;

pub use bytecode::{BinaryOperator, CodeBlock, Instruction, Op};
pub use code_scope::{CodeScope, IdentifierRecord, SymbolKind, SymbolTable};
pub use error::{
    BulletScriptError, CompilationError, ErrorCategory, RegistrationError, RuntimeError,
};
pub use limits::VmLimits;
pub use span::Span;
pub use stack::OperandStack;

//! Bytecode types shared by the compiler and the VM.
//!
//! - [`Instruction`] - The opcode vocabulary
//! - [`Op`] - A decoded instruction with its operands
//! - [`BinaryOperator`] - Arithmetic, comparison and logical operators
//! - [`CodeBlock`] - A flat sequence of code words

mod code_block;
mod instruction;

pub use code_block::CodeBlock;
pub use instruction::{BinaryOperator, Instruction, Op};

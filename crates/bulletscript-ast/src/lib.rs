//! Parse tree handed to the BulletScript compiler.
//!
//! This crate provides:
//! - Statement, expression and declaration nodes allocated in a
//!   [`bumpalo::Bump`] arena
//! - Operator enums shared with the compiler's opcode mapping
//! - [`AstBuilder`] for constructing trees without a parser
//!
//! The textual front end is a separate concern; anything that can build
//! these nodes can drive the compiler.
//!
//! # Example
//!
//! ```
//! use bulletscript_ast::{AstBuilder, DeclKind};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let decl = b.declaration(
//!     DeclKind::EmitterUpdater,
//!     "spiral",
//!     &[],
//!     &[b.fire("bullet", &[b.num(0.0), b.num(0.0)]), b.wait(b.num(10.0))],
//! );
//! assert_eq!(decl.body.stmts.len(), 2);
//! ```

use bulletscript_core::Span;

pub mod builder;
pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use builder::AstBuilder;
pub use decl::*;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

/// A name with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    /// The identifier text
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

//! Top-level declarations.
//!
//! A script is a flat list of named, parameterized bodies. The four kinds
//! compile identically and differ only in which registry table receives
//! the result.

use std::fmt;

use bulletscript_core::Span;

use crate::Ident;
use crate::stmt::Block;

/// Which named table a declaration is registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// A callable function returning a value.
    Function,
    /// A reusable updater body.
    Action,
    /// Per-tick routine for an emitter.
    EmitterUpdater,
    /// Per-tick routine for a bullet.
    BulletUpdater,
}

impl DeclKind {
    /// All kinds, in registration order.
    pub const ALL: [DeclKind; 4] = [
        DeclKind::Function,
        DeclKind::Action,
        DeclKind::EmitterUpdater,
        DeclKind::BulletUpdater,
    ];

    /// Human-readable kind used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::Action => "action",
            DeclKind::EmitterUpdater => "emitter updater",
            DeclKind::BulletUpdater => "bullet updater",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function, action or updater declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declaration<'ast> {
    /// Which table the compiled body goes to
    pub kind: DeclKind,
    /// Declared name
    pub name: Ident<'ast>,
    /// Formal parameters, bound to slots 0..n in order
    pub params: &'ast [Ident<'ast>],
    /// Body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A whole script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Script<'ast> {
    /// Declarations in source order
    pub declarations: &'ast [Declaration<'ast>],
    /// Source location
    pub span: Span,
}

impl<'ast> Script<'ast> {
    /// Iterate declarations of one kind.
    pub fn of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Declaration<'ast>> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }
}

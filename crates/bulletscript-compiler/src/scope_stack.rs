//! Stack of code scopes being compiled.
//!
//! Declarations push a fresh [`CodeScope`] before compiling their body and
//! pop it afterwards. Symbol declaration and lookup always go through
//! [`ScopeStack::current`]; a scope is only ever removed when it is on top.

use bulletscript_core::{CodeScope, CompilationError};

/// LIFO stack of active code scopes.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<CodeScope>,
}

impl ScopeStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `scope` current.
    pub fn push(&mut self, scope: CodeScope) {
        self.scopes.push(scope);
    }

    /// Remove and return the current scope.
    pub fn pop(&mut self) -> Result<CodeScope, CompilationError> {
        self.scopes.pop().ok_or(CompilationError::EmptyScopeStack)
    }

    /// The current scope.
    pub fn current(&self) -> Result<&CodeScope, CompilationError> {
        self.scopes.last().ok_or(CompilationError::EmptyScopeStack)
    }

    /// The current scope, mutably.
    pub fn current_mut(&mut self) -> Result<&mut CodeScope, CompilationError> {
        self.scopes
            .last_mut()
            .ok_or(CompilationError::EmptyScopeStack)
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Check if no scope is active.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

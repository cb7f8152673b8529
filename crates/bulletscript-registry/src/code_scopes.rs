//! Named tables of compiled code scopes.

use std::fmt;

use rustc_hash::FxHashMap;

use bulletscript_core::{CodeScope, RegistrationError};

/// The four independent name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Callable functions.
    Function,
    /// Reusable updater bodies.
    Action,
    /// Emitter per-tick routines.
    EmitterUpdater,
    /// Bullet per-tick routines.
    BulletUpdater,
}

impl ScopeKind {
    /// Name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Function => "function",
            ScopeKind::Action => "action",
            ScopeKind::EmitterUpdater => "emitter updater",
            ScopeKind::BulletUpdater => "bullet updater",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One name to scope table. Indices follow insertion order.
#[derive(Debug)]
pub struct ScopeTable {
    kind: ScopeKind,
    scopes: Vec<CodeScope>,
    names: Vec<String>,
    by_name: FxHashMap<String, usize>,
}

impl ScopeTable {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            scopes: Vec::new(),
            names: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Register a scope, stamping and returning its index.
    pub fn add(&mut self, name: &str, mut scope: CodeScope) -> Result<usize, RegistrationError> {
        if self.by_name.contains_key(name) {
            return Err(RegistrationError::DuplicateRegistration {
                name: name.to_string(),
                kind: self.kind.as_str(),
            });
        }
        let index = self.scopes.len();
        scope.set_index(index);
        self.scopes.push(scope);
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), index);
        Ok(index)
    }

    /// Swap in a new scope at an existing index.
    pub fn replace(&mut self, index: usize, mut scope: CodeScope) -> Result<(), RegistrationError> {
        let slot = self
            .scopes
            .get_mut(index)
            .ok_or(RegistrationError::IndexOutOfRange {
                kind: self.kind.as_str(),
                index,
            })?;
        scope.set_index(index);
        *slot = scope;
        Ok(())
    }

    /// Look up by name.
    pub fn get(&self, name: &str) -> Result<&CodeScope, RegistrationError> {
        self.by_name
            .get(name)
            .map(|&i| &self.scopes[i])
            .ok_or_else(|| RegistrationError::NotFound {
                kind: self.kind.as_str(),
                name: name.to_string(),
            })
    }

    /// Index of a name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Look up by index.
    pub fn by_index(&self, index: usize) -> Option<&CodeScope> {
        self.scopes.get(index)
    }

    /// Name registered at `index`.
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Which table this is.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Functions, actions, emitter updaters and bullet updaters.
#[derive(Debug)]
pub struct CodeScopeRegistry {
    functions: ScopeTable,
    actions: ScopeTable,
    emitter_updaters: ScopeTable,
    bullet_updaters: ScopeTable,
}

impl Default for CodeScopeRegistry {
    fn default() -> Self {
        Self {
            functions: ScopeTable::new(ScopeKind::Function),
            actions: ScopeTable::new(ScopeKind::Action),
            emitter_updaters: ScopeTable::new(ScopeKind::EmitterUpdater),
            bullet_updaters: ScopeTable::new(ScopeKind::BulletUpdater),
        }
    }
}

impl CodeScopeRegistry {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for `kind`.
    pub fn table(&self, kind: ScopeKind) -> &ScopeTable {
        match kind {
            ScopeKind::Function => &self.functions,
            ScopeKind::Action => &self.actions,
            ScopeKind::EmitterUpdater => &self.emitter_updaters,
            ScopeKind::BulletUpdater => &self.bullet_updaters,
        }
    }

    /// The mutable table for `kind`.
    pub fn table_mut(&mut self, kind: ScopeKind) -> &mut ScopeTable {
        match kind {
            ScopeKind::Function => &mut self.functions,
            ScopeKind::Action => &mut self.actions,
            ScopeKind::EmitterUpdater => &mut self.emitter_updaters,
            ScopeKind::BulletUpdater => &mut self.bullet_updaters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletscript_core::{Instruction, Span};

    #[test]
    fn add_assigns_sequential_indices() {
        let mut scopes = CodeScopeRegistry::new();
        let table = scopes.table_mut(ScopeKind::Function);
        assert_eq!(table.add("a", CodeScope::new()), Ok(0));
        assert_eq!(table.add("b", CodeScope::new()), Ok(1));

        let b = scopes.table(ScopeKind::Function).get("b").unwrap();
        assert_eq!(b.index(), Some(1));
        assert_eq!(scopes.table(ScopeKind::Function).name_of(0), Some("a"));
    }

    #[test]
    fn tables_are_independent() {
        let mut scopes = CodeScopeRegistry::new();
        scopes
            .table_mut(ScopeKind::Action)
            .add("move", CodeScope::new())
            .unwrap();
        scopes
            .table_mut(ScopeKind::BulletUpdater)
            .add("move", CodeScope::new())
            .unwrap();

        assert!(matches!(
            scopes.table(ScopeKind::Function).get("move"),
            Err(RegistrationError::NotFound {
                kind: "function",
                ..
            })
        ));
        let duplicate = scopes
            .table_mut(ScopeKind::Action)
            .add("move", CodeScope::new())
            .unwrap_err();
        assert!(matches!(
            duplicate,
            RegistrationError::DuplicateRegistration { kind: "action", .. }
        ));
    }

    #[test]
    fn replace_keeps_index() {
        let mut scopes = CodeScopeRegistry::new();
        let table = scopes.table_mut(ScopeKind::EmitterUpdater);
        let index = table
            .add(
                "spin",
                CodeScope::with_parameters(&["n"], Span::default()).unwrap(),
            )
            .unwrap();

        let mut compiled = CodeScope::new();
        compiled.code.write_instruction(Instruction::Return);
        table.replace(index, compiled).unwrap();

        let spin = table.by_index(index).unwrap();
        assert_eq!(spin.index(), Some(index));
        assert_eq!(spin.code.len(), 1);
        assert!(matches!(
            table.replace(5, CodeScope::new()),
            Err(RegistrationError::IndexOutOfRange { index: 5, .. })
        ));
    }
}

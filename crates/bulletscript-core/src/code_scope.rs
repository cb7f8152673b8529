//! Per-declaration code plus symbol tables.
//!
//! Every function, action and updater body compiles into its own
//! `CodeScope`. Symbol indices are scope-local: index 0 is the first
//! declared name in this scope, whichever frame the VM later runs it in.

use rustc_hash::FxHashMap;

use crate::{CodeBlock, CompilationError, Span};

// ============================================================================
// Types
// ============================================================================

/// The resolved form of a symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierRecord {
    /// Declared name.
    pub name: String,
    /// Slot index within the declaring scope's table.
    pub index: usize,
}

/// Which table a symbol lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A float variable addressed by `GetVariable`/`SetVariable`.
    Numerical,
    /// A handle to another entity, not usable in arithmetic.
    EntityRef,
}

/// Name to index map with sequential, immutable indices.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    indices: FxHashMap<String, usize>,
    names: Vec<String>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &str) -> usize {
        let index = self.names.len();
        self.indices.insert(name.to_string(), index);
        self.names.push(name.to_string());
        index
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<IdentifierRecord> {
        self.indices.get(name).map(|&index| IdentifierRecord {
            name: name.to_string(),
            index,
        })
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of declared symbols.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// CodeScope
// ============================================================================

/// A code block with its local numerical and entity-reference tables.
///
/// Formal parameters are declared first, so parameter `i` is always
/// numerical slot `i`. A name may live in only one of the two tables.
#[derive(Debug, Clone, Default)]
pub struct CodeScope {
    /// The compiled body.
    pub code: CodeBlock,
    numerical: SymbolTable,
    entity_refs: SymbolTable,
    parameter_count: usize,
    index: Option<usize>,
}

impl CodeScope {
    /// Create a scope with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope pre-seeded with parameter names as numerical variables.
    pub fn with_parameters<S: AsRef<str>>(
        parameters: &[S],
        span: Span,
    ) -> Result<Self, CompilationError> {
        let mut scope = Self::new();
        for parameter in parameters {
            scope.declare_numerical(parameter.as_ref(), span)?;
        }
        scope.parameter_count = parameters.len();
        Ok(scope)
    }

    /// Declare a numerical variable, returning its slot.
    pub fn declare_numerical(
        &mut self,
        name: &str,
        span: Span,
    ) -> Result<IdentifierRecord, CompilationError> {
        self.check_undeclared(name, span)?;
        let index = self.numerical.insert(name);
        Ok(IdentifierRecord {
            name: name.to_string(),
            index,
        })
    }

    /// Declare an entity-reference variable, returning its slot.
    pub fn declare_entity_ref(
        &mut self,
        name: &str,
        span: Span,
    ) -> Result<IdentifierRecord, CompilationError> {
        self.check_undeclared(name, span)?;
        let index = self.entity_refs.insert(name);
        Ok(IdentifierRecord {
            name: name.to_string(),
            index,
        })
    }

    fn check_undeclared(&self, name: &str, span: Span) -> Result<(), CompilationError> {
        if self.numerical.contains(name) || self.entity_refs.contains(name) {
            return Err(CompilationError::VariableRedeclaration {
                name: name.to_string(),
                span,
            });
        }
        Ok(())
    }

    /// Look up a numerical variable.
    pub fn numerical(&self, name: &str) -> Option<IdentifierRecord> {
        self.numerical.get(name)
    }

    /// Look up an entity-reference variable.
    pub fn entity_ref(&self, name: &str) -> Option<IdentifierRecord> {
        self.entity_refs.get(name)
    }

    /// Which table declares `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        if self.numerical.contains(name) {
            Some(SymbolKind::Numerical)
        } else if self.entity_refs.contains(name) {
            Some(SymbolKind::EntityRef)
        } else {
            None
        }
    }

    /// The numerical table.
    pub fn numerical_symbols(&self) -> &SymbolTable {
        &self.numerical
    }

    /// The entity-reference table.
    pub fn entity_ref_symbols(&self) -> &SymbolTable {
        &self.entity_refs
    }

    /// Declared parameter count.
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Numerical slots a frame running this scope needs.
    pub fn variable_count(&self) -> usize {
        self.numerical.len()
    }

    /// Position in the owning registry, once registered.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Record the registry position.
    pub fn set_index(&mut self, index: usize) {
        self.index = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_take_the_first_slots() {
        let mut scope = CodeScope::with_parameters(&["a", "b"], Span::default()).unwrap();
        let local = scope.declare_numerical("c", Span::default()).unwrap();

        assert_eq!(scope.parameter_count(), 2);
        assert_eq!(scope.numerical("a").unwrap().index, 0);
        assert_eq!(scope.numerical("b").unwrap().index, 1);
        assert_eq!(local.index, 2);
        assert_eq!(scope.variable_count(), 3);
    }

    #[test]
    fn tables_index_independently() {
        let mut scope = CodeScope::new();
        scope.declare_numerical("x", Span::default()).unwrap();
        let target = scope.declare_entity_ref("target", Span::default()).unwrap();

        assert_eq!(target.index, 0);
        assert_eq!(scope.kind_of("x"), Some(SymbolKind::Numerical));
        assert_eq!(scope.kind_of("target"), Some(SymbolKind::EntityRef));
        assert_eq!(scope.kind_of("missing"), None);
        assert!(scope.numerical("target").is_none());
    }

    #[test]
    fn redeclaration_fails_across_tables() {
        let mut scope = CodeScope::new();
        scope.declare_numerical("x", Span::new(1, 1)).unwrap();

        let err = scope.declare_numerical("x", Span::new(2, 5)).unwrap_err();
        assert!(matches!(
            err,
            CompilationError::VariableRedeclaration { ref name, span }
                if name == "x" && span == Span::new(2, 5)
        ));
        assert!(scope.declare_entity_ref("x", Span::new(3, 1)).is_err());
    }

    #[test]
    fn duplicate_parameter_names_fail() {
        let scope = CodeScope::with_parameters(&["a", "a"], Span::default());
        assert!(scope.is_err());
    }

    #[test]
    fn index_assigned_on_registration() {
        let mut scope = CodeScope::new();
        assert_eq!(scope.index(), None);
        scope.set_index(4);
        assert_eq!(scope.index(), Some(4));
    }
}

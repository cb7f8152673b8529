//! Registries shared by the BulletScript compiler and VM.
//!
//! [`ScriptRegistry`] is the single object a host populates:
//!
//! - **Types**: entity types and their float properties ([`TypeRegistry`])
//! - **Firing functions**: native spawn callbacks keyed by type and name
//! - **Code scopes**: four named tables of compiled bodies
//! - **External functions**: native delegates working on the operand stack
//!
//! # Lifecycle
//!
//! Registration happens single-threaded: types and properties first, then
//! [`ScriptRegistry::update_property_mappings`], then firing and external
//! functions, then compilation fills the code-scope tables. After that the
//! registry is only read, and every stored callback is `Send + Sync`, so a
//! finished registry can be shared behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use bulletscript_registry::{FireContext, ScriptRegistry};
//!
//! struct Bullet { x: f32 }
//!
//! let mut registry = ScriptRegistry::new();
//! registry.add_type::<Bullet>("bullet").unwrap();
//! registry.add_property::<Bullet>("bullet", "x", |b| b.x, |b, v| b.x = v).unwrap();
//! registry.update_property_mappings();
//! registry
//!     .add_firing_function("bullet", "fire", |_: &FireContext, _x: f32, _y: f32| {})
//!     .unwrap();
//!
//! assert_eq!(registry.global_property_index("x"), Some(0));
//! assert_eq!(registry.get_firing_function("bullet", "fire").unwrap().arity, 2);
//! ```

use std::any::Any;

use tracing::debug;

use bulletscript_core::{CodeScope, OperandStack, RegistrationError, RuntimeError};

pub mod code_scopes;
pub mod external;
pub mod firing;
pub mod types;

pub use code_scopes::{CodeScopeRegistry, ScopeKind, ScopeTable};
pub use external::{ExternalFunction, ExternalFunctionRegistry};
pub use firing::{
    AttachedUpdater, FireContext, FiringCallback, FiringFunctionDefinition, FiringRegistry,
};
pub use types::{
    PropertyAccessor, PropertyBinding, PropertyGetter, PropertySetter, TypeDefinition,
    TypeRegistry,
};

/// Everything the compiler resolves against and the VM dispatches through.
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    types: TypeRegistry,
    firing: FiringRegistry,
    scopes: CodeScopeRegistry,
    externals: ExternalFunctionRegistry,
}

impl ScriptRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Types and properties
    // ==========================================================================

    /// Register Rust type `T` under a script-visible name.
    pub fn add_type<T: Any>(&mut self, name: &str) -> Result<usize, RegistrationError> {
        self.types.add_type::<T>(name)
    }

    /// Bind a float property on a registered type.
    pub fn add_property<T: Any>(
        &mut self,
        type_name: &str,
        name: &str,
        getter: PropertyGetter<T>,
        setter: PropertySetter<T>,
    ) -> Result<usize, RegistrationError> {
        self.types
            .add_property::<T>(type_name, name, getter, setter)
    }

    /// Rebuild the global property table. See [`TypeRegistry::update_property_mappings`].
    pub fn update_property_mappings(&mut self) {
        self.types.update_property_mappings();
    }

    /// Global index of a property name.
    pub fn global_property_index(&self, name: &str) -> Option<usize> {
        self.types.global_property_index(name)
    }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    // ==========================================================================
    // Code scopes
    // ==========================================================================

    /// Register a compiled scope into the table for `kind`.
    pub fn add_code_scope(
        &mut self,
        kind: ScopeKind,
        name: &str,
        scope: CodeScope,
    ) -> Result<usize, RegistrationError> {
        let words = scope.code.len();
        let index = self.scopes.table_mut(kind).add(name, scope)?;
        debug!(%kind, name, index, words, "registered code scope");
        Ok(index)
    }

    /// Replace the scope at `index` in the table for `kind`.
    pub fn replace_code_scope(
        &mut self,
        kind: ScopeKind,
        index: usize,
        scope: CodeScope,
    ) -> Result<(), RegistrationError> {
        self.scopes.table_mut(kind).replace(index, scope)
    }

    /// Look up a scope by name in the table for `kind`.
    pub fn get_code_scope(
        &self,
        kind: ScopeKind,
        name: &str,
    ) -> Result<&CodeScope, RegistrationError> {
        self.scopes.table(kind).get(name)
    }

    /// The table for `kind`.
    pub fn code_scopes(&self, kind: ScopeKind) -> &ScopeTable {
        self.scopes.table(kind)
    }

    /// Register a function.
    pub fn add_function_code_scope(
        &mut self,
        name: &str,
        scope: CodeScope,
    ) -> Result<usize, RegistrationError> {
        self.add_code_scope(ScopeKind::Function, name, scope)
    }

    /// Register an action.
    pub fn add_action_code_scope(
        &mut self,
        name: &str,
        scope: CodeScope,
    ) -> Result<usize, RegistrationError> {
        self.add_code_scope(ScopeKind::Action, name, scope)
    }

    /// Register an emitter updater.
    pub fn add_emitter_updater_code_scope(
        &mut self,
        name: &str,
        scope: CodeScope,
    ) -> Result<usize, RegistrationError> {
        self.add_code_scope(ScopeKind::EmitterUpdater, name, scope)
    }

    /// Register a bullet updater.
    pub fn add_bullet_updater_code_scope(
        &mut self,
        name: &str,
        scope: CodeScope,
    ) -> Result<usize, RegistrationError> {
        self.add_code_scope(ScopeKind::BulletUpdater, name, scope)
    }

    /// Look up a function by name.
    pub fn get_function_code_scope(&self, name: &str) -> Result<&CodeScope, RegistrationError> {
        self.get_code_scope(ScopeKind::Function, name)
    }

    /// Look up an action by name.
    pub fn get_action_code_scope(&self, name: &str) -> Result<&CodeScope, RegistrationError> {
        self.get_code_scope(ScopeKind::Action, name)
    }

    /// Look up an emitter updater by name.
    pub fn get_emitter_updater_code_scope(
        &self,
        name: &str,
    ) -> Result<&CodeScope, RegistrationError> {
        self.get_code_scope(ScopeKind::EmitterUpdater, name)
    }

    /// Look up a bullet updater by name.
    pub fn get_bullet_updater_code_scope(
        &self,
        name: &str,
    ) -> Result<&CodeScope, RegistrationError> {
        self.get_code_scope(ScopeKind::BulletUpdater, name)
    }

    /// Function at `index`.
    pub fn function_code_scope(&self, index: usize) -> Option<&CodeScope> {
        self.scopes.table(ScopeKind::Function).by_index(index)
    }

    /// Action at `index`.
    pub fn action_code_scope(&self, index: usize) -> Option<&CodeScope> {
        self.scopes.table(ScopeKind::Action).by_index(index)
    }

    /// Emitter updater at `index`.
    pub fn emitter_updater_code_scope(&self, index: usize) -> Option<&CodeScope> {
        self.scopes.table(ScopeKind::EmitterUpdater).by_index(index)
    }

    /// Bullet updater at `index`.
    pub fn bullet_updater_code_scope(&self, index: usize) -> Option<&CodeScope> {
        self.scopes.table(ScopeKind::BulletUpdater).by_index(index)
    }

    // ==========================================================================
    // Firing and external functions
    // ==========================================================================

    /// Register a firing function for a registered type.
    ///
    /// The arity is taken from the callback's float parameter count.
    pub fn add_firing_function<Args, C>(
        &mut self,
        type_name: &str,
        name: &str,
        callback: C,
    ) -> Result<usize, RegistrationError>
    where
        C: FiringCallback<Args>,
    {
        if !self.types.contains_type(type_name) {
            return Err(RegistrationError::TypeNotFound(type_name.to_string()));
        }
        let index = self.firing.add(type_name, name, callback)?;
        debug!(
            type_name,
            name,
            index,
            arity = C::ARITY,
            "registered firing function"
        );
        Ok(index)
    }

    /// Look up a firing function by type and name.
    pub fn get_firing_function(
        &self,
        type_name: &str,
        name: &str,
    ) -> Result<&FiringFunctionDefinition, RegistrationError> {
        self.firing
            .get(type_name, name)
            .ok_or_else(|| RegistrationError::NotFound {
                kind: "firing function",
                name: format!("{type_name}.{name}"),
            })
    }

    /// Firing function at a global index.
    pub fn firing_function(&self, index: usize) -> Option<&FiringFunctionDefinition> {
        self.firing.by_index(index)
    }

    /// Register a native delegate callable from scripts by name.
    pub fn add_external_function<F>(
        &mut self,
        name: &str,
        callback: F,
    ) -> Result<usize, RegistrationError>
    where
        F: Fn(&mut OperandStack) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        let index = self.externals.add(name, callback)?;
        debug!(name, index, "registered external function");
        Ok(index)
    }

    /// Look up an external function by name.
    pub fn get_external_function(&self, name: &str) -> Option<&ExternalFunction> {
        self.externals.get(name)
    }

    /// External function at `index`.
    pub fn external_function(&self, index: usize) -> Option<&ExternalFunction> {
        self.externals.by_index(index)
    }
}

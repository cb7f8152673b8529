//! Native delegates reachable through `ExternalFunctionCall`.
//!
//! Unlike firing functions, a delegate gets the operand stack itself and
//! pops its own arguments and pushes its own results.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use bulletscript_core::{OperandStack, RegistrationError, RuntimeError};

type ErasedExternal = dyn Fn(&mut OperandStack) -> Result<(), RuntimeError> + Send + Sync;

/// A registered native delegate.
#[derive(Clone)]
pub struct ExternalFunction {
    /// Name scripts call it by.
    pub name: String,
    /// Index baked into `ExternalFunctionCall`.
    pub index: usize,
    callback: Arc<ErasedExternal>,
}

impl ExternalFunction {
    /// Run the delegate against `stack`.
    pub fn call(&self, stack: &mut OperandStack) -> Result<(), RuntimeError> {
        (self.callback)(stack)
    }
}

impl fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalFunction")
            .field("name", &self.name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// External functions by name and index.
#[derive(Debug, Default)]
pub struct ExternalFunctionRegistry {
    functions: Vec<ExternalFunction>,
    by_name: FxHashMap<String, usize>,
}

impl ExternalFunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delegate, returning its index.
    pub fn add<F>(&mut self, name: &str, callback: F) -> Result<usize, RegistrationError>
    where
        F: Fn(&mut OperandStack) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        if self.by_name.contains_key(name) {
            return Err(RegistrationError::DuplicateRegistration {
                name: name.to_string(),
                kind: "external function",
            });
        }
        let index = self.functions.len();
        self.functions.push(ExternalFunction {
            name: name.to_string(),
            index,
            callback: Arc::new(callback),
        });
        self.by_name.insert(name.to_string(), index);
        Ok(index)
    }

    /// Look up by name.
    pub fn get(&self, name: &str) -> Option<&ExternalFunction> {
        self.by_name.get(name).map(|&i| &self.functions[i])
    }

    /// Look up by index.
    pub fn by_index(&self, index: usize) -> Option<&ExternalFunction> {
        self.functions.get(index)
    }

    /// Number of registered delegates.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

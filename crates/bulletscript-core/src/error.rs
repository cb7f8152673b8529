//! Error types for every phase of the toolchain.
//!
//! ## Error Hierarchy
//!
//! ```text
//! BulletScriptError (top-level wrapper)
//! ├── RegistrationError - type/property/firing-function/code-scope registration
//! ├── CompilationError  - symbol resolution, arity checks, control flow
//! └── RuntimeError      - faults raised while interpreting bytecode
//! ```
//!
//! Each error reports an [`ErrorCategory`] so callers (and tests) can
//! react to the class of failure without matching every variant.

use thiserror::Error;

use crate::Span;

/// Coarse classification shared by all error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Operand stack overflow or underflow.
    Stack,
    /// Wrong number of arguments for a call, fire or updater.
    Arity,
    /// A name or index that resolves to nothing.
    Lookup,
    /// An index or jump target outside its valid range.
    Range,
    /// Arithmetic faults such as division by zero.
    Arithmetic,
    /// Duplicate declarations or registrations.
    Declaration,
    /// A symbol or entity used as the wrong kind of thing.
    Type,
    /// `break`/`continue` outside a loop, or an unbalanced scope stack.
    ControlFlow,
    /// A script exhausted its per-call limits.
    Budget,
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the registries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A type with this name is already registered.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// The same Rust type was registered under a second name.
    #[error("rust type already registered as '{existing}', cannot register as '{name}'")]
    DuplicateRustType {
        /// Name used by the first registration.
        existing: String,
        /// Name of the rejected registration.
        name: String,
    },

    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A property with this name is already bound on the type.
    #[error("property '{property}' already bound on type '{type_name}'")]
    DuplicateProperty {
        /// Owning type.
        type_name: String,
        /// Property name.
        property: String,
    },

    /// The accessor's Rust type does not match the registered entity type.
    #[error("accessor for '{property}' does not match the rust type bound to '{type_name}'")]
    AccessorTypeMismatch {
        /// Owning type.
        type_name: String,
        /// Property name.
        property: String,
    },

    /// A registration with this name already exists in the named table.
    #[error("duplicate registration: {name} already registered as {kind}")]
    DuplicateRegistration {
        /// The name that was duplicated.
        name: String,
        /// Which table rejected it (e.g. "function", "firing function").
        kind: &'static str,
    },

    /// A named entry was looked up but does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Which table was searched.
        kind: &'static str,
        /// The missing name.
        name: String,
    },

    /// An index-based update referenced a slot that does not exist.
    #[error("{kind} index {index} out of range")]
    IndexOutOfRange {
        /// Which table was addressed.
        kind: &'static str,
        /// The offending index.
        index: usize,
    },
}

impl RegistrationError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistrationError::DuplicateType(_)
            | RegistrationError::DuplicateRustType { .. }
            | RegistrationError::DuplicateProperty { .. }
            | RegistrationError::DuplicateRegistration { .. } => ErrorCategory::Declaration,
            RegistrationError::TypeNotFound(_) | RegistrationError::NotFound { .. } => {
                ErrorCategory::Lookup
            }
            RegistrationError::AccessorTypeMismatch { .. } => ErrorCategory::Type,
            RegistrationError::IndexOutOfRange { .. } => ErrorCategory::Range,
        }
    }
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors that abort compilation of the enclosing declaration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A name was declared twice in the same scope.
    #[error("at {span}: variable '{name}' is already declared in this scope")]
    VariableRedeclaration {
        /// The redeclared name.
        name: String,
        /// Where the second declaration appears.
        span: Span,
    },

    /// A variable was read or written without being declared.
    #[error("at {span}: unknown variable '{name}'")]
    UnknownVariable {
        /// The variable name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// A `$property` that no registered type declares.
    #[error("at {span}: unknown property '{name}'")]
    UnknownProperty {
        /// The property name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// A call to a name that is neither a script nor an external function.
    #[error("at {span}: unknown function '{name}'")]
    UnknownFunction {
        /// The function name.
        name: String,
        /// Where it was called.
        span: Span,
    },

    /// `fire` against a type with no matching firing function.
    #[error("at {span}: no firing function '{function}' registered for type '{type_name}'")]
    UnknownFiringFunction {
        /// The fired type.
        type_name: String,
        /// The firing function name.
        function: String,
        /// Where the fire statement appears.
        span: Span,
    },

    /// `with updater U` naming an updater that does not exist.
    #[error("at {span}: unknown updater '{name}'")]
    UnknownUpdater {
        /// The updater name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// Argument count differs from the declared arity.
    #[error("at {span}: {kind} '{name}' expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        /// What was invoked ("function", "firing function", "updater").
        kind: &'static str,
        /// The invoked name.
        name: String,
        /// Declared arity.
        expected: usize,
        /// Supplied argument count.
        found: usize,
        /// Where the invocation appears.
        span: Span,
    },

    /// An entity-reference symbol used where a number is required.
    #[error("at {span}: '{name}' is an entity reference, not a numerical variable")]
    NotNumerical {
        /// The symbol name.
        name: String,
        /// Where it was used.
        span: Span,
    },

    /// Assignment to something that is not a variable or property.
    #[error("at {span}: expression is not assignable")]
    NotAssignable {
        /// Where the assignment appears.
        span: Span,
    },

    /// `break` with no enclosing loop.
    #[error("at {span}: break statement not inside a loop")]
    BreakOutsideLoop {
        /// Where the statement appears.
        span: Span,
    },

    /// `continue` with no enclosing loop.
    #[error("at {span}: continue statement not inside a loop")]
    ContinueOutsideLoop {
        /// Where the statement appears.
        span: Span,
    },

    /// Two declarations of the same kind share a name.
    #[error("at {span}: {kind} '{name}' is already declared")]
    DuplicateDeclaration {
        /// Declaration kind ("function", "action", ...).
        kind: &'static str,
        /// The duplicated name.
        name: String,
        /// Where the second declaration appears.
        span: Span,
    },

    /// Symbol lookup with no scope pushed.
    #[error("no code scope is active")]
    EmptyScopeStack,

    /// A registry operation failed while registering compiled code.
    #[error("at {span}: {source}")]
    Registration {
        /// The underlying registry error.
        source: RegistrationError,
        /// The declaration being registered.
        span: Span,
    },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::VariableRedeclaration { span, .. } => *span,
            CompilationError::UnknownVariable { span, .. } => *span,
            CompilationError::UnknownProperty { span, .. } => *span,
            CompilationError::UnknownFunction { span, .. } => *span,
            CompilationError::UnknownFiringFunction { span, .. } => *span,
            CompilationError::UnknownUpdater { span, .. } => *span,
            CompilationError::ArgumentCountMismatch { span, .. } => *span,
            CompilationError::NotNumerical { span, .. } => *span,
            CompilationError::NotAssignable { span } => *span,
            CompilationError::BreakOutsideLoop { span } => *span,
            CompilationError::ContinueOutsideLoop { span } => *span,
            CompilationError::DuplicateDeclaration { span, .. } => *span,
            CompilationError::EmptyScopeStack => Span::default(),
            CompilationError::Registration { span, .. } => *span,
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompilationError::VariableRedeclaration { .. }
            | CompilationError::DuplicateDeclaration { .. } => ErrorCategory::Declaration,
            CompilationError::UnknownVariable { .. }
            | CompilationError::UnknownProperty { .. }
            | CompilationError::UnknownFunction { .. }
            | CompilationError::UnknownFiringFunction { .. }
            | CompilationError::UnknownUpdater { .. } => ErrorCategory::Lookup,
            CompilationError::ArgumentCountMismatch { .. } => ErrorCategory::Arity,
            CompilationError::NotNumerical { .. } | CompilationError::NotAssignable { .. } => {
                ErrorCategory::Type
            }
            CompilationError::BreakOutsideLoop { .. }
            | CompilationError::ContinueOutsideLoop { .. }
            | CompilationError::EmptyScopeStack => ErrorCategory::ControlFlow,
            CompilationError::Registration { source, .. } => source.category(),
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Faults that end the current interpretation call.
///
/// None of these are retried; the host decides whether to drop the
/// script or deactivate its entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Push past the fixed operand stack capacity.
    #[error("stack overflow (capacity {capacity})")]
    StackOverflow {
        /// The configured capacity.
        capacity: usize,
    },

    /// Pop from an empty operand stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// `OpDivide` with a right operand of exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A jump landed outside `[0, code_len]`.
    #[error("jump target {target} outside code of length {code_len}")]
    JumpOutOfRange {
        /// The computed target.
        target: i64,
        /// Length of the executing block.
        code_len: usize,
    },

    /// The word at an opcode position is not an instruction.
    #[error("invalid opcode {word} at {at}")]
    InvalidOpcode {
        /// The offending word.
        word: f32,
        /// Its address.
        at: usize,
    },

    /// An instruction's operands run past the end of the block.
    #[error("instruction at {at} is missing its operands")]
    TruncatedInstruction {
        /// Address of the instruction.
        at: usize,
    },

    /// An operand that must be an index is negative or not finite.
    #[error("invalid index operand {word} at {at}")]
    InvalidOperand {
        /// The offending word.
        word: f32,
        /// Its address.
        at: usize,
    },

    /// A numerical slot outside the active frame.
    #[error("variable slot {index} out of range")]
    VariableOutOfRange {
        /// The absolute slot index.
        index: usize,
    },

    /// An entity-reference slot outside the configured capacity.
    #[error("entity reference slot {index} out of range")]
    EntityRefOutOfRange {
        /// The slot index.
        index: usize,
    },

    /// `FunctionCall` with an index that has no compiled function.
    #[error("unknown function index {0}")]
    UnknownFunction(usize),

    /// `Fire` with an index that has no firing function.
    #[error("unknown firing function index {0}")]
    UnknownFiringFunction(usize),

    /// `FireWithUpdater` with an index that has no bullet updater.
    #[error("unknown updater index {0}")]
    UnknownUpdater(usize),

    /// `ExternalFunctionCall` with an index that has no delegate.
    #[error("unknown external function index {0}")]
    UnknownExternalFunction(usize),

    /// A global property index no registered type declares.
    #[error("unknown property index {0}")]
    UnknownProperty(usize),

    /// The target entity's Rust type was never registered.
    #[error("entity type is not registered")]
    UnregisteredEntityType,

    /// The entity's type does not declare the addressed property.
    #[error("type '{type_name}' has no property '{property}'")]
    PropertyNotOnType {
        /// The entity's registered type.
        type_name: String,
        /// The property name.
        property: String,
    },

    /// Nested `FunctionCall`s exceeded the configured depth.
    #[error("call depth exceeded (limit {limit})")]
    CallDepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// More instructions than the per-call budget without suspending.
    #[error("instruction budget of {budget} exhausted without suspending")]
    InstructionBudgetExceeded {
        /// The configured budget.
        budget: u32,
    },

    /// A native delegate reported a failure.
    #[error("native function failed: {message}")]
    Native {
        /// The delegate's message.
        message: String,
    },
}

impl RuntimeError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuntimeError::StackOverflow { .. } | RuntimeError::StackUnderflow => {
                ErrorCategory::Stack
            }
            RuntimeError::DivisionByZero => ErrorCategory::Arithmetic,
            RuntimeError::JumpOutOfRange { .. }
            | RuntimeError::InvalidOpcode { .. }
            | RuntimeError::TruncatedInstruction { .. }
            | RuntimeError::InvalidOperand { .. }
            | RuntimeError::VariableOutOfRange { .. }
            | RuntimeError::EntityRefOutOfRange { .. } => ErrorCategory::Range,
            RuntimeError::UnknownFunction(_)
            | RuntimeError::UnknownFiringFunction(_)
            | RuntimeError::UnknownUpdater(_)
            | RuntimeError::UnknownExternalFunction(_)
            | RuntimeError::UnknownProperty(_)
            | RuntimeError::UnregisteredEntityType
            | RuntimeError::PropertyNotOnType { .. } => ErrorCategory::Lookup,
            RuntimeError::CallDepthExceeded { .. }
            | RuntimeError::InstructionBudgetExceeded { .. } => ErrorCategory::Budget,
            RuntimeError::Native { .. } => ErrorCategory::Type,
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all toolchain operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BulletScriptError {
    /// A registration error.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A compilation error.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// A runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl BulletScriptError {
    /// Get the category of the wrapped error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BulletScriptError::Registration(e) => e.category(),
            BulletScriptError::Compilation(e) => e.category(),
            BulletScriptError::Runtime(e) => e.category(),
        }
    }

    /// Check if this is a registration error.
    pub fn is_registration(&self) -> bool {
        matches!(self, BulletScriptError::Registration(_))
    }

    /// Check if this is a compilation error.
    pub fn is_compilation(&self) -> bool {
        matches!(self, BulletScriptError::Compilation(_))
    }

    /// Check if this is a runtime error.
    pub fn is_runtime(&self) -> bool {
        matches!(self, BulletScriptError::Runtime(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_error_display_includes_span() {
        let err = CompilationError::UnknownVariable {
            name: "speed".to_string(),
            span: Span::new(4, 9),
        };
        assert_eq!(err.to_string(), "at 4:9: unknown variable 'speed'");
        assert_eq!(err.span(), Span::new(4, 9));
    }

    #[test]
    fn categories_match_failure_class() {
        assert_eq!(
            RuntimeError::StackUnderflow.category(),
            ErrorCategory::Stack
        );
        assert_eq!(
            RuntimeError::DivisionByZero.category(),
            ErrorCategory::Arithmetic
        );
        assert_eq!(
            RuntimeError::JumpOutOfRange {
                target: 40,
                code_len: 3
            }
            .category(),
            ErrorCategory::Range
        );
        assert_eq!(
            CompilationError::ArgumentCountMismatch {
                kind: "function",
                name: "f".to_string(),
                expected: 2,
                found: 3,
                span: Span::default(),
            }
            .category(),
            ErrorCategory::Arity
        );
    }

    #[test]
    fn registration_category_flows_through_compilation() {
        let err = CompilationError::Registration {
            source: RegistrationError::DuplicateRegistration {
                name: "spin".to_string(),
                kind: "function",
            },
            span: Span::default(),
        };
        assert_eq!(err.category(), ErrorCategory::Declaration);
    }

    #[test]
    fn unified_error_conversion() {
        let err: BulletScriptError = RuntimeError::StackUnderflow.into();
        assert!(err.is_runtime());
        assert!(!err.is_compilation());
        assert_eq!(err.category(), ErrorCategory::Stack);

        let err: BulletScriptError = RegistrationError::TypeNotFound("bullet".into()).into();
        assert!(err.is_registration());
        assert_eq!(err.category(), ErrorCategory::Lookup);
    }
}

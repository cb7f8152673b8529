//! Fixed runtime bounds.

/// Capacities a script state is sized from.
/// Buffers never grow past these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmLimits {
    /// Operand stack depth.
    pub stack_capacity: usize,
    /// Numerical variable slots shared by the root frame and all call frames.
    pub variable_capacity: usize,
    /// Entity-reference slots.
    pub entity_ref_capacity: usize,
    /// Maximum nested `FunctionCall` depth.
    pub max_call_depth: usize,
    /// Instructions one interpretation call may run before faulting.
    /// `None` disables the check.
    pub instruction_budget: Option<u32>,
}

impl VmLimits {
    /// Default operand stack depth.
    pub const DEFAULT_STACK_CAPACITY: usize = 64;
    /// Default numerical slot count.
    pub const DEFAULT_VARIABLE_CAPACITY: usize = 256;
    /// Default entity-reference slot count.
    pub const DEFAULT_ENTITY_REF_CAPACITY: usize = 16;
    /// Default call depth.
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 32;
    /// Default per-call instruction budget.
    pub const DEFAULT_INSTRUCTION_BUDGET: u32 = 100_000;

    /// Set the operand stack depth.
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Set the numerical slot count.
    pub fn with_variable_capacity(mut self, capacity: usize) -> Self {
        self.variable_capacity = capacity;
        self
    }

    /// Set the maximum call depth.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Set or disable the instruction budget.
    pub fn with_instruction_budget(mut self, budget: Option<u32>) -> Self {
        self.instruction_budget = budget;
        self
    }
}

impl Default for VmLimits {
    fn default() -> Self {
        Self {
            stack_capacity: Self::DEFAULT_STACK_CAPACITY,
            variable_capacity: Self::DEFAULT_VARIABLE_CAPACITY,
            entity_ref_capacity: Self::DEFAULT_ENTITY_REF_CAPACITY,
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
            instruction_budget: Some(Self::DEFAULT_INSTRUCTION_BUDGET),
        }
    }
}

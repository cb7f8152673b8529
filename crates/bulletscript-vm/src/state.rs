//! Per-entity execution state.
//!
//! A [`ScriptState`] is everything that changes between ticks for one
//! scripted entity: instruction pointer, operand stack, variable slots,
//! entity references, the suspend countdown and the call frames of any
//! functions that were running when the script last suspended. All
//! buffers are sized from [`VmLimits`] up front and never grow.
//!
//! ## Slot layout
//!
//! ```text
//! 0                                               variable_capacity
//! | root scope ->          ...          <- frame 2 | frame 1 |
//! ```
//!
//! The root code addresses slots from 0. Each call frame is carved from
//! the top of the array downward, so a frame's slot `i` lives at
//! `locals_base + i`. The root scope's extent is the highest slot it has
//! written (or reserved) so far; a frame that would reach below it is
//! refused.

use bitflags::bitflags;

use bulletscript_core::{OperandStack, RuntimeError, VmLimits};

bitflags! {
    /// Lifecycle flags of a script state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StateFlags: u8 {
        /// Halted by `WaitFrames`; resumes once the countdown runs out.
        const SUSPENDED = 1 << 0;
        /// Non-looping code ran to its end.
        const FINISHED = 1 << 1;
    }
}

/// Outcome of one interpretation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// The code returned or reached its end.
    Ok,
    /// The code is waiting on `WaitFrames`.
    Suspended,
}

/// An active `FunctionCall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFrame {
    /// Index into the function table.
    pub function: usize,
    /// Where the caller continues after the call returns.
    pub return_ip: usize,
    /// First variable slot of this frame.
    pub locals_base: usize,
    /// Number of slots this frame owns.
    pub locals_len: usize,
    /// Operand stack depth when the frame was entered, after the
    /// arguments were popped.
    pub stack_base: usize,
}

/// Resumable execution context of one scripted entity.
#[derive(Debug, Clone)]
pub struct ScriptState {
    pub(crate) stack: OperandStack,
    pub(crate) variables: Vec<f32>,
    pub(crate) entity_refs: Vec<Option<u64>>,
    pub(crate) ip: usize,
    pub(crate) countdown: u32,
    pub(crate) frames: Vec<CallFrame>,
    pub(crate) flags: StateFlags,
    pub(crate) last_return: Option<f32>,
    pub(crate) root_len: usize,
    limits: VmLimits,
}

impl ScriptState {
    /// Create a state sized from `limits`.
    pub fn new(limits: VmLimits) -> Self {
        Self {
            stack: OperandStack::new(limits.stack_capacity),
            variables: vec![0.0; limits.variable_capacity],
            entity_refs: vec![None; limits.entity_ref_capacity],
            ip: 0,
            countdown: 0,
            frames: Vec::with_capacity(limits.max_call_depth),
            flags: StateFlags::empty(),
            last_return: None,
            root_len: 0,
            limits,
        }
    }

    /// Create a state for an updater, with its arguments in the first slots.
    pub fn for_updater(limits: VmLimits, arguments: &[f32]) -> Result<Self, RuntimeError> {
        let mut state = Self::new(limits);
        if arguments.len() > state.variables.len() {
            return Err(RuntimeError::VariableOutOfRange {
                index: arguments.len() - 1,
            });
        }
        state.variables[..arguments.len()].copy_from_slice(arguments);
        state.root_len = arguments.len();
        Ok(state)
    }

    /// Claim the first `count` slots for the root scope so call frames
    /// never overlap them.
    pub fn reserve_root_variables(&mut self, count: usize) -> Result<(), RuntimeError> {
        if count > self.variables.len() {
            return Err(RuntimeError::VariableOutOfRange { index: count - 1 });
        }
        self.root_len = self.root_len.max(count);
        Ok(())
    }

    /// Rewind to the start of the code.
    ///
    /// Clears the stack, frames, countdown and flags. Variable slots and
    /// entity references keep their values.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.frames.clear();
        self.ip = 0;
        self.countdown = 0;
        self.flags = StateFlags::empty();
        self.last_return = None;
    }

    /// Absolute slot for `index` in the innermost frame.
    pub(crate) fn slot(&self, index: usize) -> Result<usize, RuntimeError> {
        let (base, len) = match self.frames.last() {
            Some(frame) => (frame.locals_base, frame.locals_len),
            None => (0, self.variables.len()),
        };
        if index < len {
            Ok(base + index)
        } else {
            Err(RuntimeError::VariableOutOfRange { index })
        }
    }

    /// Read a slot of the innermost frame.
    pub fn variable(&self, index: usize) -> Result<f32, RuntimeError> {
        self.slot(index).map(|slot| self.variables[slot])
    }

    /// Write a slot of the innermost frame.
    pub fn set_variable(&mut self, index: usize, value: f32) -> Result<(), RuntimeError> {
        let slot = self.slot(index)?;
        if self.frames.is_empty() {
            self.root_len = self.root_len.max(index + 1);
        }
        self.variables[slot] = value;
        Ok(())
    }

    /// Entity handle stored in reference slot `index`.
    pub fn entity_ref(&self, index: usize) -> Result<Option<u64>, RuntimeError> {
        self.entity_refs
            .get(index)
            .copied()
            .ok_or(RuntimeError::EntityRefOutOfRange { index })
    }

    /// Store an entity handle in reference slot `index`.
    pub fn set_entity_ref(
        &mut self,
        index: usize,
        handle: Option<u64>,
    ) -> Result<(), RuntimeError> {
        let slot = self
            .entity_refs
            .get_mut(index)
            .ok_or(RuntimeError::EntityRefOutOfRange { index })?;
        *slot = handle;
        Ok(())
    }

    /// The operand stack.
    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// The operand stack, mutably.
    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    /// Instruction pointer into the innermost running block.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Active call frames, outermost first.
    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    /// Current flags.
    pub fn flags(&self) -> StateFlags {
        self.flags
    }

    /// Whether a `WaitFrames` is pending.
    pub fn is_suspended(&self) -> bool {
        self.flags.contains(StateFlags::SUSPENDED)
    }

    /// Whether non-looping code has completed.
    pub fn is_finished(&self) -> bool {
        self.flags.contains(StateFlags::FINISHED)
    }

    /// Ticks left before a suspended script resumes.
    pub fn suspend_countdown(&self) -> u32 {
        self.countdown
    }

    /// Value of the last root-level `Return`.
    pub fn last_return(&self) -> Option<f32> {
        self.last_return
    }

    /// Number of slots owned by the root scope.
    pub fn root_variable_count(&self) -> usize {
        self.root_len
    }

    /// The limits this state was sized from.
    pub fn limits(&self) -> &VmLimits {
        &self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sized_from_limits() {
        let limits = VmLimits::default().with_variable_capacity(8);
        let state = ScriptState::new(limits);

        assert_eq!(state.stack().capacity(), limits.stack_capacity);
        assert_eq!(state.variable(7), Ok(0.0));
        assert_eq!(
            state.variable(8),
            Err(RuntimeError::VariableOutOfRange { index: 8 })
        );
        assert_eq!(state.entity_ref(limits.entity_ref_capacity - 1), Ok(None));
    }

    #[test]
    fn updater_arguments_seed_slots() {
        let state = ScriptState::for_updater(VmLimits::default(), &[0.5, 2.0]).unwrap();
        assert_eq!(state.variable(0), Ok(0.5));
        assert_eq!(state.variable(1), Ok(2.0));

        assert_eq!(state.root_variable_count(), 2);

        let tiny = VmLimits::default().with_variable_capacity(1);
        assert!(ScriptState::for_updater(tiny, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn root_extent_follows_writes_and_reservations() {
        let mut state = ScriptState::new(VmLimits::default().with_variable_capacity(8));
        assert_eq!(state.root_variable_count(), 0);

        state.set_variable(3, 1.0).unwrap();
        assert_eq!(state.root_variable_count(), 4);
        state.set_variable(1, 1.0).unwrap();
        assert_eq!(state.root_variable_count(), 4);

        state.reserve_root_variables(6).unwrap();
        assert_eq!(state.root_variable_count(), 6);
        assert_eq!(
            state.reserve_root_variables(9),
            Err(RuntimeError::VariableOutOfRange { index: 8 })
        );

        state.reset();
        assert_eq!(state.root_variable_count(), 6);
    }

    #[test]
    fn frame_slots_are_relative() {
        let mut state = ScriptState::new(VmLimits::default().with_variable_capacity(10));
        state.frames.push(CallFrame {
            function: 0,
            return_ip: 0,
            locals_base: 8,
            locals_len: 2,
            stack_base: 0,
        });

        state.set_variable(1, 4.0).unwrap();
        assert_eq!(state.variables[9], 4.0);
        assert_eq!(state.root_variable_count(), 0);
        assert_eq!(
            state.set_variable(2, 1.0),
            Err(RuntimeError::VariableOutOfRange { index: 2 })
        );
    }

    #[test]
    fn entity_refs_bounded() {
        let mut state = ScriptState::new(VmLimits::default());
        state.set_entity_ref(0, Some(42)).unwrap();
        assert_eq!(state.entity_ref(0), Ok(Some(42)));
        assert!(matches!(
            state.set_entity_ref(99, None),
            Err(RuntimeError::EntityRefOutOfRange { index: 99 })
        ));
    }

    #[test]
    fn reset_keeps_variables() {
        let mut state = ScriptState::new(VmLimits::default());
        state.set_variable(0, 3.0).unwrap();
        state.stack.push(1.0).unwrap();
        state.ip = 12;
        state.countdown = 4;
        state.flags = StateFlags::SUSPENDED | StateFlags::FINISHED;

        state.reset();

        assert_eq!(state.ip(), 0);
        assert!(state.stack().is_empty());
        assert_eq!(state.flags(), StateFlags::empty());
        assert_eq!(state.suspend_countdown(), 0);
        assert_eq!(state.variable(0), Ok(3.0));
    }
}

//! The bytecode interpreter.
//!
//! [`VirtualMachine::interpret_code`] runs one tick of a script: it
//! executes instructions until the code returns, runs off its end, or
//! suspends on `WaitFrames`. Everything needed to resume lives in the
//! [`ScriptState`], so the VM itself holds nothing but a registry borrow
//! and may be shared by every entity.
//!
//! Jump operands are absolute addresses into the running block (which is
//! the root code, or the innermost frame's function body). Offset jumps
//! are relative to the word after their operand.

use std::any::Any;

use tracing::{trace, warn};

use bulletscript_core::{CodeBlock, Op, RuntimeError};
use bulletscript_registry::{AttachedUpdater, FireContext, ScopeKind, ScriptRegistry};

use crate::state::{CallFrame, ScriptState, ScriptStatus, StateFlags};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Interprets compiled code against a registry.
#[derive(Debug, Clone, Copy)]
pub struct VirtualMachine<'reg> {
    registry: &'reg ScriptRegistry,
}

impl<'reg> VirtualMachine<'reg> {
    /// Create a VM dispatching through `registry`.
    pub fn new(registry: &'reg ScriptRegistry) -> Self {
        Self { registry }
    }

    /// The registry.
    pub fn registry(&self) -> &'reg ScriptRegistry {
        self.registry
    }

    /// Run `code` for one tick.
    ///
    /// `entity` is the object `GetProperty`/`SetProperty` act on; its
    /// concrete type must be registered. With `is_looping` the code starts
    /// over from the top on the next call after reaching its end; without
    /// it the state is marked finished and later calls do nothing until
    /// [`ScriptState::reset`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn interpret_code(
        &self,
        code: &CodeBlock,
        state: &mut ScriptState,
        entity: &mut dyn Any,
        is_looping: bool,
    ) -> Result<ScriptStatus> {
        if state.flags.contains(StateFlags::FINISHED) {
            return Ok(ScriptStatus::Ok);
        }

        if state.flags.contains(StateFlags::SUSPENDED) {
            state.countdown = state.countdown.saturating_sub(1);
            if state.countdown > 0 {
                trace!(remaining = state.countdown, "still waiting");
                return Ok(ScriptStatus::Suspended);
            }
            state.flags.remove(StateFlags::SUSPENDED);
        }

        let result = self.run(code, state, entity, is_looping);
        if let Err(err) = &result {
            warn!(%err, ip = state.ip, depth = state.frames.len(), "script fault");
        }
        result
    }

    /// Run a registered scope's code for one tick.
    pub fn interpret_scope(
        &self,
        kind: ScopeKind,
        index: usize,
        state: &mut ScriptState,
        entity: &mut dyn Any,
        is_looping: bool,
    ) -> Result<ScriptStatus> {
        let scope = self
            .registry
            .code_scopes(kind)
            .by_index(index)
            .ok_or(match kind {
                ScopeKind::Function => RuntimeError::UnknownFunction(index),
                _ => RuntimeError::UnknownUpdater(index),
            })?;
        state.reserve_root_variables(scope.variable_count())?;
        self.interpret_code(&scope.code, state, entity, is_looping)
    }

    fn run(
        &self,
        root: &CodeBlock,
        state: &mut ScriptState,
        entity: &mut dyn Any,
        is_looping: bool,
    ) -> Result<ScriptStatus> {
        let mut executed: u32 = 0;

        loop {
            let code = match state.frames.last() {
                Some(frame) => self.function_code(frame.function)?,
                None => root.words(),
            };

            if state.ip >= code.len() {
                if state.frames.is_empty() {
                    self.finish_root(state, is_looping);
                    return Ok(ScriptStatus::Ok);
                }
                // Falling off a function body returns 0.
                self.return_from_call(state, 0.0)?;
                continue;
            }

            if let Some(budget) = state.limits().instruction_budget {
                if executed >= budget {
                    return Err(RuntimeError::InstructionBudgetExceeded { budget });
                }
            }
            executed += 1;

            let (op, next) = Op::decode(code, state.ip)?;
            trace!(ip = state.ip, ?op, stack = state.stack.len(), "execute");
            state.ip = next;

            match op {
                Op::Push(value) => state.stack.push(value)?,
                Op::Pop => {
                    state.stack.pop()?;
                }
                Op::Negate => {
                    let value = state.stack.peek()?;
                    state.stack.replace_top(-value)?;
                }
                Op::Not => {
                    let value = state.stack.peek()?;
                    state
                        .stack
                        .replace_top(if value == 0.0 { 1.0 } else { 0.0 })?;
                }
                Op::Binary(operator) => {
                    let right = state.stack.pop()?;
                    let left = state.stack.pop()?;
                    state.stack.push(operator.apply(left, right)?)?;
                }
                Op::Jump(target) => state.ip = absolute_target(target, code.len())?,
                Op::IfZeroBranch(target) => {
                    if state.stack.pop()? == 0.0 {
                        state.ip = absolute_target(target, code.len())?;
                    }
                }
                Op::JumpOffset(offset) => {
                    state.ip = relative_target(state.ip, offset, code.len())?;
                }
                Op::IfZeroBranchOffset(offset) => {
                    if state.stack.pop()? == 0.0 {
                        state.ip = relative_target(state.ip, offset, code.len())?;
                    }
                }
                Op::GetVariable(index) => {
                    let value = state.variable(index)?;
                    state.stack.push(value)?;
                }
                Op::SetVariable(index) => {
                    let value = state.stack.peek()?;
                    state.set_variable(index, value)?;
                }
                Op::GetProperty(index) => {
                    let value = self.registry.types().get_property(&*entity, index)?;
                    state.stack.push(value)?;
                }
                Op::SetProperty(index) => {
                    let value = state.stack.peek()?;
                    self.registry.types().set_property(entity, index, value)?;
                }
                Op::FunctionCall(index) => self.call(state, index)?,
                Op::ExternalFunctionCall(index) => {
                    let function = self
                        .registry
                        .external_function(index)
                        .ok_or(RuntimeError::UnknownExternalFunction(index))?;
                    function.call(&mut state.stack)?;
                }
                Op::Fire(index) => {
                    let function = self
                        .registry
                        .firing_function(index)
                        .ok_or(RuntimeError::UnknownFiringFunction(index))?;
                    let args = state.stack.pop_n(function.arity)?;
                    trace!(function = %function.name, ?args, "fire");
                    function.call(&FireContext::default(), &args);
                }
                Op::FireWithUpdater { firing, updater } => {
                    let function = self
                        .registry
                        .firing_function(firing)
                        .ok_or(RuntimeError::UnknownFiringFunction(firing))?;
                    let scope = self
                        .registry
                        .bullet_updater_code_scope(updater)
                        .ok_or(RuntimeError::UnknownUpdater(updater))?;
                    let arguments = state.stack.pop_n(scope.parameter_count())?;
                    let args = state.stack.pop_n(function.arity)?;
                    trace!(function = %function.name, updater, ?args, "fire with updater");
                    let context = FireContext {
                        updater: Some(AttachedUpdater {
                            index: updater,
                            arguments,
                        }),
                    };
                    function.call(&context, &args);
                }
                Op::WaitFrames => {
                    let frames = state.stack.pop()?;
                    // Saturating cast: NaN and negatives become 0.
                    state.countdown = frames.max(0.0) as u32;
                    state.flags.insert(StateFlags::SUSPENDED);
                    trace!(frames = state.countdown, ip = state.ip, "suspend");
                    return Ok(ScriptStatus::Suspended);
                }
                Op::Return => {
                    let value = state.stack.pop()?;
                    if state.frames.is_empty() {
                        state.last_return = Some(value);
                        state.stack.clear();
                        self.finish_root(state, is_looping);
                        return Ok(ScriptStatus::Ok);
                    }
                    self.return_from_call(state, value)?;
                }
            }
        }
    }

    fn function_code(&self, index: usize) -> Result<&'reg [f32]> {
        self.registry
            .function_code_scope(index)
            .map(|scope| scope.code.words())
            .ok_or(RuntimeError::UnknownFunction(index))
    }

    /// Enter function `index`, binding its arguments to the new frame's
    /// first slots.
    fn call(&self, state: &mut ScriptState, index: usize) -> Result<()> {
        let callee = self
            .registry
            .function_code_scope(index)
            .ok_or(RuntimeError::UnknownFunction(index))?;

        let limit = state.limits().max_call_depth;
        if state.frames.len() >= limit {
            return Err(RuntimeError::CallDepthExceeded { limit });
        }

        let locals_len = callee.variable_count();
        let top = state
            .frames
            .last()
            .map_or(state.variables.len(), |frame| frame.locals_base);
        // Frames grow down toward the root scope and may not overlap it.
        let locals_base = top
            .checked_sub(locals_len)
            .filter(|base| *base >= state.root_len)
            .ok_or(RuntimeError::VariableOutOfRange { index: locals_len })?;

        let args = state.stack.pop_n(callee.parameter_count())?;
        let locals = &mut state.variables[locals_base..top];
        locals.fill(0.0);
        locals[..args.len()].copy_from_slice(&args);

        state.frames.push(CallFrame {
            function: index,
            return_ip: state.ip,
            locals_base,
            locals_len,
            stack_base: state.stack.len(),
        });
        state.ip = 0;
        Ok(())
    }

    /// Leave the innermost frame, handing `value` to the caller.
    fn return_from_call(&self, state: &mut ScriptState, value: f32) -> Result<()> {
        let frame = state.frames.pop().ok_or(RuntimeError::StackUnderflow)?;
        state.stack.truncate(frame.stack_base);
        state.ip = frame.return_ip;
        state.stack.push(value)
    }

    /// The root block is done for this run. The stack is left as is.
    fn finish_root(&self, state: &mut ScriptState, is_looping: bool) {
        state.ip = 0;
        if !is_looping {
            state.flags.insert(StateFlags::FINISHED);
        }
    }
}

fn absolute_target(target: usize, code_len: usize) -> Result<usize> {
    if target <= code_len {
        Ok(target)
    } else {
        Err(RuntimeError::JumpOutOfRange {
            target: target as i64,
            code_len,
        })
    }
}

fn relative_target(ip: usize, offset: i64, code_len: usize) -> Result<usize> {
    let target = ip as i64 + offset;
    if (0..=code_len as i64).contains(&target) {
        Ok(target as usize)
    } else {
        Err(RuntimeError::JumpOutOfRange { target, code_len })
    }
}

//! Break/continue fix-up lists.
//!
//! A loop statement owns one [`LoopFixups`] while its body compiles. Nested
//! `break`/`continue` statements emit a `Jump` with a placeholder operand
//! and record the operand's address here; the loop drains the lists once
//! its exit address is known.

use bulletscript_core::CodeBlock;

/// Pending jump operands for the innermost enclosing loop.
#[derive(Debug, Default)]
pub struct LoopFixups {
    breaks: Vec<usize>,
    continues: Vec<usize>,
}

impl LoopFixups {
    /// Create empty lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `break` jump operand.
    pub fn add_break(&mut self, operand: usize) {
        self.breaks.push(operand);
    }

    /// Record a `continue` jump operand.
    pub fn add_continue(&mut self, operand: usize) {
        self.continues.push(operand);
    }

    /// Number of pending jumps.
    pub fn pending(&self) -> usize {
        self.breaks.len() + self.continues.len()
    }

    /// Patch every pending operand in `code`: breaks to `exit`, continues
    /// to `continue_target`.
    pub fn patch(self, code: &mut CodeBlock, exit: usize, continue_target: usize) {
        for operand in self.breaks {
            code.patch(operand, exit as f32);
        }
        for operand in self.continues {
            code.patch(operand, continue_target as f32);
        }
    }
}

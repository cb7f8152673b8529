//! Flat word container for compiled code.
//!
//! A `CodeBlock` is both a finished program and the scratch buffer the
//! compiler builds fragments in. Opcodes and operands are stored as the
//! same `f32` word type and are told apart only by position.

use std::fmt::Write as _;

use super::{Instruction, Op};

/// An append-only, randomly indexable sequence of code words.
///
/// Jump targets written into a block are absolute indices into that same
/// block, so its length is the address space for its own jumps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlock {
    code: Vec<f32>,
}

impl CodeBlock {
    /// Create a new empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: Vec::with_capacity(capacity),
        }
    }

    /// Append an opcode.
    pub fn write_instruction(&mut self, instruction: Instruction) {
        self.code.push(instruction.word());
    }

    /// Append a raw operand word.
    pub fn write_word(&mut self, word: f32) {
        self.code.push(word);
    }

    /// Append an opcode followed by an index operand.
    pub fn write_indexed(&mut self, instruction: Instruction, index: usize) {
        self.write_instruction(instruction);
        self.write_word(index as f32);
    }

    /// Append every word of `other`.
    ///
    /// Absolute jump targets inside `other` are not rebased, so only
    /// position-independent fragments (expressions, ternaries) may be
    /// composed this way.
    pub fn append(&mut self, other: &CodeBlock) {
        self.code.extend_from_slice(&other.code);
    }

    /// Emit a jump-style instruction with a placeholder operand and return
    /// the operand's address for later patching.
    pub fn emit_jump(&mut self, instruction: Instruction) -> usize {
        self.write_instruction(instruction);
        let operand = self.code.len();
        self.write_word(0.0);
        operand
    }

    /// Overwrite the word at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not inside the block. Patch addresses only ever
    /// come from [`emit_jump`](Self::emit_jump) on this block.
    pub fn patch(&mut self, at: usize, word: f32) {
        assert!(
            at < self.code.len(),
            "patch address {} outside block of length {}",
            at,
            self.code.len()
        );
        self.code[at] = word;
    }

    /// Patch the operand at `at` to the current end of the block.
    pub fn patch_to_here(&mut self, at: usize) {
        let here = self.code.len() as f32;
        self.patch(at, here);
    }

    /// Current length, which is also the address of the next word.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Read the word at `at`.
    pub fn word(&self, at: usize) -> Option<f32> {
        self.code.get(at).copied()
    }

    /// The raw words.
    pub fn words(&self) -> &[f32] {
        &self.code
    }

    /// Decode the instruction at `at`.
    pub fn read_op(&self, at: usize) -> Option<(Op, usize)> {
        Op::decode(&self.code, at).ok()
    }

    /// Extract all opcodes, skipping operands.
    ///
    /// Words that do not decode as an opcode are skipped one at a time.
    pub fn opcodes(&self) -> Vec<Instruction> {
        let mut ops = Vec::new();
        let mut at = 0;

        while at < self.code.len() {
            match Instruction::from_word(self.code[at]) {
                Some(instruction) => {
                    ops.push(instruction);
                    at += 1 + instruction.operand_count();
                }
                None => at += 1,
            }
        }

        ops
    }

    /// Render one instruction per line, e.g. `0004  IF_ZERO_BRANCH 9`.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let mut at = 0;

        while at < self.code.len() {
            let word = self.code[at];
            let Some(instruction) = Instruction::from_word(word) else {
                let _ = writeln!(out, "{at:04}  <invalid {word}>");
                at += 1;
                continue;
            };
            let _ = write!(out, "{at:04}  {}", instruction.name());
            let end = (at + 1 + instruction.operand_count()).min(self.code.len());
            for operand in &self.code[at + 1..end] {
                let _ = write!(out, " {operand}");
            }
            out.push('\n');
            at = end;
        }

        out
    }

    /// Check that the block holds exactly `expected`, opcodes and operands.
    #[track_caller]
    pub fn assert_words(&self, expected: &[f32]) {
        assert_eq!(
            self.code.as_slice(),
            expected,
            "Bytecode mismatch.\nActual disassembly:\n{}",
            self.disassemble()
        );
    }

    /// Check that the block contains exactly the given opcode sequence,
    /// ignoring operand values.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[Instruction]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }
}

impl From<Vec<f32>> for CodeBlock {
    fn from(code: Vec<f32>) -> Self {
        Self { code }
    }
}

impl Extend<f32> for CodeBlock {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, iter: I) {
        self.code.extend(iter);
    }
}

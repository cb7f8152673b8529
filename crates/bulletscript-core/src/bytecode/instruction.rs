//! The instruction set.
//!
//! Opcodes and operands share one word type (`f32`). [`Instruction`] is the
//! numeric opcode written into a [`CodeBlock`](super::CodeBlock);
//! [`Op`] is the decoded form the interpreter matches on, with its operands
//! already read and validated.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::RuntimeError;

/// VM operation codes.
///
/// The VM is a stack machine. Binary operators pop the right operand, then
/// the left, and push the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Instruction {
    // =========================================================================
    // Stack Operations
    // =========================================================================
    /// Push the literal in the next word.
    Push = 0,
    /// Discard the top of stack.
    Pop,

    // =========================================================================
    // Unary
    // =========================================================================
    /// Arithmetic negation of the top of stack.
    Negate,
    /// `1` if the top of stack is exactly zero, else `0`.
    OpNot,

    // =========================================================================
    // Binary
    // =========================================================================
    /// `left + right`.
    OpAdd,
    /// `left - right`.
    OpSubtract,
    /// `left * right`.
    OpMultiply,
    /// `left / right`; a zero divisor is fatal.
    OpDivide,
    /// `left % right`.
    OpMod,
    /// `left < right` as `1.0`/`0.0`.
    OpLessThan,
    /// `left <= right` as `1.0`/`0.0`.
    OpLessThanEqual,
    /// `left > right` as `1.0`/`0.0`.
    OpGreaterThan,
    /// `left >= right` as `1.0`/`0.0`.
    OpGreaterThanEqual,
    /// `left == right` as `1.0`/`0.0`.
    OpEqual,
    /// `left != right` as `1.0`/`0.0`.
    OpNotEqual,
    /// Both operands strictly greater than zero.
    OpAnd,
    /// Either operand strictly greater than zero.
    OpOr,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// Jump to the absolute address in the next word.
    Jump,
    /// Pop; jump to the absolute address in the next word if the value was zero.
    IfZeroBranch,
    /// Add the next word to the instruction pointer (after the operand).
    JumpOffset,
    /// Pop; add the next word to the instruction pointer if the value was zero.
    IfZeroBranchOffset,

    // =========================================================================
    // Variables and Properties
    // =========================================================================
    /// Push numerical variable `idx`.
    GetVariable,
    /// Store the top of stack into variable `idx` without popping.
    SetVariable,
    /// Push the target entity's property at global index `idx`.
    GetProperty,
    /// Store the top of stack into the property at global index `idx` without popping.
    SetProperty,

    // =========================================================================
    // Calls and Side Effects
    // =========================================================================
    /// Call compiled function `idx`.
    FunctionCall,
    /// Invoke native delegate `idx` with the operand stack.
    ExternalFunctionCall,
    /// Invoke firing function `idx`.
    Fire,
    /// Invoke firing function `idx`, attaching bullet updater `updaterIdx`.
    FireWithUpdater,
    /// Pop a frame count and suspend.
    WaitFrames,
    /// Pop the result and end this invocation.
    Return,
}

impl Instruction {
    /// The word written into a code block for this opcode.
    #[inline]
    pub fn word(self) -> f32 {
        u8::from(self) as f32
    }

    /// Decode an opcode word. Fractional, negative or unknown words are rejected.
    pub fn from_word(word: f32) -> Option<Self> {
        if !(0.0..=u8::MAX as f32).contains(&word) || word.fract() != 0.0 {
            return None;
        }
        Self::try_from(word as u8).ok()
    }

    /// Number of operand words following the opcode.
    pub fn operand_count(&self) -> usize {
        match self {
            Instruction::Push
            | Instruction::Jump
            | Instruction::IfZeroBranch
            | Instruction::JumpOffset
            | Instruction::IfZeroBranchOffset
            | Instruction::GetVariable
            | Instruction::SetVariable
            | Instruction::GetProperty
            | Instruction::SetProperty
            | Instruction::FunctionCall
            | Instruction::ExternalFunctionCall
            | Instruction::Fire => 1,

            Instruction::FireWithUpdater => 2,

            Instruction::Pop
            | Instruction::Negate
            | Instruction::OpNot
            | Instruction::OpAdd
            | Instruction::OpSubtract
            | Instruction::OpMultiply
            | Instruction::OpDivide
            | Instruction::OpMod
            | Instruction::OpLessThan
            | Instruction::OpLessThanEqual
            | Instruction::OpGreaterThan
            | Instruction::OpGreaterThanEqual
            | Instruction::OpEqual
            | Instruction::OpNotEqual
            | Instruction::OpAnd
            | Instruction::OpOr
            | Instruction::WaitFrames
            | Instruction::Return => 0,
        }
    }

    /// Get the name of this opcode for disassembly.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Push => "PUSH",
            Instruction::Pop => "POP",
            Instruction::Negate => "NEGATE",
            Instruction::OpNot => "NOT",
            Instruction::OpAdd => "ADD",
            Instruction::OpSubtract => "SUB",
            Instruction::OpMultiply => "MUL",
            Instruction::OpDivide => "DIV",
            Instruction::OpMod => "MOD",
            Instruction::OpLessThan => "LT",
            Instruction::OpLessThanEqual => "LE",
            Instruction::OpGreaterThan => "GT",
            Instruction::OpGreaterThanEqual => "GE",
            Instruction::OpEqual => "EQ",
            Instruction::OpNotEqual => "NE",
            Instruction::OpAnd => "AND",
            Instruction::OpOr => "OR",
            Instruction::Jump => "JUMP",
            Instruction::IfZeroBranch => "IF_ZERO_BRANCH",
            Instruction::JumpOffset => "JUMP_OFFSET",
            Instruction::IfZeroBranchOffset => "IF_ZERO_BRANCH_OFFSET",
            Instruction::GetVariable => "GET_VARIABLE",
            Instruction::SetVariable => "SET_VARIABLE",
            Instruction::GetProperty => "GET_PROPERTY",
            Instruction::SetProperty => "SET_PROPERTY",
            Instruction::FunctionCall => "CALL",
            Instruction::ExternalFunctionCall => "CALL_EXTERNAL",
            Instruction::Fire => "FIRE",
            Instruction::FireWithUpdater => "FIRE_WITH_UPDATER",
            Instruction::WaitFrames => "WAIT_FRAMES",
            Instruction::Return => "RETURN",
        }
    }
}

/// Binary operators sharing the pop-right, pop-left, push-result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinaryOperator {
    /// The opcode implementing this operator.
    pub fn instruction(self) -> Instruction {
        match self {
            BinaryOperator::Add => Instruction::OpAdd,
            BinaryOperator::Subtract => Instruction::OpSubtract,
            BinaryOperator::Multiply => Instruction::OpMultiply,
            BinaryOperator::Divide => Instruction::OpDivide,
            BinaryOperator::Mod => Instruction::OpMod,
            BinaryOperator::LessThan => Instruction::OpLessThan,
            BinaryOperator::LessThanEqual => Instruction::OpLessThanEqual,
            BinaryOperator::GreaterThan => Instruction::OpGreaterThan,
            BinaryOperator::GreaterThanEqual => Instruction::OpGreaterThanEqual,
            BinaryOperator::Equal => Instruction::OpEqual,
            BinaryOperator::NotEqual => Instruction::OpNotEqual,
            BinaryOperator::And => Instruction::OpAnd,
            BinaryOperator::Or => Instruction::OpOr,
        }
    }

    /// Evaluate `left OP right`.
    ///
    /// `And`/`Or` treat a value as true when it is strictly greater than
    /// zero, unlike `OpNot` which tests for exactly zero.
    pub fn apply(self, left: f32, right: f32) -> Result<f32, RuntimeError> {
        let truth = |b: bool| if b { 1.0 } else { 0.0 };
        Ok(match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => {
                if right == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                left / right
            }
            BinaryOperator::Mod => left % right,
            BinaryOperator::LessThan => truth(left < right),
            BinaryOperator::LessThanEqual => truth(left <= right),
            BinaryOperator::GreaterThan => truth(left > right),
            BinaryOperator::GreaterThanEqual => truth(left >= right),
            BinaryOperator::Equal => truth(left == right),
            BinaryOperator::NotEqual => truth(left != right),
            BinaryOperator::And => truth(left > 0.0 && right > 0.0),
            BinaryOperator::Or => truth(left > 0.0 || right > 0.0),
        })
    }
}

/// A decoded instruction with validated operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Push(f32),
    Pop,
    Negate,
    Not,
    Binary(BinaryOperator),
    Jump(usize),
    IfZeroBranch(usize),
    JumpOffset(i64),
    IfZeroBranchOffset(i64),
    GetVariable(usize),
    SetVariable(usize),
    GetProperty(usize),
    SetProperty(usize),
    FunctionCall(usize),
    ExternalFunctionCall(usize),
    Fire(usize),
    FireWithUpdater { firing: usize, updater: usize },
    WaitFrames,
    Return,
}

impl Op {
    /// Decode the instruction at `at`, returning it with the address of the
    /// next instruction.
    pub fn decode(code: &[f32], at: usize) -> Result<(Op, usize), RuntimeError> {
        let word = *code
            .get(at)
            .ok_or(RuntimeError::TruncatedInstruction { at })?;
        let instruction =
            Instruction::from_word(word).ok_or(RuntimeError::InvalidOpcode { word, at })?;

        let next = at + 1 + instruction.operand_count();
        if next > code.len() {
            return Err(RuntimeError::TruncatedInstruction { at });
        }
        let raw = |n: usize| code[at + 1 + n];
        let index = |n: usize| operand_index(code[at + 1 + n], at + 1 + n);

        let op = match instruction {
            Instruction::Push => Op::Push(raw(0)),
            Instruction::Pop => Op::Pop,
            Instruction::Negate => Op::Negate,
            Instruction::OpNot => Op::Not,
            Instruction::OpAdd => Op::Binary(BinaryOperator::Add),
            Instruction::OpSubtract => Op::Binary(BinaryOperator::Subtract),
            Instruction::OpMultiply => Op::Binary(BinaryOperator::Multiply),
            Instruction::OpDivide => Op::Binary(BinaryOperator::Divide),
            Instruction::OpMod => Op::Binary(BinaryOperator::Mod),
            Instruction::OpLessThan => Op::Binary(BinaryOperator::LessThan),
            Instruction::OpLessThanEqual => Op::Binary(BinaryOperator::LessThanEqual),
            Instruction::OpGreaterThan => Op::Binary(BinaryOperator::GreaterThan),
            Instruction::OpGreaterThanEqual => Op::Binary(BinaryOperator::GreaterThanEqual),
            Instruction::OpEqual => Op::Binary(BinaryOperator::Equal),
            Instruction::OpNotEqual => Op::Binary(BinaryOperator::NotEqual),
            Instruction::OpAnd => Op::Binary(BinaryOperator::And),
            Instruction::OpOr => Op::Binary(BinaryOperator::Or),
            Instruction::Jump => Op::Jump(index(0)?),
            Instruction::IfZeroBranch => Op::IfZeroBranch(index(0)?),
            Instruction::JumpOffset => Op::JumpOffset(raw(0) as i64),
            Instruction::IfZeroBranchOffset => Op::IfZeroBranchOffset(raw(0) as i64),
            Instruction::GetVariable => Op::GetVariable(index(0)?),
            Instruction::SetVariable => Op::SetVariable(index(0)?),
            Instruction::GetProperty => Op::GetProperty(index(0)?),
            Instruction::SetProperty => Op::SetProperty(index(0)?),
            Instruction::FunctionCall => Op::FunctionCall(index(0)?),
            Instruction::ExternalFunctionCall => Op::ExternalFunctionCall(index(0)?),
            Instruction::Fire => Op::Fire(index(0)?),
            Instruction::FireWithUpdater => Op::FireWithUpdater {
                firing: index(0)?,
                updater: index(1)?,
            },
            Instruction::WaitFrames => Op::WaitFrames,
            Instruction::Return => Op::Return,
        };

        Ok((op, next))
    }
}

/// Truncate an index operand, rejecting negative and non-finite words.
fn operand_index(word: f32, at: usize) -> Result<usize, RuntimeError> {
    if word.is_finite() && word >= 0.0 {
        Ok(word as usize)
    } else {
        Err(RuntimeError::InvalidOperand { word, at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_repr() {
        assert_eq!(Instruction::Push.word(), 0.0);
        assert_eq!(Instruction::Pop.word(), 1.0);
    }

    #[test]
    fn instruction_from_word() {
        assert_eq!(Instruction::from_word(0.0), Some(Instruction::Push));
        assert_eq!(
            Instruction::from_word(Instruction::Return.word()),
            Some(Instruction::Return)
        );
        assert_eq!(
            Instruction::from_word(Instruction::Return.word() + 1.0),
            None
        );
        assert_eq!(Instruction::from_word(1.5), None);
        assert_eq!(Instruction::from_word(-1.0), None);
        assert_eq!(Instruction::from_word(f32::NAN), None);
    }

    #[test]
    fn operand_counts() {
        assert_eq!(Instruction::Pop.operand_count(), 0);
        assert_eq!(Instruction::Push.operand_count(), 1);
        assert_eq!(Instruction::IfZeroBranchOffset.operand_count(), 1);
        assert_eq!(Instruction::FireWithUpdater.operand_count(), 2);
        assert_eq!(Instruction::WaitFrames.operand_count(), 0);
    }

    #[test]
    fn and_or_use_strictly_positive_truth() {
        assert_eq!(BinaryOperator::And.apply(1.0, 0.5), Ok(1.0));
        assert_eq!(BinaryOperator::And.apply(1.0, -1.0), Ok(0.0));
        assert_eq!(BinaryOperator::Or.apply(-2.0, 0.0), Ok(0.0));
        assert_eq!(BinaryOperator::Or.apply(-2.0, 0.1), Ok(1.0));
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        use BinaryOperator::*;

        // (operator, 1 op 2, 2 op 2, 2 op 1)
        let table = [
            (LessThan, 1.0, 0.0, 0.0),
            (LessThanEqual, 1.0, 1.0, 0.0),
            (GreaterThan, 0.0, 0.0, 1.0),
            (GreaterThanEqual, 0.0, 1.0, 1.0),
            (Equal, 0.0, 1.0, 0.0),
            (NotEqual, 1.0, 0.0, 1.0),
        ];
        for (operator, below, equal, above) in table {
            assert_eq!(operator.apply(1.0, 2.0), Ok(below), "{operator:?} below");
            assert_eq!(operator.apply(2.0, 2.0), Ok(equal), "{operator:?} equal");
            assert_eq!(operator.apply(2.0, 1.0), Ok(above), "{operator:?} above");
        }
    }

    #[test]
    fn divide_by_zero_is_fatal() {
        assert_eq!(
            BinaryOperator::Divide.apply(3.5, 0.0),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(BinaryOperator::Divide.apply(3.0, 2.0), Ok(1.5));
    }

    #[test]
    fn decode_reads_operands() {
        let code = [
            Instruction::FireWithUpdater.word(),
            2.0,
            7.0,
            Instruction::Return.word(),
        ];
        let (op, next) = Op::decode(&code, 0).unwrap();
        assert_eq!(
            op,
            Op::FireWithUpdater {
                firing: 2,
                updater: 7
            }
        );
        assert_eq!(next, 3);
        assert_eq!(Op::decode(&code, 3).unwrap(), (Op::Return, 4));
    }

    #[test]
    fn decode_rejects_truncated_and_invalid() {
        let code = [Instruction::Push.word()];
        assert_eq!(
            Op::decode(&code, 0),
            Err(RuntimeError::TruncatedInstruction { at: 0 })
        );

        let code = [200.0];
        assert!(matches!(
            Op::decode(&code, 0),
            Err(RuntimeError::InvalidOpcode { at: 0, .. })
        ));

        let code = [Instruction::GetVariable.word(), -3.0];
        assert!(matches!(
            Op::decode(&code, 0),
            Err(RuntimeError::InvalidOperand { at: 1, .. })
        ));
    }

    #[test]
    fn decode_truncates_index_operands() {
        let code = [Instruction::GetVariable.word(), 2.9];
        assert_eq!(Op::decode(&code, 0).unwrap().0, Op::GetVariable(2));
    }
}

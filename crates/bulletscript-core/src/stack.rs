//! Bounded operand stack.

use crate::RuntimeError;

/// A fixed-capacity float stack.
///
/// The backing buffer is allocated once at the configured capacity and
/// never grows; pushing past it is a [`RuntimeError::StackOverflow`].
#[derive(Debug, Clone, PartialEq)]
pub struct OperandStack {
    values: Vec<f32>,
    capacity: usize,
}

impl OperandStack {
    /// Create an empty stack holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value.
    #[inline]
    pub fn push(&mut self, value: f32) -> Result<(), RuntimeError> {
        if self.values.len() >= self.capacity {
            return Err(RuntimeError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop the top value.
    #[inline]
    pub fn pop(&mut self) -> Result<f32, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Read the top value without removing it.
    #[inline]
    pub fn peek(&self) -> Result<f32, RuntimeError> {
        self.values
            .last()
            .copied()
            .ok_or(RuntimeError::StackUnderflow)
    }

    /// Replace the top value.
    #[inline]
    pub fn replace_top(&mut self, value: f32) -> Result<(), RuntimeError> {
        let top = self.values.last_mut().ok_or(RuntimeError::StackUnderflow)?;
        *top = value;
        Ok(())
    }

    /// Pop `count` values, returned in push order.
    pub fn pop_n(&mut self, count: usize) -> Result<Vec<f32>, RuntimeError> {
        if count > self.values.len() {
            return Err(RuntimeError::StackUnderflow);
        }
        let start = self.values.len() - count;
        Ok(self.values.split_off(start))
    }

    /// Drop everything above `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Current depth (the head pointer).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum depth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop() {
        let mut stack = OperandStack::new(4);
        stack.push(1.0).unwrap();
        stack.push(2.0).unwrap();
        assert_eq!(stack.peek(), Ok(2.0));
        assert_eq!(stack.pop(), Ok(2.0));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn overflow_at_capacity() {
        let mut stack = OperandStack::new(1);
        stack.push(1.0).unwrap();
        assert_eq!(
            stack.push(2.0),
            Err(RuntimeError::StackOverflow { capacity: 1 })
        );
    }

    #[test]
    fn underflow_when_empty() {
        let mut stack = OperandStack::new(1);
        assert_eq!(stack.pop(), Err(RuntimeError::StackUnderflow));
        assert_eq!(stack.peek(), Err(RuntimeError::StackUnderflow));
        assert_eq!(stack.replace_top(1.0), Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn pop_n_keeps_push_order() {
        let mut stack = OperandStack::new(8);
        for v in [1.0, 2.0, 3.0] {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.pop_n(2), Ok(vec![2.0, 3.0]));
        assert_eq!(stack.as_slice(), &[1.0]);
        assert_eq!(stack.pop_n(2), Err(RuntimeError::StackUnderflow));
        assert_eq!(stack.pop_n(0), Ok(vec![]));
    }
}

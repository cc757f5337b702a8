//! Evaluation stack used while executing a program.

use crate::error::{VmError, VmResult};
use crate::stack_value::StackValue;
use avm_config::MAX_STACK_DEPTH;

/// Bounded operand stack.
#[derive(Debug, Clone)]
pub struct EvaluationStack {
    stack: Vec<StackValue>,
    max_depth: usize,
}

impl Default for EvaluationStack {
    fn default() -> Self {
        Self::new(MAX_STACK_DEPTH)
    }
}

impl EvaluationStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    pub fn push(&mut self, value: StackValue) -> VmResult<()> {
        if self.stack.len() >= self.max_depth {
            return Err(VmError::StackOverflow {
                max: self.max_depth,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> VmResult<StackValue> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    pub fn pop_u64(&mut self) -> VmResult<u64> {
        self.pop()?.as_u64()
    }

    pub fn pop_bytes(&mut self) -> VmResult<Vec<u8>> {
        self.pop()?.into_bytes()
    }

    /// Returns the item `n` positions below the top without removing it.
    pub fn peek(&self, n: usize) -> VmResult<&StackValue> {
        self.stack
            .len()
            .checked_sub(n + 1)
            .and_then(|index| self.stack.get(index))
            .ok_or(VmError::StackUnderflow)
    }

    pub fn swap(&mut self) -> VmResult<()> {
        let len = self.stack.len();
        if len < 2 {
            return Err(VmError::StackUnderflow);
        }
        self.stack.swap(len - 1, len - 2);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Stack contents, bottom first.
    pub fn as_slice(&self) -> &[StackValue] {
        &self.stack
    }
}

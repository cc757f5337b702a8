//! Execution engine for AVM programs.

use crate::context::ExecutionContext;
use crate::decode::{Op, ProgramDecoder};
use crate::error::{VmError, VmResult};
use crate::evaluation_stack::EvaluationStack;
use crate::jump_table::JumpTable;
use crate::stack_value::StackValue;
use crate::vm_state::VmState;
use avm_config::{
    MAX_APP_PROGRAM_COST, MAX_BYTE_SLICE_LEN, MAX_CALLSTACK_DEPTH, MAX_LOG_CALLS, MAX_LOG_SIZE,
    MAX_SCRATCH_SLOTS, MAX_STACK_DEPTH,
};
use avm_teal::BACKWARD_BRANCH_VERSION;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Restrictions on a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEngineLimits {
    pub max_stack_depth: usize,
    pub max_callstack_depth: usize,
    pub max_byte_slice_len: usize,
    /// Opcode budget for the program.
    pub budget: u64,
    pub max_log_calls: usize,
    /// Total bytes across all logs.
    pub max_log_size: usize,
}

impl ExecutionEngineLimits {
    pub const DEFAULT: Self = Self {
        max_stack_depth: MAX_STACK_DEPTH,
        max_callstack_depth: MAX_CALLSTACK_DEPTH,
        max_byte_slice_len: MAX_BYTE_SLICE_LEN,
        budget: MAX_APP_PROGRAM_COST,
        max_log_calls: MAX_LOG_CALLS,
        max_log_size: MAX_LOG_SIZE,
    };
}

impl Default for ExecutionEngineLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Evaluates one program against one [`ExecutionContext`].
pub struct ExecutionEngine {
    state: VmState,
    version: u8,
    ops: Vec<Op>,
    /// Maps instruction pcs to positions in `ops`.
    index_of: HashMap<usize, usize>,
    program_len: usize,
    ip: usize,
    is_jumping: bool,
    jump_table: JumpTable,
    limits: ExecutionEngineLimits,
    stack: EvaluationStack,
    scratch: Vec<StackValue>,
    call_stack: Vec<usize>,
    context: ExecutionContext,
    logs: Vec<Vec<u8>>,
    log_bytes: usize,
    cost: u64,
    fault: Option<VmError>,
    fault_pc: Option<usize>,
}

impl ExecutionEngine {
    /// Decodes `program`. A decoding failure makes [`execute`](Self::execute) fault immediately.
    pub fn new(program: &[u8], context: ExecutionContext) -> Self {
        Self::new_with_limits(program, context, ExecutionEngineLimits::default())
    }

    pub fn new_with_limits(
        program: &[u8],
        context: ExecutionContext,
        limits: ExecutionEngineLimits,
    ) -> Self {
        let mut engine = Self {
            state: VmState::None,
            version: 0,
            ops: Vec::new(),
            index_of: HashMap::new(),
            program_len: program.len(),
            ip: 0,
            is_jumping: false,
            jump_table: JumpTable::new(),
            stack: EvaluationStack::new(limits.max_stack_depth),
            limits,
            scratch: vec![StackValue::default(); MAX_SCRATCH_SLOTS],
            call_stack: Vec::new(),
            context,
            logs: Vec::new(),
            log_bytes: 0,
            cost: 0,
            fault: None,
            fault_pc: None,
        };
        if let Err(err) = engine.load(program) {
            engine.on_fault(err);
        }
        engine
    }

    fn load(&mut self, program: &[u8]) -> VmResult<()> {
        let decoder = ProgramDecoder::new(program)?;
        self.version = decoder.version();
        for op in decoder {
            let op = op?;
            self.index_of.insert(op.pc, self.ops.len());
            self.ops.push(op);
        }
        Ok(())
    }

    /// Runs the program to completion.
    pub fn execute(&mut self) -> VmState {
        while self.state == VmState::None {
            if let Err(err) = self.execute_next() {
                self.on_fault(err);
            }
        }
        debug!(
            target: "avm_vm::engine",
            state = %self.state,
            cost = self.cost,
            logs = self.logs.len(),
            "execution finished"
        );
        self.state
    }

    /// Executes a single instruction, or finishes when past the last one.
    pub fn execute_next(&mut self) -> VmResult<()> {
        if self.state != VmState::None {
            return Ok(());
        }
        let Some(op) = self.ops.get(self.ip).cloned() else {
            return self.finish();
        };

        self.cost += op.code.cost();
        if self.cost > self.limits.budget {
            self.fault_pc = Some(op.pc);
            return Err(VmError::BudgetExceeded {
                cost: self.cost,
                budget: self.limits.budget,
            });
        }

        trace!(target: "avm_vm::engine", pc = op.pc, op = %op.code, depth = self.stack.len());
        self.is_jumping = false;
        let handler = self.jump_table.get(op.code);
        if let Err(err) = handler(self, &op) {
            self.fault_pc = Some(op.pc);
            return Err(err);
        }

        if !self.is_jumping {
            self.ip += 1;
        }
        Ok(())
    }

    /// Falling off the end requires exactly one uint64 on the stack.
    fn finish(&mut self) -> VmResult<()> {
        if self.stack.len() != 1 {
            return Err(VmError::InvalidFinalStack(format!(
                "{} values on the stack",
                self.stack.len()
            )));
        }
        let result = self.stack.pop()?;
        match result {
            StackValue::Uint64(value) => {
                self.halt(value != 0);
                Ok(())
            }
            other => Err(VmError::InvalidFinalStack(format!(
                "top of stack is {}",
                other.type_name()
            ))),
        }
    }

    fn on_fault(&mut self, err: VmError) {
        debug!(target: "avm_vm::engine", pc = ?self.fault_pc, error = %err, "program faulted");
        self.fault = Some(err);
        self.state = VmState::Fault;
    }

    /// Ends execution with approval or rejection.
    pub fn halt(&mut self, approved: bool) {
        self.state = if approved {
            VmState::Approved
        } else {
            VmState::Rejected
        };
    }

    /// Moves execution to `op.next_pc() + offset`.
    ///
    /// Targets must be instruction boundaries or the end of the program.
    pub fn jump(&mut self, op: &Op, offset: i16) -> VmResult<()> {
        if offset < 0 && self.version < BACKWARD_BRANCH_VERSION {
            return Err(VmError::BackwardBranch { pc: op.pc });
        }
        let target = op.next_pc() as i64 + offset as i64;
        let index = if target == self.program_len as i64 {
            self.ops.len()
        } else {
            usize::try_from(target)
                .ok()
                .and_then(|pc| self.index_of.get(&pc).copied())
                .ok_or(VmError::InvalidBranch { pc: op.pc, target })?
        };
        self.ip = index;
        self.is_jumping = true;
        Ok(())
    }

    /// Pushes a return address and jumps to the subroutine.
    pub fn call(&mut self, op: &Op, offset: i16) -> VmResult<()> {
        if self.call_stack.len() >= self.limits.max_callstack_depth {
            return Err(VmError::CallStackOverflow {
                max: self.limits.max_callstack_depth,
            });
        }
        let return_to = self.ip + 1;
        self.jump(op, offset)?;
        self.call_stack.push(return_to);
        Ok(())
    }

    pub fn ret(&mut self) -> VmResult<()> {
        let return_to = self.call_stack.pop().ok_or(VmError::CallStackUnderflow)?;
        self.ip = return_to;
        self.is_jumping = true;
        Ok(())
    }

    pub fn push(&mut self, value: StackValue) -> VmResult<()> {
        if let StackValue::Bytes(bytes) = &value {
            if bytes.len() > self.limits.max_byte_slice_len {
                return Err(VmError::ByteSliceTooLong {
                    len: bytes.len(),
                    max: self.limits.max_byte_slice_len,
                });
            }
        }
        self.stack.push(value)
    }

    pub fn pop(&mut self) -> VmResult<StackValue> {
        self.stack.pop()
    }

    pub fn pop_u64(&mut self) -> VmResult<u64> {
        self.stack.pop_u64()
    }

    pub fn pop_bytes(&mut self) -> VmResult<Vec<u8>> {
        self.stack.pop_bytes()
    }

    pub fn stack(&self) -> &EvaluationStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut EvaluationStack {
        &mut self.stack
    }

    pub fn load_scratch(&self, slot: u8) -> StackValue {
        self.scratch[slot as usize].clone()
    }

    pub fn store_scratch(&mut self, slot: u8, value: StackValue) {
        self.scratch[slot as usize] = value;
    }

    /// Value in scratch slot `slot`; unset slots hold uint64 zero.
    pub fn scratch(&self, slot: u8) -> &StackValue {
        &self.scratch[slot as usize]
    }

    pub fn log(&mut self, message: Vec<u8>) -> VmResult<()> {
        if self.logs.len() >= self.limits.max_log_calls {
            return Err(VmError::log_limit(format!(
                "more than {} calls",
                self.limits.max_log_calls
            )));
        }
        if self.log_bytes + message.len() > self.limits.max_log_size {
            return Err(VmError::log_limit(format!(
                "more than {} bytes",
                self.limits.max_log_size
            )));
        }
        self.log_bytes += message.len();
        self.logs.push(message);
        Ok(())
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn logs(&self) -> &[Vec<u8>] {
        &self.logs
    }

    pub fn into_logs(self) -> Vec<Vec<u8>> {
        self.logs
    }

    /// The error that aborted execution, if any.
    pub fn fault(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    /// Program counter of the faulting instruction.
    pub fn fault_pc(&self) -> Option<usize> {
        self.fault_pc
    }

    /// Opcode budget consumed so far.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn limits(&self) -> &ExecutionEngineLimits {
        &self.limits
    }
}

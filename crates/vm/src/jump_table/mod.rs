//! Opcode dispatch.
//!
//! Handlers are grouped by concern and registered into a 256-entry table
//! indexed by opcode byte.

pub mod bytes;
pub mod context;
pub mod control;
pub mod numeric;
pub mod stack;

use crate::decode::{Op, Operand};
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use avm_teal::OpCode;

/// A handler for one opcode.
pub type InstructionHandler = fn(&mut ExecutionEngine, &Op) -> VmResult<()>;

#[derive(Clone)]
pub struct JumpTable {
    handlers: [Option<InstructionHandler>; 256],
}

impl Default for JumpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpTable {
    /// Creates a table with every supported opcode registered.
    pub fn new() -> Self {
        let mut jump_table = Self {
            handlers: [None; 256],
        };
        numeric::register_handlers(&mut jump_table);
        control::register_handlers(&mut jump_table);
        stack::register_handlers(&mut jump_table);
        bytes::register_handlers(&mut jump_table);
        context::register_handlers(&mut jump_table);
        jump_table
    }

    pub fn register(&mut self, opcode: OpCode, handler: InstructionHandler) {
        self.handlers[opcode as usize] = Some(handler);
    }

    /// Handler for `opcode`; unregistered opcodes fault.
    pub fn get(&self, opcode: OpCode) -> InstructionHandler {
        self.handlers[opcode as usize].unwrap_or(unsupported)
    }

    pub fn is_registered(&self, opcode: OpCode) -> bool {
        self.handlers[opcode as usize].is_some()
    }
}

fn unsupported(_engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    Err(VmError::UnsupportedOpcode(op.code.name().to_string()))
}

/// Immediate accessors shared by handlers. The decoder guarantees the
/// operand shape matches the opcode.
pub(crate) fn field_operand(op: &Op) -> VmResult<u8> {
    match op.operand {
        Operand::Field(field) | Operand::Slot(field) => Ok(field),
        _ => Err(VmError::UnsupportedOpcode(op.code.name().to_string())),
    }
}

pub(crate) fn offset_operand(op: &Op) -> VmResult<i16> {
    match op.operand {
        Operand::Offset(offset) => Ok(offset),
        _ => Err(VmError::UnsupportedOpcode(op.code.name().to_string())),
    }
}

//! Stack manipulation and constants.

use crate::decode::{Op, Operand};
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::stack_value::StackValue;
use avm_teal::OpCode;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::PushInt, pushint);
    jump_table.register(OpCode::PushBytes, pushbytes);
    jump_table.register(OpCode::Pop, pop);
    jump_table.register(OpCode::Dup, dup);
    jump_table.register(OpCode::Dup2, dup2);
    jump_table.register(OpCode::Swap, swap);
}

fn pushint(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    match op.operand {
        Operand::Uint(value) => engine.push(StackValue::Uint64(value)),
        _ => Err(VmError::UnsupportedOpcode(op.code.name().to_string())),
    }
}

fn pushbytes(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    match &op.operand {
        Operand::Bytes(bytes) => engine.push(StackValue::Bytes(bytes.clone())),
        _ => Err(VmError::UnsupportedOpcode(op.code.name().to_string())),
    }
}

fn pop(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    engine.pop().map(|_| ())
}

fn dup(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let top = engine.stack().peek(0)?.clone();
    engine.push(top)
}

fn dup2(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let a = engine.stack().peek(1)?.clone();
    let b = engine.stack().peek(0)?.clone();
    engine.push(a)?;
    engine.push(b)
}

fn swap(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    engine.stack_mut().swap()
}

#[cfg(test)]
mod tests {
    use crate::context::ExecutionContext;
    use crate::execution_engine::ExecutionEngine;
    use crate::stack_value::StackValue;
    use crate::vm_state::VmState;
    use avm_teal::{assemble, OpCode, ProgramBuilder};

    #[test]
    fn test_stack_ops() {
        let mut b = ProgramBuilder::new();
        b.emit_int(1)
            .emit_int(2)
            .emit_opcode(OpCode::Dup2)
            .emit_opcode(OpCode::Swap)
            .emit_store(0)
            .emit_store(1)
            .emit_opcode(OpCode::Dup)
            .emit_opcode(OpCode::Pop)
            .emit_opcode(OpCode::Pop)
            .emit_opcode(OpCode::Pop)
            .emit_int(1);
        let bytes = assemble(&b.build(6)).unwrap();
        let mut engine = ExecutionEngine::new(&bytes, ExecutionContext::default());
        assert_eq!(engine.execute(), VmState::Approved);
        assert_eq!(engine.scratch(0), &StackValue::Uint64(1));
        assert_eq!(engine.scratch(1), &StackValue::Uint64(2));
    }

    #[test]
    fn test_stack_underflow_faults() {
        let mut b = ProgramBuilder::new();
        b.emit_opcode(OpCode::Pop);
        let bytes = assemble(&b.build(6)).unwrap();
        let mut engine = ExecutionEngine::new(&bytes, ExecutionContext::default());
        assert_eq!(engine.execute(), VmState::Fault);
    }
}

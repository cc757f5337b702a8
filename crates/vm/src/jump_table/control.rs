//! Branches, subroutines and program termination.

use crate::decode::Op;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{offset_operand, JumpTable};
use avm_teal::OpCode;

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::Err, err);
    jump_table.register(OpCode::Bnz, bnz);
    jump_table.register(OpCode::Bz, bz);
    jump_table.register(OpCode::B, b);
    jump_table.register(OpCode::Return, ret);
    jump_table.register(OpCode::Assert, assert);
    jump_table.register(OpCode::Callsub, callsub);
    jump_table.register(OpCode::Retsub, retsub);
}

fn err(_engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    Err(VmError::ErrOpcode)
}

fn bnz(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let offset = offset_operand(op)?;
    if engine.pop_u64()? != 0 {
        engine.jump(op, offset)?;
    }
    Ok(())
}

fn bz(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let offset = offset_operand(op)?;
    if engine.pop_u64()? == 0 {
        engine.jump(op, offset)?;
    }
    Ok(())
}

fn b(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let offset = offset_operand(op)?;
    engine.jump(op, offset)
}

/// Approves iff the popped uint64 is non-zero.
fn ret(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let value = engine.pop_u64()?;
    engine.halt(value != 0);
    Ok(())
}

fn assert(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    if engine.pop_u64()? == 0 {
        return Err(VmError::AssertFailed { pc: op.pc });
    }
    Ok(())
}

fn callsub(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let offset = offset_operand(op)?;
    engine.call(op, offset)
}

fn retsub(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    engine.ret()
}

#[cfg(test)]
mod tests {
    use crate::context::ExecutionContext;
    use crate::error::VmError;
    use crate::execution_engine::ExecutionEngine;
    use crate::vm_state::VmState;
    use avm_teal::{assemble, OpCode, ProgramBuilder};

    fn run(builder: ProgramBuilder, version: u8) -> ExecutionEngine {
        let bytes = assemble(&builder.build(version)).unwrap();
        let mut engine = ExecutionEngine::new(&bytes, ExecutionContext::default());
        engine.execute();
        engine
    }

    #[test]
    fn test_err_and_assert() {
        let mut b = ProgramBuilder::new();
        b.emit_opcode(OpCode::Err);
        assert_eq!(run(b, 6).fault(), Some(&VmError::ErrOpcode));

        let mut b = ProgramBuilder::new();
        b.emit_int(0).emit_opcode(OpCode::Assert).emit_int(1);
        assert_eq!(run(b, 6).fault(), Some(&VmError::AssertFailed { pc: 3 }));

        let mut b = ProgramBuilder::new();
        b.emit_int(5).emit_opcode(OpCode::Assert).emit_int(1);
        assert_eq!(run(b, 6).state(), VmState::Approved);
    }

    #[test]
    fn test_conditional_branches() {
        let mut b = ProgramBuilder::new();
        b.emit_int(0)
            .emit_jump(OpCode::Bz, "yes")
            .emit_opcode(OpCode::Err)
            .emit_label("yes")
            .emit_int(0)
            .emit_jump(OpCode::Bnz, "no")
            .emit_int(1)
            .emit_opcode(OpCode::Return)
            .emit_label("no")
            .emit_opcode(OpCode::Err);
        assert_eq!(run(b, 6).state(), VmState::Approved);
    }

    #[test]
    fn test_retsub_without_call() {
        let mut b = ProgramBuilder::new();
        b.emit_opcode(OpCode::Retsub);
        assert_eq!(run(b, 6).fault(), Some(&VmError::CallStackUnderflow));
    }

    #[test]
    fn test_backward_branch_rejected_before_v4() {
        // Hand-assembled: version 3, pushint 1, bnz -5 (back to pc 1)
        let program = [0x03, 0x81, 0x01, 0x40, 0xff, 0xfb];
        let mut engine = ExecutionEngine::new(&program, ExecutionContext::default());
        assert_eq!(engine.execute(), VmState::Fault);
        assert_eq!(engine.fault(), Some(&VmError::BackwardBranch { pc: 3 }));
    }

    #[test]
    fn test_branch_into_immediate_faults() {
        // pushint 1, then b -4 lands on the pushint immediate byte
        let program = [0x06, 0x81, 0x01, 0x42, 0xff, 0xfc];
        let mut engine = ExecutionEngine::new(&program, ExecutionContext::default());
        assert_eq!(engine.execute(), VmState::Fault);
        assert!(matches!(engine.fault(), Some(VmError::InvalidBranch { .. })));
    }
}

//! Transaction fields, globals, scratch space and logging.

use crate::decode::{Op, Operand};
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::{field_operand, JumpTable};
use avm_teal::{GlobalField, OpCode, TxnField};

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::Txn, txn);
    jump_table.register(OpCode::Txna, txna);
    jump_table.register(OpCode::Global, global);
    jump_table.register(OpCode::Load, load);
    jump_table.register(OpCode::Store, store);
    jump_table.register(OpCode::Log, log);
}

fn txn_field(opcode: &'static str, raw: u8, version: u8) -> VmResult<TxnField> {
    TxnField::from_u8(raw)
        .filter(|field| field.min_version() <= version)
        .ok_or(VmError::InvalidField { opcode, field: raw })
}

fn txn(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let field = txn_field("txn", field_operand(op)?, engine.version())?;
    let value = engine.context().txn(field)?;
    engine.push(value)
}

fn txna(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let Operand::FieldIndex(raw, index) = op.operand else {
        return Err(VmError::UnsupportedOpcode(op.code.name().to_string()));
    };
    let field = txn_field("txna", raw, engine.version())?;
    let value = engine.context().txna(field, index as usize)?;
    engine.push(value)
}

fn global(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let raw = field_operand(op)?;
    let field = GlobalField::from_u8(raw)
        .filter(|field| field.min_version() <= engine.version())
        .ok_or(VmError::InvalidField {
            opcode: "global",
            field: raw,
        })?;
    let value = engine.context().global(field);
    engine.push(value)
}

fn load(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let value = engine.load_scratch(field_operand(op)?);
    engine.push(value)
}

fn store(engine: &mut ExecutionEngine, op: &Op) -> VmResult<()> {
    let slot = field_operand(op)?;
    let value = engine.pop()?;
    engine.store_scratch(slot, value);
    Ok(())
}

fn log(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let message = engine.pop_bytes()?;
    engine.log(message)
}

#[cfg(test)]
mod tests {
    use crate::context::ExecutionContext;
    use crate::error::VmError;
    use crate::execution_engine::ExecutionEngine;
    use crate::vm_state::VmState;
    use avm_config::{ADDRESS_SIZE, MAX_LOG_CALLS};
    use avm_teal::{assemble, GlobalField, OpCode, ProgramBuilder, TxnField};

    fn run(b: ProgramBuilder, ctx: ExecutionContext) -> ExecutionEngine {
        let bytes = assemble(&b.build(6)).unwrap();
        let mut engine = ExecutionEngine::new(&bytes, ctx);
        engine.execute();
        engine
    }

    #[test]
    fn test_creator_check() {
        let creator = [1; ADDRESS_SIZE];
        let mut b = ProgramBuilder::new();
        b.emit_txn(TxnField::Sender)
            .emit_global(GlobalField::CreatorAddress)
            .emit_opcode(OpCode::Eq);

        let ctx = ExecutionContext::new(creator).with_application(1, creator);
        assert_eq!(run(b, ctx).state(), VmState::Approved);

        let mut b = ProgramBuilder::new();
        b.emit_txn(TxnField::Sender)
            .emit_global(GlobalField::CreatorAddress)
            .emit_opcode(OpCode::Eq);
        let ctx = ExecutionContext::new([2; ADDRESS_SIZE]).with_application(1, creator);
        assert_eq!(run(b, ctx).state(), VmState::Rejected);
    }

    #[test]
    fn test_txna_out_of_range() {
        let mut b = ProgramBuilder::new();
        b.emit_txna(TxnField::ApplicationArgs, 3);
        let ctx = ExecutionContext::default().with_args(vec![vec![1]]);
        assert!(matches!(
            run(b, ctx).fault(),
            Some(VmError::IndexOutOfRange { index: 3, len: 1, .. })
        ));
    }

    #[test]
    fn test_log_limits() {
        let mut b = ProgramBuilder::new();
        b.emit_bytes(b"hi").emit_opcode(OpCode::Log).emit_int(1);
        let engine = run(b, ExecutionContext::default());
        assert_eq!(engine.logs(), &[b"hi".to_vec()]);

        let mut b = ProgramBuilder::new();
        for _ in 0..=MAX_LOG_CALLS {
            b.emit_bytes(b"x").emit_opcode(OpCode::Log);
        }
        b.emit_int(1);
        let engine = run(b, ExecutionContext::default());
        assert!(matches!(engine.fault(), Some(VmError::LogLimit { .. })));
        assert_eq!(engine.logs().len(), MAX_LOG_CALLS);
    }
}

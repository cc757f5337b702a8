//! Byte slice operations and hashing.

use crate::decode::Op;
use crate::error::{VmError, VmResult};
use crate::execution_engine::ExecutionEngine;
use crate::jump_table::JumpTable;
use crate::stack_value::StackValue;
use avm_teal::OpCode;
use sha2::{Digest, Sha256, Sha512_256};

pub fn register_handlers(jump_table: &mut JumpTable) {
    jump_table.register(OpCode::Len, len);
    jump_table.register(OpCode::Itob, itob);
    jump_table.register(OpCode::Btoi, btoi);
    jump_table.register(OpCode::Concat, concat);
    jump_table.register(OpCode::Sha256, sha256);
    jump_table.register(OpCode::Sha512_256, sha512_256);
}

fn len(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let bytes = engine.pop_bytes()?;
    engine.push((bytes.len() as u64).into())
}

fn itob(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let value = engine.pop_u64()?;
    engine.push(StackValue::Bytes(value.to_be_bytes().to_vec()))
}

/// Big-endian, at most 8 bytes. The empty slice is zero.
fn btoi(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let bytes = engine.pop_bytes()?;
    if bytes.len() > 8 {
        return Err(VmError::BtoiTooLong { len: bytes.len() });
    }
    let value = bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | *byte as u64);
    engine.push(value.into())
}

/// Fails if the result exceeds the byte slice limit.
fn concat(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let b = engine.pop_bytes()?;
    let mut a = engine.pop_bytes()?;
    a.extend_from_slice(&b);
    engine.push(StackValue::Bytes(a))
}

fn sha256(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let data = engine.pop_bytes()?;
    engine.push(StackValue::Bytes(Sha256::digest(&data).to_vec()))
}

fn sha512_256(engine: &mut ExecutionEngine, _op: &Op) -> VmResult<()> {
    let data = engine.pop_bytes()?;
    engine.push(StackValue::Bytes(Sha512_256::digest(&data).to_vec()))
}

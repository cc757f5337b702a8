//! A single line of a TEAL program.

use crate::fields::{GlobalField, OnComplete, TxnField};
use crate::op_code::OpCode;
use std::fmt;

/// One TEAL line: a label or an opcode with its immediates.
///
/// Integer and byte constants are written with the `int` / `byte` / `method`
/// pseudo-ops and assembled as `pushint` / `pushbytes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    Label(String),
    /// An opcode without immediates.
    Op(OpCode),
    Int(u64),
    /// `int NoOp` style named constant.
    OnCompletion(OnComplete),
    Bytes(Vec<u8>),
    /// Pushes the 4-byte selector of an ABI method signature.
    Method(String),
    Txn(TxnField),
    Txna(TxnField, u8),
    Global(GlobalField),
    Load(u8),
    Store(u8),
    /// `bnz`, `bz` or `b` to a label.
    Branch(OpCode, String),
    Callsub(String),
}

impl Instruction {
    /// Opcode the instruction assembles to, `None` for labels.
    pub fn opcode(&self) -> Option<OpCode> {
        match self {
            Instruction::Label(_) => None,
            Instruction::Op(op) | Instruction::Branch(op, _) => Some(*op),
            Instruction::Int(_) | Instruction::OnCompletion(_) => Some(OpCode::PushInt),
            Instruction::Bytes(_) | Instruction::Method(_) => Some(OpCode::PushBytes),
            Instruction::Txn(_) => Some(OpCode::Txn),
            Instruction::Txna(_, _) => Some(OpCode::Txna),
            Instruction::Global(_) => Some(OpCode::Global),
            Instruction::Load(_) => Some(OpCode::Load),
            Instruction::Store(_) => Some(OpCode::Store),
            Instruction::Callsub(_) => Some(OpCode::Callsub),
        }
    }

    /// Label referenced by a branch or subroutine call.
    pub fn target(&self) -> Option<&str> {
        match self {
            Instruction::Branch(_, label) | Instruction::Callsub(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }

    /// Number of bytes the instruction occupies in bytecode.
    pub fn encoded_len(&self) -> usize {
        match self {
            Instruction::Label(_) => 0,
            Instruction::Op(_) => 1,
            Instruction::Int(value) => 1 + uvarint_len(*value),
            Instruction::OnCompletion(oc) => 1 + uvarint_len(*oc as u64),
            Instruction::Bytes(bytes) => 1 + uvarint_len(bytes.len() as u64) + bytes.len(),
            Instruction::Method(_) => 1 + 1 + avm_abi::SELECTOR_SIZE,
            Instruction::Txn(_) | Instruction::Global(_) => 2,
            Instruction::Load(_) | Instruction::Store(_) => 2,
            Instruction::Txna(_, _) => 3,
            Instruction::Branch(_, _) | Instruction::Callsub(_) => 3,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Label(name) => write!(f, "{}:", name),
            Instruction::Op(op) => write!(f, "{}", op),
            Instruction::Int(value) => write!(f, "int {}", value),
            Instruction::OnCompletion(oc) => write!(f, "int {}", oc),
            Instruction::Bytes(bytes) => write!(f, "byte 0x{}", hex::encode(bytes)),
            Instruction::Method(signature) => write!(f, "method \"{}\"", signature),
            Instruction::Txn(field) => write!(f, "txn {}", field),
            Instruction::Txna(field, index) => write!(f, "txna {} {}", field, index),
            Instruction::Global(field) => write!(f, "global {}", field),
            Instruction::Load(slot) => write!(f, "load {}", slot),
            Instruction::Store(slot) => write!(f, "store {}", slot),
            Instruction::Branch(op, label) => write!(f, "{} {}", op, label),
            Instruction::Callsub(label) => write!(f, "callsub {}", label),
        }
    }
}

/// Length of the unsigned LEB128 encoding of `value`.
pub fn uvarint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Appends the unsigned LEB128 encoding of `value`.
pub fn write_uvarint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

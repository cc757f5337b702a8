//! AVM opcodes.
//!
//! Only the subset needed by ABI routers and integer arithmetic is modelled.
//! Byte values, mnemonics and availability follow the AVM opcode table.

use std::fmt;

/// Layout of the immediate bytes that follow an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    None,
    /// One byte selecting a transaction or global field.
    Field,
    /// Field byte followed by an array index byte.
    FieldIndex,
    /// One byte scratch slot.
    Slot,
    /// Two byte big-endian signed offset relative to the next instruction.
    Offset,
    /// Unsigned LEB128 integer.
    VarUint,
    /// Unsigned LEB128 length followed by that many bytes.
    VarBytes,
}

/// An AVM opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Fail immediately.
    Err = 0x00,
    Sha256 = 0x01,
    Sha512_256 = 0x03,

    /// A plus B. Fail on overflow.
    Add = 0x08,
    /// A minus B. Fail if B > A.
    Sub = 0x09,
    /// A divided by B (truncated). Fail if B == 0.
    Div = 0x0a,
    /// A times B. Fail on overflow.
    Mul = 0x0b,
    Lt = 0x0c,
    Gt = 0x0d,
    Le = 0x0e,
    Ge = 0x0f,
    And = 0x10,
    Or = 0x11,
    /// A is equal to B (both uint64 or both bytes).
    Eq = 0x12,
    Neq = 0x13,
    Not = 0x14,
    Len = 0x15,
    Itob = 0x16,
    /// Big-endian bytes (at most 8) to uint64.
    Btoi = 0x17,
    /// A modulo B. Fail if B == 0.
    Mod = 0x18,

    Txn = 0x31,
    Global = 0x32,
    Load = 0x34,
    Store = 0x35,
    Txna = 0x36,

    Bnz = 0x40,
    Bz = 0x41,
    B = 0x42,
    Return = 0x43,
    Assert = 0x44,

    Pop = 0x48,
    Dup = 0x49,
    Dup2 = 0x4a,
    Swap = 0x4c,
    Concat = 0x50,

    PushBytes = 0x80,
    PushInt = 0x81,
    Callsub = 0x88,
    Retsub = 0x89,

    Log = 0xb0,
}

impl OpCode {
    /// Every modelled opcode, in byte order.
    pub const ALL: [OpCode; 40] = [
        OpCode::Err,
        OpCode::Sha256,
        OpCode::Sha512_256,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Div,
        OpCode::Mul,
        OpCode::Lt,
        OpCode::Gt,
        OpCode::Le,
        OpCode::Ge,
        OpCode::And,
        OpCode::Or,
        OpCode::Eq,
        OpCode::Neq,
        OpCode::Not,
        OpCode::Len,
        OpCode::Itob,
        OpCode::Btoi,
        OpCode::Mod,
        OpCode::Txn,
        OpCode::Global,
        OpCode::Load,
        OpCode::Store,
        OpCode::Txna,
        OpCode::Bnz,
        OpCode::Bz,
        OpCode::B,
        OpCode::Return,
        OpCode::Assert,
        OpCode::Pop,
        OpCode::Dup,
        OpCode::Dup2,
        OpCode::Swap,
        OpCode::Concat,
        OpCode::PushBytes,
        OpCode::PushInt,
        OpCode::Callsub,
        OpCode::Retsub,
        OpCode::Log,
    ];

    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| *op as u8 == byte)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// TEAL mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Err => "err",
            OpCode::Sha256 => "sha256",
            OpCode::Sha512_256 => "sha512_256",
            OpCode::Add => "+",
            OpCode::Sub => "-",
            OpCode::Div => "/",
            OpCode::Mul => "*",
            OpCode::Lt => "<",
            OpCode::Gt => ">",
            OpCode::Le => "<=",
            OpCode::Ge => ">=",
            OpCode::And => "&&",
            OpCode::Or => "||",
            OpCode::Eq => "==",
            OpCode::Neq => "!=",
            OpCode::Not => "!",
            OpCode::Len => "len",
            OpCode::Itob => "itob",
            OpCode::Btoi => "btoi",
            OpCode::Mod => "%",
            OpCode::Txn => "txn",
            OpCode::Global => "global",
            OpCode::Load => "load",
            OpCode::Store => "store",
            OpCode::Txna => "txna",
            OpCode::Bnz => "bnz",
            OpCode::Bz => "bz",
            OpCode::B => "b",
            OpCode::Return => "return",
            OpCode::Assert => "assert",
            OpCode::Pop => "pop",
            OpCode::Dup => "dup",
            OpCode::Dup2 => "dup2",
            OpCode::Swap => "swap",
            OpCode::Concat => "concat",
            OpCode::PushBytes => "pushbytes",
            OpCode::PushInt => "pushint",
            OpCode::Callsub => "callsub",
            OpCode::Retsub => "retsub",
            OpCode::Log => "log",
        }
    }

    /// First program version in which the opcode is available.
    pub fn min_version(self) -> u8 {
        match self {
            OpCode::Txna | OpCode::Bz | OpCode::B | OpCode::Return | OpCode::Dup2 | OpCode::Concat => 2,
            OpCode::Assert | OpCode::Swap | OpCode::PushBytes | OpCode::PushInt => 3,
            OpCode::Callsub | OpCode::Retsub => 4,
            OpCode::Log => 5,
            _ => 1,
        }
    }

    pub fn immediate(self) -> Immediate {
        match self {
            OpCode::Txn | OpCode::Global => Immediate::Field,
            OpCode::Txna => Immediate::FieldIndex,
            OpCode::Load | OpCode::Store => Immediate::Slot,
            OpCode::Bnz | OpCode::Bz | OpCode::B | OpCode::Callsub => Immediate::Offset,
            OpCode::PushInt => Immediate::VarUint,
            OpCode::PushBytes => Immediate::VarBytes,
            _ => Immediate::None,
        }
    }

    /// Opcode budget consumed by one execution.
    pub fn cost(self) -> u64 {
        match self {
            OpCode::Sha256 => 35,
            OpCode::Sha512_256 => 45,
            _ => 1,
        }
    }

    pub fn is_branch(self) -> bool {
        matches!(self, OpCode::Bnz | OpCode::Bz | OpCode::B)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_lookup_roundtrip() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::from_u8(op as u8), Some(op));
            assert_eq!(OpCode::from_name(op.name()), Some(op));
        }
        assert_eq!(OpCode::from_u8(0x02), None);
        assert_eq!(OpCode::from_name("keccak256"), None);
    }

    #[test]
    fn test_arithmetic_bytes() {
        assert_eq!(OpCode::Add as u8, 0x08);
        assert_eq!(OpCode::Sub as u8, 0x09);
        assert_eq!(OpCode::Div as u8, 0x0a);
        assert_eq!(OpCode::Mul as u8, 0x0b);
    }

    #[test]
    fn test_versions() {
        assert_eq!(OpCode::Add.min_version(), 1);
        assert_eq!(OpCode::Callsub.min_version(), 4);
        assert_eq!(OpCode::Log.min_version(), 5);
    }
}

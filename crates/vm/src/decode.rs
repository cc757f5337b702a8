//! Bytecode decoding.

use crate::error::DecodeError;
use avm_config::{MAX_TEAL_VERSION, MIN_TEAL_VERSION};
use avm_teal::{Immediate, OpCode};

/// Decoded immediate arguments of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    None,
    Field(u8),
    FieldIndex(u8, u8),
    Slot(u8),
    Offset(i16),
    Uint(u64),
    Bytes(Vec<u8>),
}

/// A decoded instruction at program counter `pc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub pc: usize,
    pub code: OpCode,
    pub operand: Operand,
    /// Encoded size in bytes, opcode included.
    pub size: usize,
}

impl Op {
    /// Program counter of the following instruction.
    pub fn next_pc(&self) -> usize {
        self.pc + self.size
    }
}

/// Reads the uvarint version header. Returns the version and header length.
pub fn read_version(program: &[u8]) -> Result<(u8, usize), DecodeError> {
    if program.is_empty() {
        return Err(DecodeError::EmptyProgram);
    }
    let (version, len) = read_uvarint(program, 0)?;
    if version < MIN_TEAL_VERSION as u64 || version > MAX_TEAL_VERSION as u64 {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    Ok((version as u8, len))
}

fn read_uvarint(data: &[u8], pc: usize) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;
    for (i, byte) in data.iter().enumerate() {
        if i >= 10 || (i == 9 && *byte > 1) {
            return Err(DecodeError::VarintOverflow { pc });
        }
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::VarintOverflow { pc })
}

/// Iterates over the instructions of a program, header excluded.
///
/// Stops after the first error.
pub struct ProgramDecoder<'a> {
    program: &'a [u8],
    version: u8,
    next: usize,
    failed: bool,
}

impl<'a> ProgramDecoder<'a> {
    /// Validates the version header and positions after it.
    pub fn new(program: &'a [u8]) -> Result<Self, DecodeError> {
        let (version, header) = read_version(program)?;
        Ok(Self {
            program,
            version,
            next: header,
            failed: false,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    fn decode_at(&self, pc: usize) -> Result<Op, DecodeError> {
        let byte = self.program[pc];
        let code = OpCode::from_u8(byte).ok_or(DecodeError::InvalidOpCode { pc, byte })?;
        if code.min_version() > self.version {
            return Err(DecodeError::OpcodeUnavailable {
                pc,
                name: code.name(),
                required: code.min_version(),
                version: self.version,
            });
        }

        let rest = &self.program[pc + 1..];
        let truncated = DecodeError::Truncated {
            pc,
            name: code.name(),
        };
        let (operand, len) = match code.immediate() {
            Immediate::None => (Operand::None, 0),
            Immediate::Field => (Operand::Field(*rest.first().ok_or(truncated)?), 1),
            Immediate::Slot => (Operand::Slot(*rest.first().ok_or(truncated)?), 1),
            Immediate::FieldIndex => match rest {
                [field, index, ..] => (Operand::FieldIndex(*field, *index), 2),
                _ => return Err(truncated),
            },
            Immediate::Offset => match rest {
                [hi, lo, ..] => (Operand::Offset(i16::from_be_bytes([*hi, *lo])), 2),
                _ => return Err(truncated),
            },
            Immediate::VarUint => {
                let (value, len) = read_uvarint(rest, pc).map_err(|_| truncated)?;
                (Operand::Uint(value), len)
            }
            Immediate::VarBytes => {
                let (data_len, len) = read_uvarint(rest, pc).map_err(|_| truncated.clone())?;
                let end = (len as u64).checked_add(data_len).ok_or(truncated.clone())?;
                if end > rest.len() as u64 {
                    return Err(truncated);
                }
                (
                    Operand::Bytes(rest[len..end as usize].to_vec()),
                    end as usize,
                )
            }
        };

        Ok(Op {
            pc,
            code,
            operand,
            size: 1 + len,
        })
    }
}

impl Iterator for ProgramDecoder<'_> {
    type Item = Result<Op, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.program.len() {
            return None;
        }
        match self.decode_at(self.next) {
            Ok(op) => {
                self.next = op.next_pc();
                Some(Ok(op))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

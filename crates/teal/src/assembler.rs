//! Assembles a [`Program`] into AVM bytecode.

use crate::error::{TealError, TealResult};
use crate::instruction::{uvarint_len, write_uvarint, Instruction};
use crate::op_code::{Immediate, OpCode};
use crate::program::Program;
use avm_config::{MAX_APP_PROGRAM_LEN, MAX_BYTE_SLICE_LEN, MAX_TEAL_VERSION, MIN_TEAL_VERSION};
use std::collections::HashMap;
use tracing::debug;

/// First version that allows branches to earlier instructions.
pub const BACKWARD_BRANCH_VERSION: u8 = 4;

/// Assembles `program` into bytecode.
///
/// The output starts with the version as a uvarint. Branch and `callsub`
/// targets are encoded as 2-byte big-endian signed offsets from the end of
/// the branching instruction.
pub fn assemble(program: &Program) -> TealResult<Vec<u8>> {
    let version = program.version;
    if !(MIN_TEAL_VERSION..=MAX_TEAL_VERSION).contains(&version) {
        return Err(TealError::UnsupportedVersion {
            version,
            min: MIN_TEAL_VERSION,
            max: MAX_TEAL_VERSION,
        });
    }

    let labels = resolve_labels(program)?;

    let mut out = Vec::new();
    write_uvarint(&mut out, version as u64);

    for instruction in &program.instructions {
        check_version(instruction, version)?;
        let pc = out.len();
        match instruction {
            Instruction::Label(_) => {}
            Instruction::Op(op) => {
                if op.immediate() != Immediate::None {
                    return Err(TealError::MissingImmediate(op.name().to_string()));
                }
                out.push(*op as u8);
            }
            Instruction::Int(value) => {
                out.push(OpCode::PushInt as u8);
                write_uvarint(&mut out, *value);
            }
            Instruction::OnCompletion(on_complete) => {
                out.push(OpCode::PushInt as u8);
                write_uvarint(&mut out, *on_complete as u64);
            }
            Instruction::Bytes(bytes) => {
                if bytes.len() > MAX_BYTE_SLICE_LEN {
                    return Err(TealError::BytesTooLong {
                        len: bytes.len(),
                        max: MAX_BYTE_SLICE_LEN,
                    });
                }
                out.push(OpCode::PushBytes as u8);
                write_uvarint(&mut out, bytes.len() as u64);
                out.extend_from_slice(bytes);
            }
            Instruction::Method(signature) => {
                let selector = avm_abi::selector_of(signature);
                out.push(OpCode::PushBytes as u8);
                write_uvarint(&mut out, selector.len() as u64);
                out.extend_from_slice(&selector);
            }
            Instruction::Txn(field) => {
                out.push(OpCode::Txn as u8);
                out.push(*field as u8);
            }
            Instruction::Txna(field, index) => {
                out.push(OpCode::Txna as u8);
                out.push(*field as u8);
                out.push(*index);
            }
            Instruction::Global(field) => {
                out.push(OpCode::Global as u8);
                out.push(*field as u8);
            }
            Instruction::Load(slot) => {
                out.push(OpCode::Load as u8);
                out.push(*slot);
            }
            Instruction::Store(slot) => {
                out.push(OpCode::Store as u8);
                out.push(*slot);
            }
            Instruction::Branch(op, label) => {
                if !op.is_branch() {
                    return Err(TealError::NotBranch(op.name().to_string()));
                }
                let offset = branch_offset(&labels, label, pc, version)?;
                out.push(*op as u8);
                out.extend_from_slice(&offset.to_be_bytes());
            }
            Instruction::Callsub(label) => {
                let offset = branch_offset(&labels, label, pc, version)?;
                out.push(OpCode::Callsub as u8);
                out.extend_from_slice(&offset.to_be_bytes());
            }
        }
    }

    if out.len() > MAX_APP_PROGRAM_LEN {
        return Err(TealError::ProgramTooLong {
            len: out.len(),
            max: MAX_APP_PROGRAM_LEN,
        });
    }

    debug!(
        target: "avm_teal::assembler",
        version,
        instructions = program.instructions.len(),
        bytes = out.len(),
        "assembled program"
    );
    Ok(out)
}

/// Maps each label to the pc of the instruction that follows it.
fn resolve_labels(program: &Program) -> TealResult<HashMap<&str, usize>> {
    let mut labels = HashMap::new();
    let mut pc = uvarint_len(program.version as u64);
    for instruction in &program.instructions {
        if let Instruction::Label(name) = instruction {
            if labels.insert(name.as_str(), pc).is_some() {
                return Err(TealError::DuplicateLabel(name.clone()));
            }
        }
        pc += instruction.encoded_len();
    }
    Ok(labels)
}

fn branch_offset(
    labels: &HashMap<&str, usize>,
    label: &str,
    pc: usize,
    version: u8,
) -> TealResult<i16> {
    let target = *labels
        .get(label)
        .ok_or_else(|| TealError::UnknownLabel(label.to_string()))?;
    let offset = target as i64 - (pc as i64 + 3);
    if offset < 0 && version < BACKWARD_BRANCH_VERSION {
        return Err(TealError::BackwardBranch {
            label: label.to_string(),
            version,
        });
    }
    i16::try_from(offset).map_err(|_| TealError::BranchOutOfRange {
        label: label.to_string(),
        offset,
    })
}

fn check_version(instruction: &Instruction, version: u8) -> TealResult<()> {
    let Some(op) = instruction.opcode() else {
        return Ok(());
    };
    if op.min_version() > version {
        return Err(TealError::opcode_unavailable(op.name(), op.min_version(), version));
    }
    match instruction {
        Instruction::Txn(field) | Instruction::Txna(field, _) if field.min_version() > version => {
            Err(TealError::opcode_unavailable(
                instruction.to_string(),
                field.min_version(),
                version,
            ))
        }
        Instruction::Global(field) if field.min_version() > version => Err(
            TealError::opcode_unavailable(instruction.to_string(), field.min_version(), version),
        ),
        _ => Ok(()),
    }
}

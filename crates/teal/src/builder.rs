//! Fluent construction of TEAL programs.

use crate::fields::{GlobalField, OnComplete, TxnField};
use crate::instruction::Instruction;
use crate::op_code::OpCode;
use crate::program::Program;

/// Helps construct programs instruction by instruction.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    next_label: usize,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits an already built instruction.
    pub fn emit(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Emits an opcode without immediates.
    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.emit(Instruction::Op(op))
    }

    pub fn emit_int(&mut self, value: u64) -> &mut Self {
        self.emit(Instruction::Int(value))
    }

    pub fn emit_on_completion(&mut self, on_complete: OnComplete) -> &mut Self {
        self.emit(Instruction::OnCompletion(on_complete))
    }

    pub fn emit_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.emit(Instruction::Bytes(bytes.to_vec()))
    }

    /// Emits the selector of `signature` as a byte constant.
    pub fn emit_method(&mut self, signature: &str) -> &mut Self {
        self.emit(Instruction::Method(signature.to_string()))
    }

    pub fn emit_txn(&mut self, field: TxnField) -> &mut Self {
        self.emit(Instruction::Txn(field))
    }

    pub fn emit_txna(&mut self, field: TxnField, index: u8) -> &mut Self {
        self.emit(Instruction::Txna(field, index))
    }

    pub fn emit_global(&mut self, field: GlobalField) -> &mut Self {
        self.emit(Instruction::Global(field))
    }

    pub fn emit_load(&mut self, slot: u8) -> &mut Self {
        self.emit(Instruction::Load(slot))
    }

    pub fn emit_store(&mut self, slot: u8) -> &mut Self {
        self.emit(Instruction::Store(slot))
    }

    /// Emits `bnz`, `bz` or `b` to `label`. Branch validity is checked at assembly.
    pub fn emit_jump(&mut self, op: OpCode, label: &str) -> &mut Self {
        self.emit(Instruction::Branch(op, label.to_string()))
    }

    pub fn emit_callsub(&mut self, label: &str) -> &mut Self {
        self.emit(Instruction::Callsub(label.to_string()))
    }

    pub fn emit_label(&mut self, label: &str) -> &mut Self {
        self.emit(Instruction::Label(label.to_string()))
    }

    /// Allocates a fresh label name such as `main_l1`.
    pub fn new_label(&mut self, prefix: &str) -> String {
        self.next_label += 1;
        format!("{}_l{}", prefix, self.next_label)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Appends every instruction of `other`.
    pub fn extend(&mut self, other: ProgramBuilder) -> &mut Self {
        self.instructions.extend(other.instructions);
        self
    }

    pub fn build(self, version: u8) -> Program {
        Program::new(version, self.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let mut builder = ProgramBuilder::new();
        let label = builder.new_label("main");
        builder
            .emit_txn(TxnField::NumAppArgs)
            .emit_int(0)
            .emit_opcode(OpCode::Eq)
            .emit_jump(OpCode::Bnz, &label)
            .emit_opcode(OpCode::Err)
            .emit_label(&label)
            .emit_int(1)
            .emit_opcode(OpCode::Return);

        assert_eq!(label, "main_l1");
        assert_eq!(builder.len(), 8);
        let program = builder.build(6);
        assert_eq!(
            program.to_teal(),
            "#pragma version 6\ntxn NumAppArgs\nint 0\n==\nbnz main_l1\nerr\nmain_l1:\nint 1\nreturn"
        );
    }

    #[test]
    fn test_labels_are_unique() {
        let mut builder = ProgramBuilder::new();
        let a = builder.new_label("main");
        let b = builder.new_label("main");
        assert_ne!(a, b);
    }
}

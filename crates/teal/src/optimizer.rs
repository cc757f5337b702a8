//! Peephole optimizations over the program model.

use crate::instruction::Instruction;
use crate::program::Program;
use std::collections::HashMap;
use tracing::debug;

/// Removes `store n; load n` pairs where slot `n` is stored and loaded
/// exactly once in the whole program.
///
/// Removing a pair can expose another adjacent pair (`store 4; store 3;
/// load 3; load 4`), which is removed in the same pass. Returns the number
/// of pairs removed.
pub fn optimize_scratch_slots(program: &mut Program) -> usize {
    let mut stores: HashMap<u8, usize> = HashMap::new();
    let mut loads: HashMap<u8, usize> = HashMap::new();
    for instruction in &program.instructions {
        match instruction {
            Instruction::Store(slot) => *stores.entry(*slot).or_default() += 1,
            Instruction::Load(slot) => *loads.entry(*slot).or_default() += 1,
            _ => {}
        }
    }

    let single_use = |slot: &u8| stores.get(slot) == Some(&1) && loads.get(slot) == Some(&1);

    let mut removed = 0;
    let mut out: Vec<Instruction> = Vec::with_capacity(program.instructions.len());
    for instruction in program.instructions.drain(..) {
        if let Instruction::Load(slot) = &instruction {
            if single_use(slot) && out.last() == Some(&Instruction::Store(*slot)) {
                out.pop();
                removed += 1;
                continue;
            }
        }
        out.push(instruction);
    }
    program.instructions = out;

    debug!(target: "avm_teal::optimizer", removed, "scratch slot optimization");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op_code::OpCode;

    fn program(instructions: Vec<Instruction>) -> Program {
        Program::new(6, instructions)
    }

    #[test]
    fn test_removes_single_use_pair() {
        let mut p = program(vec![
            Instruction::Op(OpCode::Add),
            Instruction::Store(5),
            Instruction::Load(5),
            Instruction::Op(OpCode::Retsub),
        ]);
        assert_eq!(optimize_scratch_slots(&mut p), 1);
        assert_eq!(
            p.instructions,
            vec![Instruction::Op(OpCode::Add), Instruction::Op(OpCode::Retsub)]
        );
    }

    #[test]
    fn test_nested_pairs() {
        let mut p = program(vec![
            Instruction::Store(4),
            Instruction::Store(3),
            Instruction::Load(3),
            Instruction::Load(4),
            Instruction::Op(OpCode::Add),
        ]);
        assert_eq!(optimize_scratch_slots(&mut p), 2);
        assert_eq!(p.instructions, vec![Instruction::Op(OpCode::Add)]);
    }

    #[test]
    fn test_keeps_reused_slots() {
        let original = vec![
            Instruction::Store(1),
            Instruction::Load(1),
            Instruction::Load(1),
        ];
        let mut p = program(original.clone());
        assert_eq!(optimize_scratch_slots(&mut p), 0);
        assert_eq!(p.instructions, original);
    }

    #[test]
    fn test_keeps_pairs_split_by_label() {
        let original = vec![
            Instruction::Store(1),
            Instruction::Label("x".into()),
            Instruction::Load(1),
        ];
        let mut p = program(original.clone());
        assert_eq!(optimize_scratch_slots(&mut p), 0);
        assert_eq!(p.instructions, original);
    }
}

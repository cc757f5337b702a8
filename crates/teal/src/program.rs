//! Program model.

use crate::instruction::Instruction;
use std::fmt;

/// A TEAL program: a version and its instructions in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub version: u8,
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(version: u8, instructions: Vec<Instruction>) -> Self {
        Self {
            version,
            instructions,
        }
    }

    /// Renders TEAL source, starting with the version pragma.
    pub fn to_teal(&self) -> String {
        let mut lines = Vec::with_capacity(self.instructions.len() + 1);
        lines.push(format!("#pragma version {}", self.version));
        lines.extend(self.instructions.iter().map(|i| i.to_string()));
        lines.join("\n")
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Label(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Instructions excluding labels.
    pub fn op_count(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_label()).count()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_teal())
    }
}

//! Execution outcome.

use std::fmt;

/// State of an [`ExecutionEngine`](crate::ExecutionEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VmState {
    /// Not started or still running.
    #[default]
    None,
    /// The program finished with a non-zero uint64.
    Approved,
    /// The program finished with zero.
    Rejected,
    /// The program aborted. See [`ExecutionEngine::fault`](crate::ExecutionEngine::fault).
    Fault,
}

impl VmState {
    pub fn is_approved(self) -> bool {
        self == VmState::Approved
    }

    pub fn is_finished(self) -> bool {
        self != VmState::None
    }
}

impl fmt::Display for VmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VmState::None => "NONE",
            VmState::Approved => "APPROVED",
            VmState::Rejected => "REJECTED",
            VmState::Fault => "FAULT",
        };
        f.write_str(name)
    }
}

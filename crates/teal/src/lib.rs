//! # AVM TEAL
//!
//! Program model for the Algorand Virtual Machine.
//!
//! ## Components
//!
//! - [`OpCode`]: the supported opcodes with their byte values, mnemonics,
//!   minimum versions and costs
//! - [`TxnField`], [`GlobalField`], [`OnComplete`]: field and action enums
//! - [`Instruction`] / [`Program`]: TEAL source as data, rendered with
//!   [`Program::to_teal`]
//! - [`ProgramBuilder`]: fluent program construction
//! - [`assemble`]: bytecode assembly with label resolution
//! - [`optimize_scratch_slots`]: removal of redundant scratch round-trips
//!
//! ## Example
//!
//! ```rust
//! use avm_teal::{assemble, OpCode, ProgramBuilder};
//!
//! let mut builder = ProgramBuilder::new();
//! builder.emit_int(0).emit_opcode(OpCode::Return);
//! let program = builder.build(6);
//!
//! assert_eq!(program.to_teal(), "#pragma version 6\nint 0\nreturn");
//! assert_eq!(assemble(&program).unwrap(), vec![0x06, 0x81, 0x00, 0x43]);
//! ```

pub mod assembler;
pub mod builder;
pub mod error;
pub mod fields;
pub mod instruction;
pub mod op_code;
pub mod optimizer;
pub mod program;

pub use assembler::{assemble, BACKWARD_BRANCH_VERSION};
pub use builder::ProgramBuilder;
pub use error::{TealError, TealResult};
pub use fields::{GlobalField, OnComplete, TxnField};
pub use instruction::{uvarint_len, write_uvarint, Instruction};
pub use op_code::{Immediate, OpCode};
pub use optimizer::optimize_scratch_slots;
pub use program::Program;

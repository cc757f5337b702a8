//! # AVM Virtual Machine
//!
//! Bytecode evaluator for Algorand Virtual Machine application programs and
//! an in-memory ledger that hosts applications.
//!
//! ## Architecture
//!
//! - **ProgramDecoder**: iterates bytecode as decoded [`Op`]s
//! - **ExecutionEngine**: runs one program against an [`ExecutionContext`]
//! - **JumpTable**: opcode handlers grouped by concern
//! - **EvaluationStack**: bounded stack of [`StackValue`]s
//! - **Ledger**: applies application-call transactions
//!
//! ## Example
//!
//! ```rust
//! use avm_teal::{assemble, OpCode, ProgramBuilder};
//! use avm_vm::{ExecutionContext, ExecutionEngine, VmState};
//!
//! let mut builder = ProgramBuilder::new();
//! builder.emit_int(2).emit_int(3).emit_opcode(OpCode::Add);
//! let bytes = assemble(&builder.build(6)).unwrap();
//!
//! let mut engine = ExecutionEngine::new(&bytes, ExecutionContext::default());
//! assert_eq!(engine.execute(), VmState::Approved);
//! ```

pub mod context;
pub mod decode;
pub mod error;
pub mod evaluation_stack;
pub mod execution_engine;
pub mod jump_table;
pub mod ledger;
pub mod stack_value;
pub mod vm_state;

pub use context::{Address, ExecutionContext, DEFAULT_MIN_TXN_FEE};
pub use decode::{Op, Operand, ProgramDecoder};
pub use error::{DecodeError, VmError, VmResult};
pub use evaluation_stack::EvaluationStack;
pub use execution_engine::{ExecutionEngine, ExecutionEngineLimits};
pub use jump_table::{InstructionHandler, JumpTable};
pub use ledger::{Application, ApplicationCall, Ledger, LedgerError, LedgerResult, Receipt};
pub use stack_value::StackValue;
pub use vm_state::VmState;

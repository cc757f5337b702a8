//! # AVM Router
//!
//! Declarative compiler for ARC-4 applications. A [`Router`] collects ABI
//! methods and bare-call actions and compiles them into an approval program,
//! a clear program and the `contract.json` descriptor.
//!
//! ## Example
//!
//! ```rust
//! use avm_abi::{AbiType, Argument, Returns};
//! use avm_router::{BareCallActions, Expr, OnCompleteAction, OptimizeOptions, Router};
//!
//! let mut router = Router::new(
//!     "adder",
//!     BareCallActions {
//!         no_op: OnCompleteAction::create_only(Expr::Approve),
//!         ..Default::default()
//!     },
//! );
//! router
//!     .method(
//!         "add",
//!         vec![Argument::new("a", AbiType::UINT64), Argument::new("b", AbiType::UINT64)],
//!         Returns::value(AbiType::UINT64),
//!         "sum a and b",
//!         Expr::arg(0) + Expr::arg(1),
//!     )
//!     .unwrap();
//!
//! let compiled = router.compile_program(6, OptimizeOptions::new(true)).unwrap();
//! assert!(compiled.approval.to_teal().starts_with("#pragma version 6"));
//! assert_eq!(compiled.contract.methods.len(), 1);
//! ```

pub mod call_config;
pub mod error;
pub mod expr;
pub mod router;

pub use call_config::{BareCallActions, CallConfig, OnCompleteAction};
pub use error::{RouterError, RouterResult};
pub use expr::{Expr, TealType};
pub use router::{CompiledContract, OptimizeOptions, Router, MAX_METHOD_ARGS};

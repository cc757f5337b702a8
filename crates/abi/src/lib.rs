//! # AVM ABI
//!
//! ARC-4 application binary interface for contracts running on the Algorand
//! Virtual Machine.
//!
//! ## Components
//!
//! - [`AbiType`]: canonical type names (`uint64`, `address`, `byte[]`, ...)
//! - [`Method`]: method descriptions, signatures and 4-byte selectors
//! - [`AbiValue`]: encoding and decoding of argument and return values
//! - [`Contract`]: the JSON interface descriptor shared with SDKs
//!
//! ## Example
//!
//! ```rust
//! use avm_abi::{AbiType, AbiValue, Argument, Method, Returns};
//!
//! let add = Method::new(
//!     "add",
//!     vec![Argument::new("a", AbiType::UINT64), Argument::new("b", AbiType::UINT64)],
//!     Returns::value(AbiType::UINT64),
//! );
//! assert_eq!(add.signature(), "add(uint64,uint64)uint64");
//!
//! let encoded = AbiValue::uint64(5).encode().unwrap();
//! assert_eq!(encoded, 5u64.to_be_bytes());
//! ```

pub mod contract;
pub mod error;
pub mod method;
pub mod types;
pub mod value;

pub use contract::{Contract, NetworkInfo};
pub use error::{AbiError, AbiResult};
pub use method::{selector_of, Argument, Method, ReturnType, Returns, Selector, SELECTOR_SIZE};
pub use types::AbiType;
pub use value::{return_value, AbiValue};

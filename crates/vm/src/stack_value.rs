//! Values held on the evaluation stack and in scratch space.

use crate::error::{VmError, VmResult};
use std::fmt;

/// An AVM value: either a uint64 or a byte slice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackValue {
    Uint64(u64),
    Bytes(Vec<u8>),
}

impl Default for StackValue {
    fn default() -> Self {
        StackValue::Uint64(0)
    }
}

impl StackValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StackValue::Uint64(_) => "uint64",
            StackValue::Bytes(_) => "[]byte",
        }
    }

    pub fn as_u64(&self) -> VmResult<u64> {
        match self {
            StackValue::Uint64(value) => Ok(*value),
            other => Err(VmError::type_mismatch("uint64", other.type_name())),
        }
    }

    pub fn as_bytes(&self) -> VmResult<&[u8]> {
        match self {
            StackValue::Bytes(bytes) => Ok(bytes),
            other => Err(VmError::type_mismatch("[]byte", other.type_name())),
        }
    }

    pub fn into_bytes(self) -> VmResult<Vec<u8>> {
        match self {
            StackValue::Bytes(bytes) => Ok(bytes),
            other => Err(VmError::type_mismatch("[]byte", other.type_name())),
        }
    }
}

impl From<u64> for StackValue {
    fn from(value: u64) -> Self {
        StackValue::Uint64(value)
    }
}

impl From<bool> for StackValue {
    fn from(value: bool) -> Self {
        StackValue::Uint64(value as u64)
    }
}

impl From<Vec<u8>> for StackValue {
    fn from(value: Vec<u8>) -> Self {
        StackValue::Bytes(value)
    }
}

impl From<&[u8]> for StackValue {
    fn from(value: &[u8]) -> Self {
        StackValue::Bytes(value.to_vec())
    }
}

impl fmt::Display for StackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackValue::Uint64(value) => write!(f, "{}", value),
            StackValue::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}

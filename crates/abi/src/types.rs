//! ARC-4 type names.

use crate::error::{AbiError, AbiResult};
use avm_config::ADDRESS_SIZE;
use std::fmt;
use std::str::FromStr;

/// An ARC-4 type as it appears in method signatures and `contract.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AbiType {
    /// `uintN`, 8 <= N <= 512, N % 8 == 0.
    Uint(u16),
    /// `byte`, an alias for `uint8`.
    Byte,
    /// `bool`, one byte with the value in the high bit.
    Bool,
    /// `address`, 32 raw bytes.
    Address,
    /// `string`, uint16 length prefix followed by UTF-8 bytes.
    String,
    /// `byte[N]`.
    StaticBytes(u16),
    /// `byte[]`, uint16 length prefix followed by the bytes.
    DynamicBytes,
}

impl AbiType {
    /// `uint64`, the only integer width the calculator uses.
    pub const UINT64: AbiType = AbiType::Uint(64);

    /// Returns the encoded size if it does not depend on the value.
    pub fn static_size(&self) -> Option<usize> {
        match self {
            AbiType::Uint(bits) => Some(*bits as usize / 8),
            AbiType::Byte | AbiType::Bool => Some(1),
            AbiType::Address => Some(ADDRESS_SIZE),
            AbiType::StaticBytes(len) => Some(*len as usize),
            AbiType::String | AbiType::DynamicBytes => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.static_size().is_none()
    }

    fn parse_uint_width(digits: &str, source: &str) -> AbiResult<u16> {
        let bits: u16 = digits
            .parse()
            .map_err(|_| AbiError::InvalidType(source.to_string()))?;
        if !(8..=512).contains(&bits) || bits % 8 != 0 {
            return Err(AbiError::InvalidType(source.to_string()));
        }
        Ok(bits)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint(bits) => write!(f, "uint{}", bits),
            AbiType::Byte => write!(f, "byte"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Address => write!(f, "address"),
            AbiType::String => write!(f, "string"),
            AbiType::StaticBytes(len) => write!(f, "byte[{}]", len),
            AbiType::DynamicBytes => write!(f, "byte[]"),
        }
    }
}

impl FromStr for AbiType {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        match s {
            "byte" => return Ok(AbiType::Byte),
            "bool" => return Ok(AbiType::Bool),
            "address" => return Ok(AbiType::Address),
            "string" => return Ok(AbiType::String),
            "byte[]" => return Ok(AbiType::DynamicBytes),
            _ => {}
        }

        if let Some(digits) = s.strip_prefix("uint") {
            return Self::parse_uint_width(digits, s).map(AbiType::Uint);
        }

        if let Some(len) = s.strip_prefix("byte[").and_then(|rest| rest.strip_suffix(']')) {
            let len: u16 = len
                .parse()
                .map_err(|_| AbiError::InvalidType(s.to_string()))?;
            return Ok(AbiType::StaticBytes(len));
        }

        Err(AbiError::InvalidType(s.to_string()))
    }
}

impl TryFrom<String> for AbiType {
    type Error = AbiError;

    fn try_from(value: String) -> AbiResult<Self> {
        value.parse()
    }
}

impl From<AbiType> for String {
    fn from(value: AbiType) -> Self {
        value.to_string()
    }
}

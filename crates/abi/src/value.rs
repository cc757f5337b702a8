//! ARC-4 value encoding.

use crate::error::{AbiError, AbiResult};
use crate::types::AbiType;
use avm_config::{ADDRESS_SIZE, ARC4_RETURN_PREFIX};

/// A concrete ARC-4 value. Integer widths above 64 bits are not representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint { bits: u16, value: u64 },
    Byte(u8),
    Bool(bool),
    Address([u8; ADDRESS_SIZE]),
    Bytes(Vec<u8>),
    String(String),
}

impl AbiValue {
    pub fn uint64(value: u64) -> Self {
        AbiValue::Uint { bits: 64, value }
    }

    /// The ARC-4 type this value encodes as.
    pub fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Uint { bits, .. } => AbiType::Uint(*bits),
            AbiValue::Byte(_) => AbiType::Byte,
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::Bytes(_) => AbiType::DynamicBytes,
            AbiValue::String(_) => AbiType::String,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AbiValue::Uint { value, .. } => Some(*value),
            AbiValue::Byte(value) => Some(*value as u64),
            _ => None,
        }
    }

    /// Encodes the value. Integers are big-endian at their declared width.
    pub fn encode(&self) -> AbiResult<Vec<u8>> {
        match self {
            AbiValue::Uint { bits, value } => {
                let width = *bits as usize / 8;
                if *bits > 64 && width > 8 {
                    let mut out = vec![0u8; width - 8];
                    out.extend_from_slice(&value.to_be_bytes());
                    return Ok(out);
                }
                if *bits < 64 && *value >> bits != 0 {
                    return Err(AbiError::OutOfRange {
                        kind: self.abi_type().to_string(),
                        value: value.to_string(),
                    });
                }
                Ok(value.to_be_bytes()[8 - width..].to_vec())
            }
            AbiValue::Byte(value) => Ok(vec![*value]),
            AbiValue::Bool(value) => Ok(vec![if *value { 0x80 } else { 0x00 }]),
            AbiValue::Address(bytes) => Ok(bytes.to_vec()),
            AbiValue::Bytes(bytes) => Self::encode_dynamic(bytes, "byte[]"),
            AbiValue::String(s) => Self::encode_dynamic(s.as_bytes(), "string"),
        }
    }

    fn encode_dynamic(bytes: &[u8], kind: &str) -> AbiResult<Vec<u8>> {
        let len = u16::try_from(bytes.len()).map_err(|_| AbiError::OutOfRange {
            kind: kind.to_string(),
            value: format!("{} bytes", bytes.len()),
        })?;
        let mut out = Vec::with_capacity(bytes.len() + 2);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
        Ok(out)
    }

    /// Decodes a value of the given type, requiring an exact length.
    pub fn decode(kind: &AbiType, data: &[u8]) -> AbiResult<Self> {
        let expect_len = |expected: usize| -> AbiResult<()> {
            if data.len() != expected {
                return Err(AbiError::InvalidLength {
                    kind: kind.to_string(),
                    expected,
                    actual: data.len(),
                });
            }
            Ok(())
        };

        match kind {
            AbiType::Uint(bits) => {
                let width = *bits as usize / 8;
                expect_len(width)?;
                let (high, low) = data.split_at(width.saturating_sub(8));
                if high.iter().any(|b| *b != 0) {
                    return Err(AbiError::OutOfRange {
                        kind: kind.to_string(),
                        value: format!("0x{}", hex::encode(data)),
                    });
                }
                let mut buf = [0u8; 8];
                buf[8 - low.len()..].copy_from_slice(low);
                Ok(AbiValue::Uint {
                    bits: *bits,
                    value: u64::from_be_bytes(buf),
                })
            }
            AbiType::Byte => {
                expect_len(1)?;
                Ok(AbiValue::Byte(data[0]))
            }
            AbiType::Bool => {
                expect_len(1)?;
                Ok(AbiValue::Bool(data[0] & 0x80 != 0))
            }
            AbiType::Address => {
                expect_len(ADDRESS_SIZE)?;
                let mut bytes = [0u8; ADDRESS_SIZE];
                bytes.copy_from_slice(data);
                Ok(AbiValue::Address(bytes))
            }
            AbiType::StaticBytes(len) => {
                expect_len(*len as usize)?;
                Ok(AbiValue::Bytes(data.to_vec()))
            }
            AbiType::DynamicBytes => Ok(AbiValue::Bytes(Self::decode_dynamic(kind, data)?.to_vec())),
            AbiType::String => {
                let bytes = Self::decode_dynamic(kind, data)?;
                String::from_utf8(bytes.to_vec())
                    .map(AbiValue::String)
                    .map_err(|_| AbiError::InvalidType(format!("{} is not valid UTF-8", kind)))
            }
        }
    }

    fn decode_dynamic<'a>(kind: &AbiType, data: &'a [u8]) -> AbiResult<&'a [u8]> {
        if data.len() < 2 {
            return Err(AbiError::InvalidLength {
                kind: kind.to_string(),
                expected: 2,
                actual: data.len(),
            });
        }
        let len = u16::from_be_bytes([data[0], data[1]]) as usize;
        if data.len() != len + 2 {
            return Err(AbiError::InvalidLength {
                kind: kind.to_string(),
                expected: len + 2,
                actual: data.len(),
            });
        }
        Ok(&data[2..])
    }
}

/// Finds the ARC-4 return payload in a list of logs (the last prefixed entry wins).
pub fn return_value(logs: &[Vec<u8>]) -> Option<&[u8]> {
    logs.iter()
        .rev()
        .find(|log| log.starts_with(&ARC4_RETURN_PREFIX))
        .map(|log| &log[ARC4_RETURN_PREFIX.len()..])
}

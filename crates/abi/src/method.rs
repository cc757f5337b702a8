//! ARC-4 method descriptions and selectors.

use crate::error::{AbiError, AbiResult};
use crate::types::AbiType;
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

/// Size of a method selector in bytes.
pub const SELECTOR_SIZE: usize = 4;

/// First four bytes of SHA-512/256 over a method signature.
pub type Selector = [u8; SELECTOR_SIZE];

/// A method argument.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub kind: AbiType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, kind: AbiType) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            desc: None,
        }
    }
}

/// Return type of a method; `void` when nothing is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReturnType {
    Void,
    Value(AbiType),
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => write!(f, "void"),
            ReturnType::Value(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for ReturnType {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        if s == "void" {
            Ok(ReturnType::Void)
        } else {
            s.parse().map(ReturnType::Value)
        }
    }
}

impl TryFrom<String> for ReturnType {
    type Error = AbiError;

    fn try_from(value: String) -> AbiResult<Self> {
        value.parse()
    }
}

impl From<ReturnType> for String {
    fn from(value: ReturnType) -> Self {
        value.to_string()
    }
}

/// The `returns` object of a method.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Returns {
    #[serde(rename = "type")]
    pub kind: ReturnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Returns {
    pub fn void() -> Self {
        Self {
            kind: ReturnType::Void,
            desc: None,
        }
    }

    pub fn value(kind: AbiType) -> Self {
        Self {
            kind: ReturnType::Value(kind),
            desc: None,
        }
    }
}

/// A callable ABI method.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Method {
    pub name: String,
    pub args: Vec<Argument>,
    pub returns: Returns,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<Argument>, returns: Returns) -> Self {
        Self {
            name: name.into(),
            args,
            returns,
            desc: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Canonical signature, e.g. `add(uint64,uint64)uint64`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|arg| arg.kind.to_string()).collect();
        format!("{}({}){}", self.name, args.join(","), self.returns.kind)
    }

    pub fn selector(&self) -> Selector {
        selector_of(&self.signature())
    }

    /// Parses a bare signature. Arguments are named `arg0`, `arg1`, ...
    pub fn from_signature(signature: &str) -> AbiResult<Self> {
        let invalid = || AbiError::InvalidSignature(signature.to_string());

        let open = signature.find('(').ok_or_else(invalid)?;
        let close = signature.rfind(')').ok_or_else(invalid)?;
        if close < open {
            return Err(invalid());
        }

        let name = &signature[..open];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }

        let arg_list = &signature[open + 1..close];
        let args = if arg_list.is_empty() {
            Vec::new()
        } else {
            arg_list
                .split(',')
                .enumerate()
                .map(|(i, kind)| Ok(Argument::new(format!("arg{}", i), kind.parse()?)))
                .collect::<AbiResult<Vec<_>>>()?
        };

        let returns = Returns {
            kind: signature[close + 1..].parse().map_err(|_| invalid())?,
            desc: None,
        };

        Ok(Self::new(name, args, returns))
    }
}

/// Computes the selector of an arbitrary signature string.
pub fn selector_of(signature: &str) -> Selector {
    let digest = Sha512_256::digest(signature.as_bytes());
    let mut selector = [0u8; SELECTOR_SIZE];
    selector.copy_from_slice(&digest[..SELECTOR_SIZE]);
    selector
}

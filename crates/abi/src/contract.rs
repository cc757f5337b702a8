//! ARC-4 contract descriptor (`contract.json`).

use crate::error::{AbiError, AbiResult};
use crate::method::{Method, Selector};
use std::collections::{BTreeMap, HashSet};

/// Deployment of a contract on one network, keyed by genesis hash in [`Contract::networks`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NetworkInfo {
    #[serde(rename = "appID")]
    pub app_id: u64,
}

/// Interface descriptor consumed by SDKs and clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Contract {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkInfo>,
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: None,
            methods: Vec::new(),
            networks: BTreeMap::new(),
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn find_by_selector(&self, selector: &Selector) -> Option<&Method> {
        self.methods
            .iter()
            .find(|method| &method.selector() == selector)
    }

    /// Checks the name and that no two methods share a signature or selector.
    pub fn validate(&self) -> AbiResult<()> {
        if self.name.is_empty() {
            return Err(AbiError::InvalidContract(
                "contract name cannot be empty".to_string(),
            ));
        }

        let mut selectors = HashSet::new();
        for method in &self.methods {
            if !selectors.insert(method.selector()) {
                return Err(AbiError::InvalidContract(format!(
                    "duplicate method {}",
                    method.signature()
                )));
            }
        }

        Ok(())
    }

    /// Pretty JSON with a two-space indent.
    pub fn to_json_pretty(&self) -> AbiResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> AbiResult<Self> {
        let contract: Contract = serde_json::from_str(json)?;
        contract.validate()?;
        Ok(contract)
    }
}

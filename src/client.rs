//! ABI clients for deployed applications.
//!
//! [`AppClient`] drives any compiled router through its `contract.json`
//! description. [`CalculatorClient`] adds typed calculator methods on top.

use crate::error::{CalculatorError, CalculatorResult};
use avm_abi::{AbiValue, Contract, ReturnType};
use avm_router::CompiledContract;
use avm_teal::OnComplete;
use avm_vm::{Address, ApplicationCall, Ledger, Receipt};
use tracing::debug;

/// Client for one application deployed on an owned [`Ledger`].
#[derive(Debug)]
pub struct AppClient {
    ledger: Ledger,
    contract: Contract,
    app_id: u64,
    creator: Address,
}

impl AppClient {
    /// Deploys `compiled` on a fresh ledger with `creator` as the sender.
    pub fn deploy(compiled: &CompiledContract, creator: Address) -> CalculatorResult<Self> {
        Self::deploy_on(Ledger::new(), compiled, creator)
    }

    /// Deploys `compiled` on an existing ledger.
    pub fn deploy_on(
        mut ledger: Ledger,
        compiled: &CompiledContract,
        creator: Address,
    ) -> CalculatorResult<Self> {
        let receipt = ledger.apply(&ApplicationCall::create(
            creator,
            compiled.approval_bytecode.clone(),
            compiled.clear_bytecode.clone(),
        ))?;
        debug!(app_id = receipt.app_id, cost = receipt.cost, "deployed application");

        Ok(Self {
            ledger,
            contract: compiled.contract.clone(),
            app_id: receipt.app_id,
            creator,
        })
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Calls `method` as `sender` and decodes its return value.
    ///
    /// Returns `None` for `void` methods.
    pub fn call(
        &mut self,
        sender: Address,
        method: &str,
        args: &[AbiValue],
    ) -> CalculatorResult<Option<AbiValue>> {
        let method = self
            .contract
            .find_method(method)
            .ok_or_else(|| CalculatorError::UnknownMethod(method.to_string()))?
            .clone();

        if args.len() != method.args.len() {
            return Err(CalculatorError::ArgumentCount {
                method: method.name,
                expected: method.args.len(),
                actual: args.len(),
            });
        }

        let mut app_args = Vec::with_capacity(args.len() + 1);
        app_args.push(method.selector().to_vec());
        for (value, arg) in args.iter().zip(&method.args) {
            if value.abi_type() != arg.kind {
                return Err(avm_abi::AbiError::TypeMismatch {
                    expected: arg.kind.to_string(),
                    actual: value.abi_type().to_string(),
                }
                .into());
            }
            app_args.push(value.encode()?);
        }

        let receipt = self
            .ledger
            .apply(&ApplicationCall::call(self.app_id, sender).with_args(app_args))?;
        debug!(method = %method.signature(), cost = receipt.cost, "method call approved");

        match &method.returns.kind {
            ReturnType::Void => Ok(None),
            ReturnType::Value(kind) => {
                let bytes = receipt
                    .return_value()
                    .ok_or_else(|| CalculatorError::MissingReturn(method.signature()))?;
                Ok(Some(AbiValue::decode(kind, bytes)?))
            }
        }
    }

    /// Sends a bare call with no arguments.
    pub fn bare_call(
        &mut self,
        sender: Address,
        on_completion: OnComplete,
    ) -> CalculatorResult<Receipt> {
        let call = ApplicationCall::call(self.app_id, sender).with_on_completion(on_completion);
        Ok(self.ledger.apply(&call)?)
    }

    /// Replaces the application's programs with `compiled`.
    pub fn update(
        &mut self,
        sender: Address,
        compiled: &CompiledContract,
    ) -> CalculatorResult<Receipt> {
        let call = ApplicationCall::call(self.app_id, sender)
            .with_on_completion(OnComplete::UpdateApplication)
            .with_programs(
                compiled.approval_bytecode.clone(),
                compiled.clear_bytecode.clone(),
            );
        let receipt = self.ledger.apply(&call)?;
        self.contract = compiled.contract.clone();
        Ok(receipt)
    }

    pub fn delete(&mut self, sender: Address) -> CalculatorResult<Receipt> {
        self.bare_call(sender, OnComplete::DeleteApplication)
    }

    pub fn clear_state(&mut self, sender: Address) -> CalculatorResult<Receipt> {
        self.bare_call(sender, OnComplete::ClearState)
    }
}

/// Typed client for the calculator methods.
#[derive(Debug)]
pub struct CalculatorClient {
    app: AppClient,
}

impl CalculatorClient {
    pub fn deploy(compiled: &CompiledContract, creator: Address) -> CalculatorResult<Self> {
        Ok(Self::new(AppClient::deploy(compiled, creator)?))
    }

    pub fn new(app: AppClient) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &AppClient {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppClient {
        &mut self.app
    }

    pub fn add(&mut self, a: u64, b: u64) -> CalculatorResult<u64> {
        self.binary("add", a, b)
    }

    pub fn sub(&mut self, a: u64, b: u64) -> CalculatorResult<u64> {
        self.binary("sub", a, b)
    }

    pub fn mul(&mut self, a: u64, b: u64) -> CalculatorResult<u64> {
        self.binary("mul", a, b)
    }

    pub fn div(&mut self, a: u64, b: u64) -> CalculatorResult<u64> {
        self.binary("div", a, b)
    }

    /// Calls a two-argument method as the creator.
    pub fn binary(&mut self, method: &str, a: u64, b: u64) -> CalculatorResult<u64> {
        let sender = self.app.creator();
        let value = self
            .app
            .call(sender, method, &[AbiValue::uint64(a), AbiValue::uint64(b)])?;
        value
            .and_then(|value| value.as_u64())
            .ok_or_else(|| CalculatorError::MissingReturn(method.to_string()))
    }
}

//! Router declaration and compilation.

use crate::call_config::{BareCallActions, CallConfig, OnCompleteAction};
use crate::error::{RouterError, RouterResult};
use crate::expr::{Expr, TealType};
use avm_abi::{AbiType, Argument, Contract, Method, ReturnType, Returns};
use avm_config::{OptimizeConfig, ARC4_RETURN_PREFIX, MAX_APP_ARGS};
use avm_teal::{
    assemble, optimize_scratch_slots, OnComplete, OpCode, Program, ProgramBuilder, TxnField,
};
use tracing::debug;

/// Method arguments are passed after the selector in `ApplicationArgs`.
pub const MAX_METHOD_ARGS: usize = MAX_APP_ARGS - 1;

/// Optimizations applied by [`Router::compile_program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptimizeOptions {
    pub scratch_slots: bool,
}

impl OptimizeOptions {
    pub fn new(scratch_slots: bool) -> Self {
        Self { scratch_slots }
    }
}

impl From<&OptimizeConfig> for OptimizeOptions {
    fn from(config: &OptimizeConfig) -> Self {
        Self::new(config.scratch_slots)
    }
}

/// Output of [`Router::compile_program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContract {
    pub approval: Program,
    pub clear: Program,
    pub contract: Contract,
    pub approval_bytecode: Vec<u8>,
    pub clear_bytecode: Vec<u8>,
}

#[derive(Debug, Clone)]
struct RouterMethod {
    method: Method,
    arg_types: Vec<TealType>,
    body: Expr,
}

impl RouterMethod {
    fn subroutine(&self, index: usize) -> String {
        format!("{}_{}", self.method.name, index)
    }

    fn return_type(&self) -> Option<AbiType> {
        match self.method.returns.kind {
            ReturnType::Void => None,
            ReturnType::Value(kind) => Some(kind),
        }
    }
}

/// Hands out scratch slots in increasing order.
#[derive(Debug, Default)]
struct SlotAllocator {
    next: u16,
}

impl SlotAllocator {
    fn alloc(&mut self) -> RouterResult<u8> {
        let slot = u8::try_from(self.next).map_err(|_| RouterError::ScratchExhausted)?;
        self.next += 1;
        Ok(slot)
    }
}

/// Maps an ABI type to its stack representation.
fn teal_type_of(kind: &AbiType, context: &str) -> RouterResult<TealType> {
    match kind {
        AbiType::Uint(64) => Ok(TealType::Uint64),
        AbiType::Address => Ok(TealType::Bytes),
        other => Err(RouterError::UnsupportedType {
            kind: other.to_string(),
            context: context.to_string(),
        }),
    }
}

/// Declares ABI methods and bare-call actions and compiles them into an
/// approval program, a clear program and an ARC-4 contract descriptor.
#[derive(Debug, Clone)]
pub struct Router {
    name: String,
    desc: Option<String>,
    bare_calls: BareCallActions,
    methods: Vec<RouterMethod>,
}

impl Router {
    pub fn new(name: impl Into<String>, bare_calls: BareCallActions) -> Self {
        Self {
            name: name.into(),
            desc: None,
            bare_calls,
            methods: Vec::new(),
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bare_calls(&self) -> &BareCallActions {
        &self.bare_calls
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|entry| &entry.method)
    }

    /// Registers a method. `body` computes the return value from `Expr::Arg`s
    /// and must have the stack type of `returns`.
    pub fn method(
        &mut self,
        name: &str,
        args: Vec<Argument>,
        returns: Returns,
        desc: &str,
        body: Expr,
    ) -> RouterResult<&mut Self> {
        if args.len() > MAX_METHOD_ARGS {
            return Err(RouterError::TooManyArguments {
                method: name.to_string(),
                count: args.len(),
                max: MAX_METHOD_ARGS,
            });
        }

        let mut method = Method::new(name, args, returns);
        if !desc.is_empty() {
            method = method.with_desc(desc);
        }
        let signature = method.signature();

        let arg_types = method
            .args
            .iter()
            .map(|arg| teal_type_of(&arg.kind, &signature))
            .collect::<RouterResult<Vec<_>>>()?;
        let expected = match method.returns.kind {
            ReturnType::Void => TealType::None,
            ReturnType::Value(kind) => teal_type_of(&kind, &signature)?,
        };
        let actual = body.type_of(&arg_types)?;
        if actual != expected {
            return Err(RouterError::type_mismatch(
                format!("body of {}", signature),
                expected,
                actual,
            ));
        }

        let selector = method.selector();
        if self
            .methods
            .iter()
            .any(|entry| entry.method.selector() == selector)
        {
            return Err(RouterError::DuplicateMethod(signature));
        }

        debug!(target: "avm_router", method = %signature, "registered method");
        self.methods.push(RouterMethod {
            method,
            arg_types,
            body,
        });
        Ok(self)
    }

    /// ARC-4 descriptor listing every registered method.
    pub fn contract(&self) -> Contract {
        let mut contract = Contract::new(self.name.clone());
        contract.desc = self.desc.clone();
        contract.methods = self.methods().cloned().collect();
        contract
    }

    /// Compiles the approval and clear programs at `version`.
    pub fn compile_program(
        &self,
        version: u8,
        optimize: OptimizeOptions,
    ) -> RouterResult<CompiledContract> {
        let mut approval = self.build_approval()?.build(version);
        let mut clear = self.build_clear()?.build(version);

        if optimize.scratch_slots {
            optimize_scratch_slots(&mut approval);
            optimize_scratch_slots(&mut clear);
        }

        let approval_bytecode = assemble(&approval)?;
        let clear_bytecode = assemble(&clear)?;
        let contract = self.contract();
        contract.validate()?;

        debug!(
            target: "avm_router",
            name = %self.name,
            version,
            methods = self.methods.len(),
            approval_bytes = approval_bytecode.len(),
            clear_bytes = clear_bytecode.len(),
            "compiled router"
        );

        Ok(CompiledContract {
            approval,
            clear,
            contract,
            approval_bytecode,
            clear_bytecode,
        })
    }

    fn build_approval(&self) -> RouterResult<ProgramBuilder> {
        let mut b = ProgramBuilder::new();
        let mut slots = SlotAllocator::default();

        let bare_label = self
            .bare_calls
            .has_approval_actions()
            .then(|| b.new_label("main"));
        if let Some(label) = &bare_label {
            b.emit_txn(TxnField::NumAppArgs)
                .emit_int(0)
                .emit_opcode(OpCode::Eq)
                .emit_jump(OpCode::Bnz, label);
        }

        let method_labels: Vec<String> = self.methods.iter().map(|_| b.new_label("main")).collect();
        for (entry, label) in self.methods.iter().zip(&method_labels) {
            b.emit_txna(TxnField::ApplicationArgs, 0)
                .emit_method(&entry.method.signature())
                .emit_opcode(OpCode::Eq)
                .emit_jump(OpCode::Bnz, label);
        }
        b.emit_opcode(OpCode::Err);

        for (index, (entry, label)) in self.methods.iter().zip(&method_labels).enumerate() {
            b.emit_label(label);
            compile_method_case(&mut b, entry, &entry.subroutine(index), &mut slots)?;
        }

        if let Some(label) = &bare_label {
            b.emit_label(label);
            self.compile_bare_calls(&mut b)?;
        }

        for (index, entry) in self.methods.iter().enumerate() {
            compile_subroutine(&mut b, entry, &entry.subroutine(index), &mut slots)?;
        }

        Ok(b)
    }

    fn compile_bare_calls(&self, b: &mut ProgramBuilder) -> RouterResult<()> {
        let cases: Vec<(OnComplete, &OnCompleteAction, String)> = self
            .bare_calls
            .approval_actions()
            .into_iter()
            .filter(|(_, action)| !action.is_empty())
            .map(|(on_complete, action)| (on_complete, action, b.new_label("main")))
            .collect();

        for (on_complete, _, label) in &cases {
            b.emit_txn(TxnField::OnCompletion)
                .emit_on_completion(*on_complete)
                .emit_opcode(OpCode::Eq)
                .emit_jump(OpCode::Bnz, label);
        }
        b.emit_opcode(OpCode::Err);

        for (on_complete, action, label) in &cases {
            b.emit_label(label);
            match action.call_config {
                CallConfig::Create => {
                    b.emit_txn(TxnField::ApplicationID)
                        .emit_int(0)
                        .emit_opcode(OpCode::Eq)
                        .emit_opcode(OpCode::Assert);
                }
                CallConfig::Call => {
                    b.emit_txn(TxnField::ApplicationID)
                        .emit_int(0)
                        .emit_opcode(OpCode::Neq)
                        .emit_opcode(OpCode::Assert);
                }
                CallConfig::All | CallConfig::Never => {}
            }
            if let Some(expr) = action.enabled() {
                compile_action(b, expr, &on_complete.to_string())?;
            }
        }
        Ok(())
    }

    fn build_clear(&self) -> RouterResult<ProgramBuilder> {
        let mut b = ProgramBuilder::new();
        match self.bare_calls.clear_state.enabled() {
            None => {
                b.emit_int(0).emit_opcode(OpCode::Return);
            }
            Some(_) if self.bare_calls.clear_state.call_config == CallConfig::Create => {
                return Err(RouterError::InvalidCallConfig {
                    action: OnComplete::ClearState.to_string(),
                    reason: "clear state cannot create an application".to_string(),
                });
            }
            Some(expr) => compile_action(&mut b, expr, "ClearState")?,
        }
        Ok(b)
    }
}

/// Emits an action, approving afterwards unless it already ends the program.
fn compile_action(b: &mut ProgramBuilder, action: &Expr, context: &str) -> RouterResult<()> {
    let kind = action.type_of(&[])?;
    if kind != TealType::None {
        return Err(RouterError::type_mismatch(
            format!("{} action", context),
            TealType::None,
            kind,
        ));
    }
    action.compile(b, &[])?;
    if !action.terminates() {
        Expr::Approve.compile(b, &[])?;
    }
    Ok(())
}

/// Checks the call is a NoOp on an existing app, decodes arguments into
/// scratch, calls the subroutine and logs the ARC-4 return value.
fn compile_method_case(
    b: &mut ProgramBuilder,
    entry: &RouterMethod,
    subroutine: &str,
    slots: &mut SlotAllocator,
) -> RouterResult<()> {
    b.emit_txn(TxnField::OnCompletion)
        .emit_on_completion(OnComplete::NoOp)
        .emit_opcode(OpCode::Eq)
        .emit_txn(TxnField::ApplicationID)
        .emit_int(0)
        .emit_opcode(OpCode::Neq)
        .emit_opcode(OpCode::And)
        .emit_opcode(OpCode::Assert);

    let mut arg_slots = Vec::with_capacity(entry.arg_types.len());
    for (index, kind) in entry.arg_types.iter().enumerate() {
        let slot = slots.alloc()?;
        // index 0 holds the selector
        b.emit_txna(TxnField::ApplicationArgs, (index + 1) as u8);
        if *kind == TealType::Uint64 {
            b.emit_opcode(OpCode::Btoi);
        }
        b.emit_store(slot);
        arg_slots.push(slot);
    }
    for slot in &arg_slots {
        b.emit_load(*slot);
    }
    b.emit_callsub(subroutine);

    if let Some(kind) = entry.return_type() {
        let result = slots.alloc()?;
        b.emit_store(result)
            .emit_bytes(&ARC4_RETURN_PREFIX)
            .emit_load(result);
        if kind == AbiType::UINT64 {
            b.emit_opcode(OpCode::Itob);
        }
        b.emit_opcode(OpCode::Concat).emit_opcode(OpCode::Log);
    }

    b.emit_int(1).emit_opcode(OpCode::Return);
    Ok(())
}

/// Subroutine taking the decoded arguments on the stack.
fn compile_subroutine(
    b: &mut ProgramBuilder,
    entry: &RouterMethod,
    subroutine: &str,
    slots: &mut SlotAllocator,
) -> RouterResult<()> {
    b.emit_label(subroutine);

    let params = entry
        .arg_types
        .iter()
        .map(|_| slots.alloc())
        .collect::<RouterResult<Vec<u8>>>()?;
    for slot in params.iter().rev() {
        b.emit_store(*slot);
    }

    entry.body.compile(b, &params)?;

    if entry.return_type().is_some() {
        let output = slots.alloc()?;
        b.emit_store(output).emit_load(output);
    }
    b.emit_opcode(OpCode::Retsub);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint_args() -> Vec<Argument> {
        vec![
            Argument::new("a", AbiType::UINT64),
            Argument::new("b", AbiType::UINT64),
        ]
    }

    fn adder() -> Router {
        let mut router = Router::new("adder", BareCallActions::default());
        router
            .method(
                "add",
                uint_args(),
                Returns::value(AbiType::UINT64),
                "",
                Expr::arg(0) + Expr::arg(1),
            )
            .unwrap();
        router
    }

    #[test]
    fn test_method_registration_errors() {
        let mut router = adder();
        assert!(matches!(
            router.method(
                "add",
                uint_args(),
                Returns::value(AbiType::UINT64),
                "",
                Expr::arg(0)
            ),
            Err(RouterError::DuplicateMethod(sig)) if sig == "add(uint64,uint64)uint64"
        ));
        assert!(matches!(
            router.method(
                "echo",
                vec![Argument::new("s", AbiType::String)],
                Returns::void(),
                "",
                Expr::Seq(vec![])
            ),
            Err(RouterError::UnsupportedType { .. })
        ));
        assert!(matches!(
            router.method(
                "bad",
                uint_args(),
                Returns::value(AbiType::UINT64),
                "",
                Expr::arg(0).itob()
            ),
            Err(RouterError::TypeMismatch { .. })
        ));
        assert!(matches!(
            router.method(
                "many",
                vec![Argument::new("x", AbiType::UINT64); MAX_METHOD_ARGS + 1],
                Returns::void(),
                "",
                Expr::Seq(vec![])
            ),
            Err(RouterError::TooManyArguments { .. })
        ));
    }

    #[test]
    fn test_approval_layout_without_bare_calls() {
        let compiled = adder()
            .compile_program(6, OptimizeOptions::default())
            .unwrap();
        let teal = compiled.approval.to_teal();
        assert!(teal.starts_with(
            "#pragma version 6\ntxna ApplicationArgs 0\nmethod \"add(uint64,uint64)uint64\"\n==\nbnz main_l1\nerr\nmain_l1:"
        ));
        assert!(!teal.contains("NumAppArgs"));
        assert!(teal.contains("callsub add_0"));
        assert!(teal.contains("byte 0x151f7c75"));
        assert!(teal.ends_with("add_0:\nstore 4\nstore 3\nload 3\nload 4\n+\nstore 5\nload 5\nretsub"));
        assert_eq!(compiled.clear.to_teal(), "#pragma version 6\nint 0\nreturn");
    }

    #[test]
    fn test_scratch_optimization_shrinks_subroutine() {
        let compiled = adder()
            .compile_program(6, OptimizeOptions::new(true))
            .unwrap();
        assert!(compiled.approval.to_teal().ends_with("add_0:\n+\nretsub"));
    }

    #[test]
    fn test_bare_calls_layout() {
        let bare = BareCallActions {
            no_op: OnCompleteAction::create_only(Expr::Approve),
            opt_in: OnCompleteAction::call_only(Expr::assert(Expr::int(1))),
            ..Default::default()
        };
        let compiled = Router::new("bare", bare)
            .compile_program(6, OptimizeOptions::default())
            .unwrap();
        assert_eq!(
            compiled.approval.to_teal(),
            [
                "#pragma version 6",
                "txn NumAppArgs",
                "int 0",
                "==",
                "bnz main_l1",
                "err",
                "main_l1:",
                "txn OnCompletion",
                "int NoOp",
                "==",
                "bnz main_l2",
                "txn OnCompletion",
                "int OptIn",
                "==",
                "bnz main_l3",
                "err",
                "main_l2:",
                "txn ApplicationID",
                "int 0",
                "==",
                "assert",
                "int 1",
                "return",
                "main_l3:",
                "txn ApplicationID",
                "int 0",
                "!=",
                "assert",
                "int 1",
                "assert",
                "int 1",
                "return",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_action_must_not_leave_values() {
        let bare = BareCallActions {
            no_op: OnCompleteAction::always(Expr::int(1)),
            ..Default::default()
        };
        assert!(matches!(
            Router::new("bad", bare).compile_program(6, OptimizeOptions::default()),
            Err(RouterError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_clear_state_config() {
        let bare = BareCallActions {
            clear_state: OnCompleteAction::create_only(Expr::Approve),
            ..Default::default()
        };
        assert!(matches!(
            Router::new("bad", bare).compile_program(6, OptimizeOptions::default()),
            Err(RouterError::InvalidCallConfig { .. })
        ));

        let bare = BareCallActions {
            clear_state: OnCompleteAction::call_only(Expr::Approve),
            ..Default::default()
        };
        let compiled = Router::new("ok", bare)
            .compile_program(6, OptimizeOptions::default())
            .unwrap();
        assert_eq!(compiled.clear.to_teal(), "#pragma version 6\nint 1\nreturn");
    }

    #[test]
    fn test_old_versions_rejected() {
        assert!(matches!(
            adder().compile_program(3, OptimizeOptions::default()),
            Err(RouterError::Teal(_))
        ));
    }

    #[test]
    fn test_contract_descriptor() {
        let contract = adder().with_desc("adds").contract();
        assert_eq!(contract.name, "adder");
        assert_eq!(contract.desc.as_deref(), Some("adds"));
        assert_eq!(contract.methods.len(), 1);
        assert_eq!(contract.methods[0].desc, None);
    }
}

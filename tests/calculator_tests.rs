//! End-to-end tests: compile, assemble, deploy and call the calculator.

use calculator::abi::AbiValue;
use calculator::prelude::*;
use calculator::teal::OnComplete;
use calculator::vm::{ApplicationCall, LedgerError, VmError};
use proptest::prelude::*;

const CREATOR: Address = [0xc1; 32];
const STRANGER: Address = [0x5e; 32];

fn compiled(optimize: bool) -> CompiledContract {
    let mut config = CompileConfig::default();
    config.optimize.scratch_slots = optimize;
    calculator::compile(&config).unwrap()
}

fn client() -> CalculatorClient {
    CalculatorClient::deploy(&compiled(true), CREATOR).unwrap()
}

fn is_fault(result: &CalculatorResult<impl std::fmt::Debug>, expected: fn(&VmError) -> bool) -> bool {
    match result {
        Err(CalculatorError::Ledger(LedgerError::Fault { error, .. })) => expected(error),
        _ => false,
    }
}

#[test]
fn test_arithmetic_examples() {
    for optimize in [true, false] {
        let mut client = CalculatorClient::deploy(&compiled(optimize), CREATOR).unwrap();
        assert_eq!(client.add(2, 3).unwrap(), 5);
        assert_eq!(client.sub(10, 4).unwrap(), 6);
        assert_eq!(client.mul(6, 7).unwrap(), 42);
        assert_eq!(client.div(7, 2).unwrap(), 3);
    }
}

#[test]
fn test_arithmetic_aborts() {
    let mut client = client();
    assert!(is_fault(&client.sub(4, 10), |e| matches!(e, VmError::Underflow { .. })));
    assert!(is_fault(&client.div(5, 0), |e| matches!(e, VmError::DivisionByZero { .. })));
    assert!(is_fault(&client.add(u64::MAX, 1), |e| matches!(e, VmError::Overflow { .. })));
    assert!(is_fault(&client.mul(u64::MAX, 2), |e| matches!(e, VmError::Overflow { .. })));

    // a failed call leaves the application usable
    assert_eq!(client.add(1, 1).unwrap(), 2);
}

#[test]
fn test_any_sender_may_call_methods() {
    let mut client = client();
    let value = client
        .app_mut()
        .call(STRANGER, "mul", &[AbiValue::uint64(3), AbiValue::uint64(5)])
        .unwrap();
    assert_eq!(value, Some(AbiValue::uint64(15)));
}

#[test]
fn test_client_argument_checks() {
    let mut client = client();
    let app = client.app_mut();
    assert!(matches!(
        app.call(CREATOR, "pow", &[]),
        Err(CalculatorError::UnknownMethod(name)) if name == "pow"
    ));
    assert!(matches!(
        app.call(CREATOR, "add", &[AbiValue::uint64(1)]),
        Err(CalculatorError::ArgumentCount { expected: 2, actual: 1, .. })
    ));
    assert!(matches!(
        app.call(CREATOR, "add", &[AbiValue::Bool(true), AbiValue::uint64(1)]),
        Err(CalculatorError::Abi(_))
    ));
}

#[test]
fn test_update_is_creator_only() {
    let mut client = client();
    let replacement = compiled(false);

    let result = client.app_mut().update(STRANGER, &replacement);
    assert!(matches!(
        result,
        Err(CalculatorError::Ledger(LedgerError::Rejected { .. }))
    ));

    client.app_mut().update(CREATOR, &replacement).unwrap();
    let app_id = client.app().app_id();
    let app = client.app().ledger().application(app_id).unwrap();
    assert_eq!(app.approval, replacement.approval_bytecode);
    assert_eq!(client.add(20, 22).unwrap(), 42);
}

#[test]
fn test_delete_is_creator_only() {
    let mut client = client();
    let app_id = client.app().app_id();

    assert!(matches!(
        client.app_mut().delete(STRANGER),
        Err(CalculatorError::Ledger(LedgerError::Rejected { .. }))
    ));
    assert!(client.app().ledger().application(app_id).is_some());

    client.app_mut().delete(CREATOR).unwrap();
    assert!(client.app().ledger().application(app_id).is_none());
    assert!(matches!(
        client.add(1, 2),
        Err(CalculatorError::Ledger(LedgerError::UnknownApplication(id))) if id == app_id
    ));
}

#[test]
fn test_clear_state_always_fails() {
    let mut client = client();
    for sender in [CREATOR, STRANGER] {
        assert!(matches!(
            client.app_mut().clear_state(sender),
            Err(CalculatorError::Ledger(LedgerError::Rejected { .. }))
        ));
    }
    assert!(client.app().ledger().application(client.app().app_id()).is_some());
}

#[test]
fn test_bare_calls_after_creation_fail() {
    let mut client = client();
    let app = client.app_mut();

    // no_op is create only
    assert!(is_fault(&app.bare_call(CREATOR, OnComplete::NoOp), |e| {
        matches!(e, VmError::AssertFailed { .. })
    }));
    for on_completion in [OnComplete::OptIn, OnComplete::CloseOut] {
        assert!(is_fault(&app.bare_call(CREATOR, on_completion), |e| {
            matches!(e, VmError::ErrOpcode)
        }));
    }
}

#[test]
fn test_method_with_opt_in_fails() {
    let compiled = compiled(true);
    let mut ledger = Ledger::new();
    let app_id = ledger
        .apply(&ApplicationCall::create(
            CREATOR,
            compiled.approval_bytecode.clone(),
            compiled.clear_bytecode.clone(),
        ))
        .unwrap()
        .app_id;

    let selector = compiled.contract.find_method("add").unwrap().selector();
    let args = vec![
        selector.to_vec(),
        1u64.to_be_bytes().to_vec(),
        2u64.to_be_bytes().to_vec(),
    ];
    let opt_in = ApplicationCall::call(app_id, CREATOR)
        .with_on_completion(OnComplete::OptIn)
        .with_args(args.clone());
    assert!(matches!(
        ledger.apply(&opt_in),
        Err(LedgerError::Fault {
            error: VmError::AssertFailed { .. },
            ..
        })
    ));

    let receipt = ledger
        .apply(&ApplicationCall::call(app_id, CREATOR).with_args(args))
        .unwrap();
    assert_eq!(receipt.return_value(), Some(&3u64.to_be_bytes()[..]));
}

proptest! {
    /// add matches checked addition
    #[test]
    fn test_add_property(a in any::<u64>(), b in any::<u64>()) {
        let result = client().add(a, b);
        match a.checked_add(b) {
            Some(sum) => prop_assert_eq!(result.unwrap(), sum),
            None => prop_assert!(result.is_err()),
        }
    }

    /// sub succeeds exactly when b <= a
    #[test]
    fn test_sub_property(a in any::<u64>(), b in any::<u64>()) {
        let result = client().sub(a, b);
        match a.checked_sub(b) {
            Some(diff) => prop_assert_eq!(result.unwrap(), diff),
            None => prop_assert!(result.is_err()),
        }
    }

    /// mul matches checked multiplication
    #[test]
    fn test_mul_property(a in any::<u32>(), b in any::<u64>()) {
        let a = a as u64;
        let result = client().mul(a, b);
        match a.checked_mul(b) {
            Some(product) => prop_assert_eq!(result.unwrap(), product),
            None => prop_assert!(result.is_err()),
        }
    }

    /// div truncates and fails on a zero divisor
    #[test]
    fn test_div_property(a in any::<u64>(), b in 0u64..1000) {
        let result = client().div(a, b);
        match a.checked_div(b) {
            Some(quotient) => prop_assert_eq!(result.unwrap(), quotient),
            None => prop_assert!(result.is_err()),
        }
    }
}

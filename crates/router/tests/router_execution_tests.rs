//! Compiled routers executed on the in-memory ledger.

use avm_abi::{selector_of, AbiType, Argument, Returns};
use avm_config::ADDRESS_SIZE;
use avm_router::{BareCallActions, Expr, OnCompleteAction, OptimizeOptions, Router};
use avm_teal::OnComplete;
use avm_vm::{Address, ApplicationCall, Ledger, LedgerError, VmError};
use proptest::prelude::*;

const CREATOR: Address = [7; ADDRESS_SIZE];
const OTHER: Address = [8; ADDRESS_SIZE];

fn router() -> Router {
    let mut router = Router::new(
        "demo",
        BareCallActions {
            no_op: OnCompleteAction::create_only(Expr::Approve),
            opt_in: OnCompleteAction::call_only(Expr::Approve),
            delete_application: OnCompleteAction::always(Expr::ret(Expr::is_creator())),
            ..Default::default()
        },
    );
    router
        .method(
            "mod",
            vec![
                Argument::new("a", AbiType::UINT64),
                Argument::new("b", AbiType::UINT64),
            ],
            Returns::value(AbiType::UINT64),
            "a modulo b",
            Expr::arg(0) % Expr::arg(1),
        )
        .unwrap()
        .method(
            "owner",
            vec![],
            Returns::value(AbiType::Address),
            "creator address",
            Expr::GlobalCreatorAddress,
        )
        .unwrap()
        .method(
            "check",
            vec![Argument::new("who", AbiType::Address)],
            Returns::void(),
            "fails unless who is the creator",
            Expr::assert(Expr::arg(0).equals(Expr::GlobalCreatorAddress)),
        )
        .unwrap();
    router
}

fn deploy(optimize: bool) -> (Ledger, u64) {
    let compiled = router()
        .compile_program(6, OptimizeOptions::new(optimize))
        .unwrap();
    let mut ledger = Ledger::new();
    let receipt = ledger
        .apply(&ApplicationCall::create(
            CREATOR,
            compiled.approval_bytecode,
            compiled.clear_bytecode,
        ))
        .unwrap();
    (ledger, receipt.app_id)
}

fn method_call(app_id: u64, sender: Address, signature: &str, args: Vec<Vec<u8>>) -> ApplicationCall {
    let mut all = vec![selector_of(signature).to_vec()];
    all.extend(args);
    ApplicationCall::call(app_id, sender).with_args(all)
}

#[test]
fn test_value_methods() {
    for optimize in [false, true] {
        let (mut ledger, app_id) = deploy(optimize);

        let receipt = ledger
            .apply(&method_call(
                app_id,
                OTHER,
                "mod(uint64,uint64)uint64",
                vec![17u64.to_be_bytes().to_vec(), 5u64.to_be_bytes().to_vec()],
            ))
            .unwrap();
        assert_eq!(receipt.return_value(), Some(&2u64.to_be_bytes()[..]));
        assert_eq!(receipt.logs.len(), 1);

        let receipt = ledger
            .apply(&method_call(app_id, OTHER, "owner()address", vec![]))
            .unwrap();
        assert_eq!(receipt.return_value(), Some(&CREATOR[..]));
    }
}

#[test]
fn test_void_method_logs_nothing() {
    let (mut ledger, app_id) = deploy(true);
    let receipt = ledger
        .apply(&method_call(app_id, OTHER, "check(address)void", vec![CREATOR.to_vec()]))
        .unwrap();
    assert!(receipt.logs.is_empty());
    assert_eq!(receipt.return_value(), None);

    let result = ledger.apply(&method_call(
        app_id,
        OTHER,
        "check(address)void",
        vec![OTHER.to_vec()],
    ));
    assert!(matches!(
        result,
        Err(LedgerError::Fault {
            error: VmError::AssertFailed { .. },
            ..
        })
    ));
}

#[test]
fn test_methods_rejected_during_create() {
    let compiled = router()
        .compile_program(6, OptimizeOptions::default())
        .unwrap();
    let mut ledger = Ledger::new();
    let create = ApplicationCall::create(CREATOR, compiled.approval_bytecode, compiled.clear_bytecode)
        .with_args(vec![selector_of("owner()address").to_vec()]);
    assert!(matches!(
        ledger.apply(&create),
        Err(LedgerError::Fault {
            error: VmError::AssertFailed { .. },
            ..
        })
    ));
}

#[test]
fn test_method_requires_no_op() {
    let (mut ledger, app_id) = deploy(false);
    let call = method_call(app_id, OTHER, "owner()address", vec![])
        .with_on_completion(OnComplete::OptIn);
    assert!(matches!(ledger.apply(&call), Err(LedgerError::Fault { .. })));
}

#[test]
fn test_bare_calls() {
    let (mut ledger, app_id) = deploy(true);

    // no_op is create only
    assert!(matches!(
        ledger.apply(&ApplicationCall::call(app_id, CREATOR)),
        Err(LedgerError::Fault {
            error: VmError::AssertFailed { .. },
            ..
        })
    ));

    ledger
        .apply(&ApplicationCall::call(app_id, OTHER).with_on_completion(OnComplete::OptIn))
        .unwrap();

    // close_out is never
    assert!(matches!(
        ledger.apply(&ApplicationCall::call(app_id, OTHER).with_on_completion(OnComplete::CloseOut)),
        Err(LedgerError::Fault {
            error: VmError::ErrOpcode,
            ..
        })
    ));

    let delete = |sender| {
        ApplicationCall::call(app_id, sender).with_on_completion(OnComplete::DeleteApplication)
    };
    assert!(matches!(
        ledger.apply(&delete(OTHER)),
        Err(LedgerError::Rejected { .. })
    ));
    ledger.apply(&delete(CREATOR)).unwrap();
    assert!(ledger.application(app_id).is_none());
}

#[test]
fn test_unknown_selector_fails() {
    let (mut ledger, app_id) = deploy(false);
    let result = ledger.apply(&method_call(app_id, OTHER, "nope()void", vec![]));
    assert!(matches!(
        result,
        Err(LedgerError::Fault {
            error: VmError::ErrOpcode,
            ..
        })
    ));
}

proptest! {
    /// The optimized and unoptimized programs agree on every input
    #[test]
    fn test_optimization_preserves_results(a in any::<u64>(), b in any::<u64>()) {
        let args = vec![a.to_be_bytes().to_vec(), b.to_be_bytes().to_vec()];
        let mut outcomes = Vec::new();
        for optimize in [false, true] {
            let (mut ledger, app_id) = deploy(optimize);
            let result = ledger.apply(&method_call(app_id, OTHER, "mod(uint64,uint64)uint64", args.clone()));
            // fault pcs differ between the two programs
            outcomes.push(result.map(|receipt| receipt.logs).map_err(|err| match err {
                LedgerError::Fault { error, .. } => error.to_string(),
                other => other.to_string(),
            }));
        }
        prop_assert_eq!(&outcomes[0], &outcomes[1]);
        if b != 0 {
            let expected = [&[0x15, 0x1f, 0x7c, 0x75][..], &(a % b).to_be_bytes()[..]].concat();
            prop_assert_eq!(outcomes[0].clone().unwrap(), vec![expected]);
        }
    }
}

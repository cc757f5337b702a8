//! The calculator declaration.

use avm_abi::{AbiType, Argument, Returns};
use avm_router::{BareCallActions, Expr, OnCompleteAction, Router, RouterResult};

/// Contract name written to `contract.json`.
pub const CONTRACT_NAME: &str = "calculator";

/// Method names with their descriptions, in registration order.
pub const METHODS: [(&str, &str); 4] = [
    ("add", "sum a and b, return the result"),
    ("sub", "subtract b from a, return the result"),
    ("mul", "multiply a and b, return the result"),
    ("div", "divide a by b, return the result"),
];

/// Bare calls: creation approves, update and delete are creator-only and
/// clear state is refused.
pub fn bare_calls() -> BareCallActions {
    BareCallActions {
        no_op: OnCompleteAction::create_only(Expr::Approve),
        update_application: OnCompleteAction::always(Expr::ret(Expr::is_creator())),
        delete_application: OnCompleteAction::always(Expr::ret(Expr::is_creator())),
        clear_state: OnCompleteAction::never(),
        ..Default::default()
    }
}

fn body(name: &str) -> Expr {
    let (a, b) = (Expr::arg(0), Expr::arg(1));
    match name {
        "add" => a + b,
        "sub" => a - b,
        "mul" => a * b,
        _ => a / b,
    }
}

/// Builds the calculator router.
pub fn router() -> RouterResult<Router> {
    let mut router = Router::new(CONTRACT_NAME, bare_calls());
    for (name, desc) in METHODS {
        router.method(
            name,
            vec![
                Argument::new("a", AbiType::UINT64),
                Argument::new("b", AbiType::UINT64),
            ],
            Returns::value(AbiType::UINT64),
            desc,
            body(name),
        )?;
    }
    Ok(router)
}

//! When bare calls are allowed and what they do.

use crate::expr::Expr;
use avm_teal::OnComplete;
use std::fmt;

/// Whether a call is accepted during creation, afterwards, both or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallConfig {
    #[default]
    Never,
    /// Only on an existing application.
    Call,
    /// Only while creating the application.
    Create,
    All,
}

impl CallConfig {
    pub fn allows_create(self) -> bool {
        matches!(self, CallConfig::Create | CallConfig::All)
    }

    pub fn allows_call(self) -> bool {
        matches!(self, CallConfig::Call | CallConfig::All)
    }
}

impl fmt::Display for CallConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallConfig::Never => "NEVER",
            CallConfig::Call => "CALL",
            CallConfig::Create => "CREATE",
            CallConfig::All => "ALL",
        };
        f.write_str(name)
    }
}

/// An action paired with the configuration that enables it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OnCompleteAction {
    pub action: Option<Expr>,
    pub call_config: CallConfig,
}

impl OnCompleteAction {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn call_only(action: Expr) -> Self {
        Self {
            action: Some(action),
            call_config: CallConfig::Call,
        }
    }

    pub fn create_only(action: Expr) -> Self {
        Self {
            action: Some(action),
            call_config: CallConfig::Create,
        }
    }

    pub fn always(action: Expr) -> Self {
        Self {
            action: Some(action),
            call_config: CallConfig::All,
        }
    }

    /// Enabled action, `None` when the config is `Never`.
    pub fn enabled(&self) -> Option<&Expr> {
        match self.call_config {
            CallConfig::Never => None,
            _ => self.action.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_none()
    }
}

/// Actions for calls that carry no ABI method selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BareCallActions {
    pub no_op: OnCompleteAction,
    pub opt_in: OnCompleteAction,
    pub close_out: OnCompleteAction,
    pub clear_state: OnCompleteAction,
    pub update_application: OnCompleteAction,
    pub delete_application: OnCompleteAction,
}

impl BareCallActions {
    /// Actions handled by the approval program, in `OnComplete` order.
    pub fn approval_actions(&self) -> [(OnComplete, &OnCompleteAction); 5] {
        [
            (OnComplete::NoOp, &self.no_op),
            (OnComplete::OptIn, &self.opt_in),
            (OnComplete::CloseOut, &self.close_out),
            (OnComplete::UpdateApplication, &self.update_application),
            (OnComplete::DeleteApplication, &self.delete_application),
        ]
    }

    /// Whether the approval program needs a bare-call branch.
    pub fn has_approval_actions(&self) -> bool {
        self.approval_actions()
            .iter()
            .any(|(_, action)| !action.is_empty())
    }
}

//! In-memory application host.
//!
//! Applies application-call transactions to a set of deployed applications,
//! running the approval or clear program through the [`ExecutionEngine`].

use crate::context::{Address, ExecutionContext};
use crate::error::VmError;
use crate::execution_engine::ExecutionEngine;
use crate::vm_state::VmState;
use avm_config::{MAX_APP_ARGS, MAX_APP_PROGRAM_LEN, MAX_APP_TOTAL_ARG_LEN};
use avm_teal::OnComplete;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

/// A deployed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: u64,
    pub creator: Address,
    pub approval: Vec<u8>,
    pub clear: Vec<u8>,
}

/// An application-call transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCall {
    pub sender: Address,
    /// Zero creates a new application.
    pub app_id: u64,
    pub on_completion: OnComplete,
    pub args: Vec<Vec<u8>>,
    pub approval: Option<Vec<u8>>,
    pub clear: Option<Vec<u8>>,
}

impl ApplicationCall {
    pub fn create(sender: Address, approval: Vec<u8>, clear: Vec<u8>) -> Self {
        Self {
            sender,
            app_id: 0,
            on_completion: OnComplete::NoOp,
            args: Vec::new(),
            approval: Some(approval),
            clear: Some(clear),
        }
    }

    pub fn call(app_id: u64, sender: Address) -> Self {
        Self {
            sender,
            app_id,
            on_completion: OnComplete::NoOp,
            args: Vec::new(),
            approval: None,
            clear: None,
        }
    }

    pub fn with_on_completion(mut self, on_completion: OnComplete) -> Self {
        self.on_completion = on_completion;
        self
    }

    pub fn with_args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args = args;
        self
    }

    /// Programs installed by a create or an update.
    pub fn with_programs(mut self, approval: Vec<u8>, clear: Vec<u8>) -> Self {
        self.approval = Some(approval);
        self.clear = Some(clear);
        self
    }

    pub fn is_create(&self) -> bool {
        self.app_id == 0
    }
}

/// Outcome of an approved call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub app_id: u64,
    pub logs: Vec<Vec<u8>>,
    pub cost: u64,
}

impl Receipt {
    /// ARC-4 return value carried by the last log, prefix stripped.
    pub fn return_value(&self) -> Option<&[u8]> {
        avm_abi::return_value(&self.logs)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("application {0} does not exist")]
    UnknownApplication(u64),

    #[error("application {app_id} rejected the call")]
    Rejected { app_id: u64, logs: Vec<Vec<u8>> },

    #[error("application {app_id} faulted at pc {pc:?}: {error}")]
    Fault {
        app_id: u64,
        pc: Option<usize>,
        error: VmError,
    },

    #[error("{0} requires approval and clear programs")]
    MissingPrograms(&'static str),

    #[error("invalid application call: {0}")]
    InvalidCall(String),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Deployed applications keyed by id.
#[derive(Debug)]
pub struct Ledger {
    apps: BTreeMap<u64, Application>,
    next_id: u64,
    round: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            apps: BTreeMap::new(),
            next_id: 1,
            round: 1,
        }
    }

    pub fn application(&self, app_id: u64) -> Option<&Application> {
        self.apps.get(&app_id)
    }

    pub fn applications(&self) -> impl Iterator<Item = &Application> {
        self.apps.values()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Applies `call`. The ledger is only modified when the program approves.
    pub fn apply(&mut self, call: &ApplicationCall) -> LedgerResult<Receipt> {
        validate(call)?;

        let (app_id, context, program) = if call.is_create() {
            let (Some(approval), Some(_)) = (&call.approval, &call.clear) else {
                return Err(LedgerError::MissingPrograms("create"));
            };
            let app_id = self.next_id;
            let mut context =
                ExecutionContext::new(call.sender).with_application(app_id, call.sender);
            context.application_id = 0;
            (app_id, context, approval.clone())
        } else {
            let app = self
                .apps
                .get(&call.app_id)
                .ok_or(LedgerError::UnknownApplication(call.app_id))?;
            if call.on_completion == OnComplete::UpdateApplication
                && (call.approval.is_none() || call.clear.is_none())
            {
                return Err(LedgerError::MissingPrograms("update"));
            }
            let program = if call.on_completion == OnComplete::ClearState {
                app.clear.clone()
            } else {
                app.approval.clone()
            };
            let context = ExecutionContext::new(call.sender).with_application(app.id, app.creator);
            (app.id, context, program)
        };

        let context = context
            .with_on_completion(call.on_completion)
            .with_args(call.args.clone())
            .with_round(self.round, 0);

        let mut engine = ExecutionEngine::new(&program, context);
        let state = engine.execute();

        debug!(
            target: "avm_vm::ledger",
            app_id,
            on_completion = %call.on_completion,
            state = %state,
            cost = engine.cost(),
            "applied application call"
        );

        match state {
            VmState::Approved => {}
            VmState::Rejected => {
                return Err(LedgerError::Rejected {
                    app_id,
                    logs: engine.into_logs(),
                })
            }
            _ => {
                return Err(LedgerError::Fault {
                    app_id,
                    pc: engine.fault_pc(),
                    error: engine
                        .fault()
                        .cloned()
                        .unwrap_or_else(|| VmError::InvalidFinalStack("no result".into())),
                })
            }
        }

        let cost = engine.cost();
        let logs = engine.into_logs();
        self.commit(call, app_id);

        Ok(Receipt { app_id, logs, cost })
    }

    fn commit(&mut self, call: &ApplicationCall, app_id: u64) {
        self.round += 1;
        if call.is_create() {
            if let (Some(approval), Some(clear)) = (&call.approval, &call.clear) {
                self.apps.insert(
                    app_id,
                    Application {
                        id: app_id,
                        creator: call.sender,
                        approval: approval.clone(),
                        clear: clear.clone(),
                    },
                );
                self.next_id += 1;
                info!(target: "avm_vm::ledger", app_id, "application created");
            }
            return;
        }

        match call.on_completion {
            OnComplete::UpdateApplication => {
                if let (Some(app), Some(approval), Some(clear)) =
                    (self.apps.get_mut(&app_id), &call.approval, &call.clear)
                {
                    app.approval = approval.clone();
                    app.clear = clear.clone();
                    info!(target: "avm_vm::ledger", app_id, "application updated");
                }
            }
            OnComplete::DeleteApplication => {
                self.apps.remove(&app_id);
                info!(target: "avm_vm::ledger", app_id, "application deleted");
            }
            _ => {}
        }
    }
}

fn validate(call: &ApplicationCall) -> LedgerResult<()> {
    if call.args.len() > MAX_APP_ARGS {
        return Err(LedgerError::InvalidCall(format!(
            "{} arguments exceed the limit of {}",
            call.args.len(),
            MAX_APP_ARGS
        )));
    }
    let total: usize = call.args.iter().map(Vec::len).sum();
    if total > MAX_APP_TOTAL_ARG_LEN {
        return Err(LedgerError::InvalidCall(format!(
            "{} argument bytes exceed the limit of {}",
            total, MAX_APP_TOTAL_ARG_LEN
        )));
    }
    if call.is_create()
        && matches!(
            call.on_completion,
            OnComplete::ClearState | OnComplete::UpdateApplication | OnComplete::DeleteApplication
        )
    {
        return Err(LedgerError::InvalidCall(format!(
            "{} cannot create an application",
            call.on_completion
        )));
    }
    for program in [&call.approval, &call.clear].into_iter().flatten() {
        if program.len() > MAX_APP_PROGRAM_LEN {
            return Err(LedgerError::InvalidCall(format!(
                "program of {} bytes exceeds the limit of {}",
                program.len(),
                MAX_APP_PROGRAM_LEN
            )));
        }
    }
    Ok(())
}

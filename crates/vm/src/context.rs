//! Transaction and global state visible to a running program.

use crate::error::{VmError, VmResult};
use crate::stack_value::StackValue;
use avm_config::ADDRESS_SIZE;
use avm_teal::{GlobalField, OnComplete, TxnField};

/// A 32-byte account address.
pub type Address = [u8; ADDRESS_SIZE];

/// Default minimum transaction fee in microAlgos.
pub const DEFAULT_MIN_TXN_FEE: u64 = 1000;

/// The application call being evaluated together with the global view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub sender: Address,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub note: Vec<u8>,
    pub group_index: u64,
    /// Zero while the application is being created.
    pub application_id: u64,
    pub on_completion: OnComplete,
    pub application_args: Vec<Vec<u8>>,

    pub creator_address: Address,
    pub current_application_id: u64,
    pub group_size: u64,
    pub round: u64,
    pub latest_timestamp: u64,
    pub min_txn_fee: u64,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            sender: [0; ADDRESS_SIZE],
            fee: DEFAULT_MIN_TXN_FEE,
            first_valid: 1,
            last_valid: 1001,
            note: Vec::new(),
            group_index: 0,
            application_id: 0,
            on_completion: OnComplete::NoOp,
            application_args: Vec::new(),
            creator_address: [0; ADDRESS_SIZE],
            current_application_id: 0,
            group_size: 1,
            round: 1,
            latest_timestamp: 0,
            min_txn_fee: DEFAULT_MIN_TXN_FEE,
        }
    }
}

impl ExecutionContext {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            ..Self::default()
        }
    }

    pub fn with_application(mut self, application_id: u64, creator: Address) -> Self {
        self.application_id = application_id;
        self.current_application_id = application_id;
        self.creator_address = creator;
        self
    }

    pub fn with_on_completion(mut self, on_completion: OnComplete) -> Self {
        self.on_completion = on_completion;
        self
    }

    pub fn with_args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.application_args = args;
        self
    }

    pub fn with_round(mut self, round: u64, latest_timestamp: u64) -> Self {
        self.round = round;
        self.latest_timestamp = latest_timestamp;
        self
    }

    /// Value of a scalar transaction field.
    pub fn txn(&self, field: TxnField) -> VmResult<StackValue> {
        Ok(match field {
            TxnField::Sender => StackValue::from(&self.sender[..]),
            TxnField::Fee => self.fee.into(),
            TxnField::FirstValid => self.first_valid.into(),
            TxnField::LastValid => self.last_valid.into(),
            TxnField::Note => self.note.clone().into(),
            TxnField::GroupIndex => self.group_index.into(),
            TxnField::ApplicationID => self.application_id.into(),
            TxnField::OnCompletion => (self.on_completion as u64).into(),
            TxnField::NumAppArgs => (self.application_args.len() as u64).into(),
            TxnField::ApplicationArgs => {
                return Err(VmError::InvalidField {
                    opcode: "txn",
                    field: field as u8,
                })
            }
        })
    }

    /// Element `index` of an array transaction field.
    pub fn txna(&self, field: TxnField, index: usize) -> VmResult<StackValue> {
        match field {
            TxnField::ApplicationArgs => self
                .application_args
                .get(index)
                .map(|arg| StackValue::Bytes(arg.clone()))
                .ok_or(VmError::IndexOutOfRange {
                    field: "ApplicationArgs",
                    index,
                    len: self.application_args.len(),
                }),
            _ => Err(VmError::InvalidField {
                opcode: "txna",
                field: field as u8,
            }),
        }
    }

    pub fn global(&self, field: GlobalField) -> StackValue {
        match field {
            GlobalField::MinTxnFee => self.min_txn_fee.into(),
            GlobalField::ZeroAddress => StackValue::Bytes(vec![0; ADDRESS_SIZE]),
            GlobalField::GroupSize => self.group_size.into(),
            GlobalField::Round => self.round.into(),
            GlobalField::LatestTimestamp => self.latest_timestamp.into(),
            GlobalField::CurrentApplicationID => self.current_application_id.into(),
            GlobalField::CreatorAddress => StackValue::from(&self.creator_address[..]),
        }
    }
}

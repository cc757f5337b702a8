//! Transaction and global fields, and on-completion actions.

use std::fmt;

/// Fields readable with `txn` / `txna`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxnField {
    Sender = 0,
    Fee = 1,
    FirstValid = 2,
    LastValid = 4,
    Note = 5,
    GroupIndex = 22,
    ApplicationID = 24,
    OnCompletion = 25,
    ApplicationArgs = 26,
    NumAppArgs = 27,
}

impl TxnField {
    pub const ALL: [TxnField; 10] = [
        TxnField::Sender,
        TxnField::Fee,
        TxnField::FirstValid,
        TxnField::LastValid,
        TxnField::Note,
        TxnField::GroupIndex,
        TxnField::ApplicationID,
        TxnField::OnCompletion,
        TxnField::ApplicationArgs,
        TxnField::NumAppArgs,
    ];

    pub fn from_u8(index: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| *field as u8 == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            TxnField::Sender => "Sender",
            TxnField::Fee => "Fee",
            TxnField::FirstValid => "FirstValid",
            TxnField::LastValid => "LastValid",
            TxnField::Note => "Note",
            TxnField::GroupIndex => "GroupIndex",
            TxnField::ApplicationID => "ApplicationID",
            TxnField::OnCompletion => "OnCompletion",
            TxnField::ApplicationArgs => "ApplicationArgs",
            TxnField::NumAppArgs => "NumAppArgs",
        }
    }

    /// Array fields are only readable through `txna`.
    pub fn is_array(self) -> bool {
        matches!(self, TxnField::ApplicationArgs)
    }

    pub fn min_version(self) -> u8 {
        match self {
            TxnField::ApplicationID
            | TxnField::OnCompletion
            | TxnField::ApplicationArgs
            | TxnField::NumAppArgs => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for TxnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields readable with `global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GlobalField {
    MinTxnFee = 0,
    ZeroAddress = 3,
    GroupSize = 4,
    Round = 6,
    LatestTimestamp = 7,
    CurrentApplicationID = 8,
    CreatorAddress = 9,
}

impl GlobalField {
    pub const ALL: [GlobalField; 7] = [
        GlobalField::MinTxnFee,
        GlobalField::ZeroAddress,
        GlobalField::GroupSize,
        GlobalField::Round,
        GlobalField::LatestTimestamp,
        GlobalField::CurrentApplicationID,
        GlobalField::CreatorAddress,
    ];

    pub fn from_u8(index: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| *field as u8 == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            GlobalField::MinTxnFee => "MinTxnFee",
            GlobalField::ZeroAddress => "ZeroAddress",
            GlobalField::GroupSize => "GroupSize",
            GlobalField::Round => "Round",
            GlobalField::LatestTimestamp => "LatestTimestamp",
            GlobalField::CurrentApplicationID => "CurrentApplicationID",
            GlobalField::CreatorAddress => "CreatorAddress",
        }
    }

    pub fn min_version(self) -> u8 {
        match self {
            GlobalField::Round | GlobalField::LatestTimestamp | GlobalField::CurrentApplicationID => 2,
            GlobalField::CreatorAddress => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for GlobalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `OnCompletion` action of an application call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum OnComplete {
    #[default]
    NoOp = 0,
    OptIn = 1,
    CloseOut = 2,
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

impl OnComplete {
    pub const ALL: [OnComplete; 6] = [
        OnComplete::NoOp,
        OnComplete::OptIn,
        OnComplete::CloseOut,
        OnComplete::ClearState,
        OnComplete::UpdateApplication,
        OnComplete::DeleteApplication,
    ];

    pub fn from_u64(value: u64) -> Option<Self> {
        Self::ALL.iter().copied().find(|oc| *oc as u64 == value)
    }

    /// Named integer constant usable as `int NoOp` in TEAL.
    pub fn name(self) -> &'static str {
        match self {
            OnComplete::NoOp => "NoOp",
            OnComplete::OptIn => "OptIn",
            OnComplete::CloseOut => "CloseOut",
            OnComplete::ClearState => "ClearState",
            OnComplete::UpdateApplication => "UpdateApplication",
            OnComplete::DeleteApplication => "DeleteApplication",
        }
    }
}

impl fmt::Display for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

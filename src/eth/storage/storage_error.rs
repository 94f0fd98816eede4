use crate::eth::primitives::Address;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;

#[derive(Debug, thiserror::Error, strum::EnumIs)]
pub enum StorageError {
    /// Account being created already exists.
    #[error("Account {address} already exists in the ledger state.")]
    AccountAlreadyExists { address: Address },

    /// Mutation targeted an account that does not exist.
    #[error("Account {address} does not exist in the ledger state.")]
    UnknownAccount { address: Address },

    /// Code installation targeted an account that already holds code.
    #[error("Account {address} already has code installed.")]
    CodeAlreadySet { address: Address },

    /// Engine change-set no longer matches the state it was computed from.
    #[error("Execution conflict on account {address} slot {index}: expected {expected}, found {found}.")]
    ExecutionConflict {
        address: Address,
        index: SlotIndex,
        expected: SlotValue,
        found: SlotValue,
    },

    /// Generic error interacting with the storage.
    #[error("Unexpected storage error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

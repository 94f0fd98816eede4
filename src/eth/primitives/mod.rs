mod account;
mod address;
mod bytes;
mod execution;
mod execution_account_changes;
mod execution_result;
mod execution_value_change;
mod gas;
mod nonce;
mod slot;
mod wei;

pub use account::Account;
pub use address::Address;
pub use bytes::Bytes;
pub use execution::EvmExecution;
pub use execution_account_changes::ExecutionAccountChanges;
pub use execution_result::ExecutionResult;
pub use execution_value_change::ExecutionValueChange;
pub use gas::Gas;
pub use nonce::Nonce;
pub use slot::Slot;
pub use slot::SlotIndex;
pub use slot::SlotValue;
pub use wei::Wei;

use crate::eth::primitives::Account;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::Nonce;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;
use crate::eth::primitives::Wei;
use crate::eth::storage::StorageError;

/// Account and storage state mirrored from the host ledger.
///
/// Mutations are applied only through [`StateView::sync`](crate::eth::storage::StateView::sync),
/// never directly while a call is executing.
pub trait LedgerStorage: Send + Sync + 'static {
    /// Retrieves an account from the storage. Absence is `None`, not an error.
    fn read_account(&self, address: Address) -> Result<Option<Account>, StorageError>;

    /// Creates a new empty account. Creating an address that already exists is
    /// an error: callers are expected to check existence first.
    fn create_account(&self, address: Address) -> Result<(), StorageError>;

    /// Sets the nonce of an existing account.
    fn set_nonce(&self, address: Address, nonce: Nonce) -> Result<(), StorageError>;

    /// Sets the balance of an existing account.
    fn set_balance(&self, address: Address, balance: Wei) -> Result<(), StorageError>;

    /// Installs code on an existing account. Code is installed at most once:
    /// overwriting non-empty code is an error.
    fn set_code(&self, address: Address, code: Bytes) -> Result<(), StorageError>;

    /// Retrieves a storage slot. Unset slots read as zero.
    fn read_slot(&self, address: Address, index: SlotIndex) -> Result<SlotValue, StorageError>;

    /// Writes a storage slot of an existing account.
    fn set_slot(&self, address: Address, index: SlotIndex, value: SlotValue) -> Result<(), StorageError>;
}

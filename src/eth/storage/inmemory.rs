//! In-memory ledger storage implementation.

use std::collections::HashMap;

use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;

use crate::eth::primitives::Account;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::Nonce;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;
use crate::eth::primitives::Wei;
use crate::eth::storage::LedgerStorage;
use crate::eth::storage::StorageError;

#[derive(Debug, Default)]
struct InMemoryLedgerStorageState {
    /// Every account known to the bridge.
    accounts: HashMap<Address, Account>,

    /// Storage slots of contract accounts. An entry is only ever written for
    /// an address present in `accounts`.
    slots: HashMap<(Address, SlotIndex), SlotValue>,
}

/// In-memory mirror of the host ledger accounts and storage.
#[derive(Debug)]
pub struct InMemoryLedgerStorage {
    state: RwLock<InMemoryLedgerStorageState>,
}

impl InMemoryLedgerStorage {
    // -------------------------------------------------------------------------
    // Lock methods
    // -------------------------------------------------------------------------

    /// Locks inner state for reading.
    fn lock_read(&self) -> RwLockReadGuard<'_, InMemoryLedgerStorageState> {
        self.state.read()
    }

    /// Locks inner state for writing.
    fn lock_write(&self) -> RwLockWriteGuard<'_, InMemoryLedgerStorageState> {
        self.state.write()
    }
}

impl Default for InMemoryLedgerStorage {
    fn default() -> Self {
        tracing::info!("creating inmemory ledger storage");
        Self {
            state: RwLock::new(InMemoryLedgerStorageState::default()),
        }
    }
}

impl LedgerStorage for InMemoryLedgerStorage {
    fn read_account(&self, address: Address) -> Result<Option<Account>, StorageError> {
        let state = self.lock_read();
        match state.accounts.get(&address) {
            Some(account) => {
                tracing::trace!(%address, "account found");
                Ok(Some(account.clone()))
            }
            None => {
                tracing::trace!(%address, "account not found");
                Ok(None)
            }
        }
    }

    fn create_account(&self, address: Address) -> Result<(), StorageError> {
        let mut state = self.lock_write();
        if state.accounts.contains_key(&address) {
            return Err(StorageError::AccountAlreadyExists { address });
        }
        state.accounts.insert(address, Account::new_empty(address));
        tracing::debug!(%address, "account created");
        Ok(())
    }

    fn set_nonce(&self, address: Address, nonce: Nonce) -> Result<(), StorageError> {
        let mut state = self.lock_write();
        match state.accounts.get_mut(&address) {
            Some(account) => {
                account.nonce = nonce;
                Ok(())
            }
            None => Err(StorageError::UnknownAccount { address }),
        }
    }

    fn set_balance(&self, address: Address, balance: Wei) -> Result<(), StorageError> {
        let mut state = self.lock_write();
        match state.accounts.get_mut(&address) {
            Some(account) => {
                account.balance = balance;
                Ok(())
            }
            None => Err(StorageError::UnknownAccount { address }),
        }
    }

    fn set_code(&self, address: Address, code: Bytes) -> Result<(), StorageError> {
        let mut state = self.lock_write();
        match state.accounts.get_mut(&address) {
            Some(account) if account.is_contract() => Err(StorageError::CodeAlreadySet { address }),
            Some(account) => {
                tracing::debug!(%address, code = %code, "code installed");
                account.bytecode = code;
                Ok(())
            }
            None => Err(StorageError::UnknownAccount { address }),
        }
    }

    fn read_slot(&self, address: Address, index: SlotIndex) -> Result<SlotValue, StorageError> {
        let state = self.lock_read();
        let value = state.slots.get(&(address, index)).copied().unwrap_or_default();
        tracing::trace!(%address, %index, %value, "slot read");
        Ok(value)
    }

    fn set_slot(&self, address: Address, index: SlotIndex, value: SlotValue) -> Result<(), StorageError> {
        let mut state = self.lock_write();
        if !state.accounts.contains_key(&address) {
            return Err(StorageError::UnknownAccount { address });
        }
        state.slots.insert((address, index), value);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

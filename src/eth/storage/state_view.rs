//! Buffering overlay used by one call execution.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::eth::primitives::Account;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::EvmExecution;
use crate::eth::primitives::Nonce;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;
use crate::eth::primitives::Wei;
use crate::eth::storage::LedgerStorage;
use crate::eth::storage::StorageError;

/// One buffered mutation. Replayed against the ledger storage on [`StateView::sync`].
#[derive(Debug, Clone)]
pub enum StateWrite {
    CreateAccount { address: Address },
    SetNonce { address: Address, nonce: Nonce },
    SetBalance { address: Address, balance: Wei },
    SetCode { address: Address, code: Bytes },
    SetSlot { address: Address, index: SlotIndex, value: SlotValue },
}

/// Working state of a single call.
///
/// Reads fall through to the backing ledger storage; writes stay buffered and
/// invisible to it until [`StateView::sync`] applies them. The view never owns
/// the ledger storage, and a view that is dropped without synchronizing
/// discards its writes.
pub struct StateView {
    ledger: Arc<dyn LedgerStorage>,

    /// Accounts read for mutation or created during the call.
    accounts: HashMap<Address, Account>,

    /// Slots written during the call.
    slots: HashMap<(Address, SlotIndex), SlotValue>,

    /// Buffered writes in the order they were made.
    writes: Vec<StateWrite>,
}

impl StateView {
    pub fn new(ledger: Arc<dyn LedgerStorage>) -> Self {
        Self {
            ledger,
            accounts: HashMap::new(),
            slots: HashMap::new(),
            writes: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Read operations
    // -------------------------------------------------------------------------

    /// Retrieves an account, preferring the buffered copy over the ledger one.
    pub fn read_account(&self, address: Address) -> Result<Option<Account>, StorageError> {
        if let Some(account) = self.accounts.get(&address) {
            return Ok(Some(account.clone()));
        }
        self.ledger.read_account(address)
    }

    /// Retrieves a slot, preferring the buffered value over the ledger one.
    pub fn read_slot(&self, address: Address, index: SlotIndex) -> Result<SlotValue, StorageError> {
        if let Some(value) = self.slots.get(&(address, index)) {
            return Ok(*value);
        }
        self.ledger.read_slot(address, index)
    }

    // -------------------------------------------------------------------------
    // Write operations
    // -------------------------------------------------------------------------

    /// Buffers the creation of a new empty account.
    pub fn create_account(&mut self, address: Address) -> Result<(), StorageError> {
        if self.read_account(address)?.is_some() {
            return Err(StorageError::AccountAlreadyExists { address });
        }
        self.accounts.insert(address, Account::new_empty(address));
        self.writes.push(StateWrite::CreateAccount { address });
        tracing::debug!(%address, "account created in state view");
        Ok(())
    }

    /// Buffers a nonce change of an existing account.
    pub fn set_nonce(&mut self, address: Address, nonce: Nonce) -> Result<(), StorageError> {
        self.account_mut(address)?.nonce = nonce;
        self.writes.push(StateWrite::SetNonce { address, nonce });
        Ok(())
    }

    /// Buffers a balance change of an existing account.
    pub fn set_balance(&mut self, address: Address, balance: Wei) -> Result<(), StorageError> {
        self.account_mut(address)?.balance = balance;
        self.writes.push(StateWrite::SetBalance { address, balance });
        Ok(())
    }

    /// Buffers a code installation on an existing account that holds no code yet.
    pub fn set_code(&mut self, address: Address, code: Bytes) -> Result<(), StorageError> {
        let account = self.account_mut(address)?;
        if account.is_contract() {
            return Err(StorageError::CodeAlreadySet { address });
        }
        account.bytecode = code.clone();
        self.writes.push(StateWrite::SetCode { address, code });
        Ok(())
    }

    /// Buffers a slot write of an existing account.
    pub fn set_slot(&mut self, address: Address, index: SlotIndex, value: SlotValue) -> Result<(), StorageError> {
        if self.read_account(address)?.is_none() {
            return Err(StorageError::UnknownAccount { address });
        }
        self.slots.insert((address, index), value);
        self.writes.push(StateWrite::SetSlot { address, index, value });
        Ok(())
    }

    /// Returns the buffered account for mutation, loading it from the ledger
    /// on first access.
    fn account_mut(&mut self, address: Address) -> Result<&mut Account, StorageError> {
        match self.accounts.entry(address) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => match self.ledger.read_account(address)? {
                Some(account) => Ok(entry.insert(account)),
                None => Err(StorageError::UnknownAccount { address }),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Execution changes
    // -------------------------------------------------------------------------

    /// Applies an engine change-set through the buffered write surface.
    ///
    /// Slot originals recorded by the engine are checked against the current
    /// view first; a mismatch means the state changed under the execution and
    /// nothing is applied.
    pub fn apply_execution(&mut self, execution: &EvmExecution) -> Result<(), StorageError> {
        for change in &execution.changes {
            for (index, slot_change) in &change.slots {
                if let Some(expected) = slot_change.take_original_ref() {
                    let found = self.read_slot(change.address, *index)?;
                    if found != *expected {
                        return Err(StorageError::ExecutionConflict {
                            address: change.address,
                            index: *index,
                            expected: *expected,
                            found,
                        });
                    }
                }
            }
        }

        for change in &execution.changes {
            let account = match self.read_account(change.address)? {
                Some(account) => account,
                None => {
                    self.create_account(change.address)?;
                    Account::new_empty(change.address)
                }
            };

            if let Some(nonce) = change.nonce.take_modified_ref() {
                self.set_nonce(change.address, *nonce)?;
            }
            if let Some(balance) = change.balance.take_modified_ref() {
                self.set_balance(change.address, *balance)?;
            }
            if let Some(bytecode) = change.bytecode.take_modified_ref() {
                // code of an account created during the execution, e.g. by an
                // inner CREATE; code of the callee is never overwritten
                if !account.is_contract() {
                    self.set_code(change.address, bytecode.clone())?;
                }
            }
            for (index, slot_change) in &change.slots {
                if let Some(value) = slot_change.take_modified_ref() {
                    self.set_slot(change.address, *index, *value)?;
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Synchronization
    // -------------------------------------------------------------------------

    /// Applies every buffered write to the backing ledger storage in the order
    /// the writes were made.
    ///
    /// All-or-nothing from the ledger's viewpoint: the whole write log is
    /// validated against the ledger before the first write is applied, so a
    /// failed sync leaves the ledger untouched. Consumes the view, a
    /// synchronized view cannot be reused.
    pub fn sync(self) -> Result<(), StorageError> {
        tracing::debug!(writes = self.writes.len(), "synchronizing state view");

        // validation phase
        let mut created: HashSet<Address> = HashSet::new();
        let mut coded: HashSet<Address> = HashSet::new();
        for write in &self.writes {
            match write {
                StateWrite::CreateAccount { address } => {
                    if created.contains(address) || self.ledger.read_account(*address)?.is_some() {
                        return Err(StorageError::AccountAlreadyExists { address: *address });
                    }
                    created.insert(*address);
                }
                StateWrite::SetNonce { address, .. } | StateWrite::SetBalance { address, .. } | StateWrite::SetSlot { address, .. } => {
                    self.validate_exists(&created, *address)?;
                }
                StateWrite::SetCode { address, .. } => {
                    let existing = self.validate_exists(&created, *address)?;
                    let already_coded = coded.contains(address) || existing.is_some_and(|account| account.is_contract());
                    if already_coded {
                        return Err(StorageError::CodeAlreadySet { address: *address });
                    }
                    coded.insert(*address);
                }
            }
        }

        // apply phase
        for write in self.writes {
            match write {
                StateWrite::CreateAccount { address } => self.ledger.create_account(address)?,
                StateWrite::SetNonce { address, nonce } => self.ledger.set_nonce(address, nonce)?,
                StateWrite::SetBalance { address, balance } => self.ledger.set_balance(address, balance)?,
                StateWrite::SetCode { address, code } => self.ledger.set_code(address, code)?,
                StateWrite::SetSlot { address, index, value } => self.ledger.set_slot(address, index, value)?,
            }
        }
        Ok(())
    }

    /// Validation helper: the target account must exist in the ledger or be
    /// created earlier in the write log.
    fn validate_exists(&self, created: &HashSet<Address>, address: Address) -> Result<Option<Account>, StorageError> {
        let existing = self.ledger.read_account(address)?;
        if existing.is_none() && !created.contains(&address) {
            return Err(StorageError::UnknownAccount { address });
        }
        Ok(existing)
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

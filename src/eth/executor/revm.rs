//! EVM implementation using [`revm`](https://crates.io/crates/revm).

use revm::primitives::EVMError;
use revm::primitives::SpecId;
use revm::primitives::TransactTo;
use revm::Database;
use revm::EVM;

use crate::alias::RevmAccount;
use crate::alias::RevmAccountInfo;
use crate::alias::RevmAddress;
use crate::alias::RevmB256;
use crate::alias::RevmBytecode;
use crate::alias::RevmExecutionResult;
use crate::alias::RevmState;
use crate::alias::RevmU256;
use crate::eth::executor::Evm;
use crate::eth::executor::EvmError;
use crate::eth::executor::EvmInput;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::EvmExecution;
use crate::eth::primitives::ExecutionAccountChanges;
use crate::eth::primitives::ExecutionResult;
use crate::eth::primitives::ExecutionValueChange;
use crate::eth::primitives::Gas;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;
use crate::eth::storage::StateView;
use crate::eth::storage::StorageError;
use crate::ext::not;

/// Execution engine backed by [`revm`].
pub struct Revm {
    spec: SpecId,
}

impl Revm {
    /// Creates a new instance of the engine ready to be used.
    pub fn new(spec: SpecId) -> Self {
        tracing::info!(?spec, "creating revm engine");
        Self { spec }
    }
}

impl Evm for Revm {
    fn execute(&self, view: &StateView, input: EvmInput) -> Result<EvmExecution, EvmError> {
        let mut evm = EVM::new();

        // evm global config
        evm.env.cfg.spec_id = self.spec;
        evm.env.cfg.limit_contract_code_size = Some(usize::MAX);

        // evm block config
        evm.env.block.number = RevmU256::from(input.block_number);
        evm.env.block.timestamp = RevmU256::from(input.block_timestamp);
        evm.env.block.gas_limit = RevmU256::from(input.gas_limit.as_u64());

        // evm transaction config
        evm.env.tx.caller = input.caller.into();
        evm.env.tx.transact_to = TransactTo::Call(input.callee.into());
        evm.env.tx.data = input.data.clone().into();
        evm.env.tx.value = input.value.into();
        evm.env.tx.gas_limit = input.gas_limit.as_u64();
        evm.env.tx.gas_price = RevmU256::ZERO;
        evm.env.tx.nonce = None;

        evm.database(StateViewDatabase {
            view,
            executing: (input.callee, input.bytecode.clone()),
        });

        let result_and_state = match evm.transact() {
            Ok(result) => result,
            Err(EVMError::Database(e)) => return Err(EvmError::Storage(e)),
            Err(e) => {
                tracing::error!(reason = ?e, "unexpected error in engine execution");
                return Err(EvmError::Unexpected(format!("{e:?}")));
            }
        };

        let execution = match result_and_state.result {
            RevmExecutionResult::Success { output, gas_used, .. } => EvmExecution {
                result: ExecutionResult::Success,
                output: output.into(),
                gas: Gas::from(gas_used),
                changes: storage_changes(result_and_state.state),
            },
            RevmExecutionResult::Revert { output, gas_used } => EvmExecution {
                result: ExecutionResult::Reverted,
                output: output.into(),
                gas: Gas::from(gas_used),
                changes: Vec::new(),
            },
            RevmExecutionResult::Halt { reason, gas_used } => EvmExecution {
                result: ExecutionResult::Halted { reason: format!("{reason:?}") },
                output: Bytes::default(),
                gas: Gas::from(gas_used),
                changes: Vec::new(),
            },
        };
        Ok(execution)
    }
}

/// Converts the engine's final state into a change-set ordered by account address.
fn storage_changes(state: RevmState) -> Vec<ExecutionAccountChanges> {
    let mut touched: Vec<(RevmAddress, RevmAccount)> = state.into_iter().collect();
    touched.sort_by_key(|(address, _)| *address);

    let mut changes = Vec::with_capacity(touched.len());
    for (revm_address, account) in touched {
        let address: Address = revm_address.into();
        if not(account.is_touched()) || address.is_zero() {
            continue;
        }

        let mut change = ExecutionAccountChanges::new(address);
        change.nonce = ExecutionValueChange::from_modified(account.info.nonce.into());
        change.balance = ExecutionValueChange::from_modified(account.info.balance.into());

        // code only for accounts created during this execution; executed code
        // is shipped by the host and tracked by the dispatcher instead
        if account.is_created() {
            if let Some(bytecode) = account.info.code {
                let code = Bytes::from(bytecode);
                if not(code.is_empty()) {
                    change.bytecode = ExecutionValueChange::from_modified(code);
                }
            }
        }

        let mut slots: Vec<(SlotIndex, ExecutionValueChange<SlotValue>)> = account
            .storage
            .into_iter()
            .filter(|(_, slot)| slot.is_changed())
            .map(|(index, slot)| {
                let mut slot_change = ExecutionValueChange::from_original(slot.original_value().into());
                slot_change.set_modified(slot.present_value().into());
                (SlotIndex::from(index), slot_change)
            })
            .collect();
        slots.sort_by_key(|(index, _)| *index);
        change.slots = slots;

        changes.push(change);
    }
    changes
}

// -----------------------------------------------------------------------------
// Database
// -----------------------------------------------------------------------------

/// Read-only adapter exposing a [`StateView`] to the engine.
struct StateViewDatabase<'a> {
    view: &'a StateView,

    /// Bytecode executed at the callee in this call, overriding any stored
    /// code. No override when empty: the callee's stored code runs.
    executing: (Address, Bytes),
}

impl Database for StateViewDatabase<'_> {
    type Error = StorageError;

    fn basic(&mut self, address: RevmAddress) -> Result<Option<RevmAccountInfo>, Self::Error> {
        let address: Address = address.into();
        let Some(mut account) = self.view.read_account(address)? else {
            return Ok(None);
        };
        if address == self.executing.0 && not(self.executing.1.is_empty()) {
            account.bytecode = self.executing.1.clone();
        }
        Ok(Some(account.into()))
    }

    fn code_by_hash(&mut self, _: RevmB256) -> Result<RevmBytecode, Self::Error> {
        // never reached: accounts carry their code inline in `basic`
        Ok(RevmBytecode::new())
    }

    fn storage(&mut self, address: RevmAddress, index: RevmU256) -> Result<RevmU256, Self::Error> {
        let value = self.view.read_slot(address.into(), index.into())?;
        Ok(value.into())
    }

    fn block_hash(&mut self, number: RevmU256) -> Result<RevmB256, Self::Error> {
        Ok(revm::primitives::keccak256(&number.to_be_bytes::<32>()))
    }
}

use std::str::FromStr;
use std::sync::Arc;

use display_json::DebugAsJson;

use crate::eth::executor::Evm;
use crate::eth::executor::EvmError;
use crate::eth::executor::EvmInput;
use crate::eth::executor::ExecutorConfig;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::Gas;
use crate::eth::primitives::Wei;
use crate::eth::storage::LedgerStorage;
use crate::eth::storage::StateView;
use crate::eth::storage::StorageError;

/// Call request received from the host ledger.
///
/// Payloads are hex text because the host boundary cannot carry raw bytes
/// containing the zero byte.
#[derive(DebugAsJson, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallRequest {
    /// Bytecode to execute, hex-encoded. When empty on a regular call, the
    /// callee's stored code runs instead.
    pub bytecode: String,

    /// Call input data, hex-encoded.
    pub input: String,

    /// Identifier of the calling ledger account.
    pub caller: String,

    /// Identifier of the called account: a name registered with the ledger, a
    /// hex address of a deployed contract, or empty to signal a creation call.
    pub callee: String,
}

impl CallRequest {
    pub fn new(
        bytecode: impl Into<String>,
        input: impl Into<String>,
        caller: impl Into<String>,
        callee: impl Into<String>,
    ) -> Self {
        Self {
            bytecode: bytecode.into(),
            input: input.into(),
            caller: caller.into(),
            callee: callee.into(),
        }
    }
}

/// Call outcome returned to the host ledger.
#[derive(DebugAsJson, Clone, serde::Serialize)]
pub struct CallOutcome {
    /// Bytes returned by the execution, hex-encoded lowercase with every byte
    /// as exactly two characters.
    pub output: String,

    /// Whether the execution completed normally.
    pub success: bool,

    /// Address a creation call deployed to. `None` for regular calls.
    pub deployed: Option<Address>,
}

/// Errors of the call operation itself, as opposed to failures of the
/// executed bytecode which are reported through [`CallOutcome::success`].
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Malformed hex in bytecode or call input. The call was aborted before
    /// touching any state.
    #[error("Failed to decode hex payload: {0}")]
    Decode(#[from] const_hex::FromHexError),

    /// The engine itself failed.
    #[error(transparent)]
    Engine(#[from] EvmError),

    /// Invariant violation while staging call state.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Buffered call state could not be applied to the ledger storage. The
    /// host must treat the bridge state as suspect and stop processing.
    #[error("Failed to synchronize call state into the ledger: {0}")]
    FatalSync(StorageError),
}

/// Call dispatcher: bundles the ledger storage, the execution engine and the
/// executor configuration. Constructed once and shared by reference.
pub struct Executor {
    /// Account/storage cache mirroring the host ledger.
    ledger: Arc<dyn LedgerStorage>,

    /// Execution engine that runs the bytecode.
    evm: Box<dyn Evm>,

    config: ExecutorConfig,
}

impl Executor {
    pub fn new(ledger: Arc<dyn LedgerStorage>, evm: Box<dyn Evm>, config: ExecutorConfig) -> Self {
        Self { ledger, evm, config }
    }

    /// Executes EVM bytecode on behalf of the host ledger.
    ///
    /// Resolves caller and callee addresses, creates the callee account when
    /// it is absent, runs the engine against a buffered state view and
    /// synchronizes the view into the ledger storage. A creation call (empty
    /// callee identifier) additionally installs the engine output as the new
    /// account's code.
    pub fn call(&self, request: CallRequest) -> Result<CallOutcome, CallError> {
        // decoded before anything is staged: a malformed call must not touch state
        let bytecode = Bytes::from(const_hex::decode(&request.bytecode)?);
        let data = Bytes::from(const_hex::decode(&request.input)?);

        let caller = Address::derive(&request.caller);
        let mut view = StateView::new(Arc::clone(&self.ledger));

        let is_creation = request.callee.is_empty();
        let caller_nonce = view.read_account(caller)?.map(|account| account.nonce).unwrap_or_default();
        let callee = if is_creation {
            Address::for_contract(&caller, caller_nonce)
        } else {
            resolve_callee(&request.callee)
        };
        tracing::debug!(%caller, %callee, is_creation, "dispatching call");

        let should_create = view.read_account(callee)?.is_none();
        if should_create {
            view.create_account(callee)?;
        }

        let input = EvmInput {
            caller,
            callee,
            bytecode,
            data,
            value: Wei::ZERO,
            gas_limit: Gas::from(self.config.executor_gas_limit),
            block_number: 0,
            block_timestamp: 0,
        };
        let execution = self.evm.execute(&view, input)?;

        // a failed execution's engine writes are never synchronized
        if execution.is_success() {
            view.apply_execution(&execution)?;
        } else {
            tracing::warn!(result = %execution.result, output = %execution.output, "execution failed");
        }

        if should_create && (execution.is_success() || self.config.executor_deploy_on_revert) {
            view.set_code(callee, execution.output.clone())?;
        }

        // every creation call consumes the caller nonce, whether or not the
        // engine changes carrying the bump were kept
        if is_creation {
            let current_nonce = view.read_account(caller)?.map(|account| account.nonce).unwrap_or_default();
            if current_nonce == caller_nonce {
                if view.read_account(caller)?.is_none() {
                    view.create_account(caller)?;
                }
                view.set_nonce(caller, caller_nonce.next())?;
            }
        }

        if let Err(e) = view.sync() {
            tracing::error!(reason = ?e, "failed to synchronize state view");
            return Err(CallError::FatalSync(e));
        }

        Ok(CallOutcome {
            output: const_hex::encode(execution.output.as_ref()),
            success: execution.is_success(),
            deployed: if is_creation { Some(callee) } else { None },
        })
    }
}

/// Resolves a callee identifier: a hex address literal is used as-is, anything
/// else is treated as a ledger identifier and derived.
fn resolve_callee(callee: &str) -> Address {
    match Address::from_str(callee) {
        Ok(address) => address,
        Err(_) => Address::derive(callee),
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::eth::primitives::EvmExecution;
    use crate::eth::primitives::ExecutionAccountChanges;
    use crate::eth::primitives::ExecutionResult;
    use crate::eth::primitives::ExecutionValueChange;
    use crate::eth::primitives::Nonce;
    use crate::eth::primitives::SlotIndex;
    use crate::eth::primitives::SlotValue;
    use crate::eth::storage::InMemoryLedgerStorage;

    /// Engine double that returns queued executions and records its inputs.
    struct StubEvm {
        executions: Mutex<Vec<EvmExecution>>,
        inputs: Mutex<Vec<EvmInput>>,
    }

    impl StubEvm {
        fn new(executions: Vec<EvmExecution>) -> Self {
            Self {
                executions: Mutex::new(executions),
                inputs: Mutex::new(Vec::new()),
            }
        }
    }

    impl Evm for Arc<StubEvm> {
        fn execute(&self, _: &StateView, input: EvmInput) -> Result<EvmExecution, EvmError> {
            self.inputs.lock().unwrap().push(input);
            Ok(self.executions.lock().unwrap().remove(0))
        }
    }

    fn execution(result: ExecutionResult, output: &[u8]) -> EvmExecution {
        EvmExecution {
            result,
            output: Bytes::from(output),
            gas: Gas::from(21_000),
            changes: Vec::new(),
        }
    }

    fn test_config(deploy_on_revert: bool) -> ExecutorConfig {
        ExecutorConfig {
            executor_gas_limit: 1_000_000,
            executor_deploy_on_revert: deploy_on_revert,
            executor_evm_spec: revm::primitives::SpecId::LONDON,
        }
    }

    fn testenv(executions: Vec<EvmExecution>) -> (Executor, Arc<InMemoryLedgerStorage>, Arc<StubEvm>) {
        let ledger = Arc::new(InMemoryLedgerStorage::default());
        let stub = Arc::new(StubEvm::new(executions));
        let executor = Executor::new(
            Arc::clone(&ledger) as Arc<dyn LedgerStorage>,
            Box::new(Arc::clone(&stub)),
            test_config(false),
        );
        (executor, ledger, stub)
    }

    #[test]
    fn absent_callee_is_created_and_receives_code() {
        let (executor, ledger, _) = testenv(vec![execution(ExecutionResult::Success, &[0xfe, 0x0f])]);

        let outcome = executor
            .call(CallRequest::new("6000", "", "admin@test", "token@test"))
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output, "fe0f");
        assert!(outcome.deployed.is_none());

        let account = ledger.read_account(Address::derive("token@test")).unwrap().unwrap();
        assert_eq!(account.bytecode, Bytes::from(vec![0xfe, 0x0f]));
    }

    #[test]
    fn existing_callee_keeps_its_code() {
        let token = Address::derive("token@test");
        let (executor, ledger, _) = testenv(vec![execution(ExecutionResult::Success, &[0xaa])]);
        ledger.create_account(token).unwrap();
        ledger.set_code(token, Bytes::from(vec![0xfe])).unwrap();

        let outcome = executor.call(CallRequest::new("", "6000", "admin@test", "token@test")).unwrap();
        assert!(outcome.success);

        // the engine output is returned but not installed
        let account = ledger.read_account(token).unwrap().unwrap();
        assert_eq!(account.bytecode, Bytes::from(vec![0xfe]));
    }

    #[test]
    fn creation_call_deploys_to_fresh_address_and_bumps_nonce() {
        let caller = Address::derive("admin@test");
        let (executor, ledger, _) = testenv(vec![
            execution(ExecutionResult::Success, &[0x01]),
            execution(ExecutionResult::Success, &[0x02]),
        ]);

        let first = executor.call(CallRequest::new("6000", "", "admin@test", "")).unwrap();
        let second = executor.call(CallRequest::new("6000", "", "admin@test", "")).unwrap();

        let first_address = first.deployed.unwrap();
        let second_address = second.deployed.unwrap();
        assert_ne!(first_address, second_address);

        assert_eq!(ledger.read_account(first_address).unwrap().unwrap().bytecode, Bytes::from(vec![0x01]));
        assert_eq!(ledger.read_account(second_address).unwrap().unwrap().bytecode, Bytes::from(vec![0x02]));
        assert_eq!(ledger.read_account(caller).unwrap().unwrap().nonce, Nonce::from(2));
    }

    #[test]
    fn failed_execution_returns_output_without_installing_code() {
        let (executor, ledger, _) = testenv(vec![execution(ExecutionResult::Reverted, &[0x42])]);

        let outcome = executor.call(CallRequest::new("6000", "", "admin@test", "")).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.output, "42");

        // account was created, code was not installed
        let account = ledger.read_account(outcome.deployed.unwrap()).unwrap().unwrap();
        assert!(!account.is_contract());
    }

    #[test]
    fn deploy_on_revert_installs_code_despite_failure() {
        let token = Address::derive("token@test");
        let ledger = Arc::new(InMemoryLedgerStorage::default());
        let stub = Arc::new(StubEvm::new(vec![execution(ExecutionResult::Reverted, &[0x42])]));
        let executor = Executor::new(
            Arc::clone(&ledger) as Arc<dyn LedgerStorage>,
            Box::new(stub),
            test_config(true),
        );

        let outcome = executor.call(CallRequest::new("6000", "", "admin@test", "token@test")).unwrap();
        assert!(!outcome.success);
        assert_eq!(ledger.read_account(token).unwrap().unwrap().bytecode, Bytes::from(vec![0x42]));
    }

    #[test]
    fn failed_execution_changes_are_discarded() {
        let caller = Address::derive("admin@test");
        let mut change = ExecutionAccountChanges::new(caller);
        change.slots = vec![(SlotIndex::ZERO, ExecutionValueChange::from_modified(SlotValue::from(7u64)))];
        let mut failed = execution(ExecutionResult::Halted { reason: "OutOfGas".to_owned() }, &[]);
        failed.changes = vec![change];

        let (executor, ledger, _) = testenv(vec![failed]);
        ledger.create_account(caller).unwrap();

        let outcome = executor.call(CallRequest::new("", "6000", "admin@test", "admin@test")).unwrap();
        assert!(!outcome.success);
        assert!(ledger.read_slot(caller, SlotIndex::ZERO).unwrap().is_zero());
    }

    #[test]
    fn successful_execution_changes_are_synchronized() {
        let caller = Address::derive("admin@test");
        let mut change = ExecutionAccountChanges::new(caller);
        change.slots = vec![(SlotIndex::ZERO, ExecutionValueChange::from_modified(SlotValue::from(7u64)))];
        let mut succeeded = execution(ExecutionResult::Success, &[]);
        succeeded.changes = vec![change];

        let (executor, ledger, _) = testenv(vec![succeeded]);
        ledger.create_account(caller).unwrap();

        let outcome = executor.call(CallRequest::new("", "6000", "admin@test", "admin@test")).unwrap();
        assert!(outcome.success);
        assert_eq!(ledger.read_slot(caller, SlotIndex::ZERO).unwrap(), SlotValue::from(7u64));
    }

    #[test]
    fn malformed_hex_aborts_before_touching_state() {
        let (executor, ledger, _) = testenv(vec![execution(ExecutionResult::Success, &[])]);

        let err = executor.call(CallRequest::new("zz", "", "admin@test", "token@test")).unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));

        let err = executor.call(CallRequest::new("6000", "0x0", "admin@test", "token@test")).unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));

        assert!(ledger.read_account(Address::derive("token@test")).unwrap().is_none());
    }

    #[test]
    fn callee_hex_address_is_used_verbatim() {
        let (executor, _, stub) = testenv(vec![
            execution(ExecutionResult::Success, &[]),
            execution(ExecutionResult::Success, &[]),
        ]);
        let address = Address::derive("token@test");

        executor.call(CallRequest::new("", "", "admin@test", address.to_string())).unwrap();
        executor.call(CallRequest::new("", "", "admin@test", "token@test")).unwrap();

        let inputs = stub.inputs.lock().unwrap();
        assert_eq!(inputs[0].callee, address);
        assert_eq!(inputs[1].callee, address);
    }
}

//! End-to-end tests driving the dispatcher with the real revm engine.

use std::sync::Arc;

use iroha_evm::eth::executor::CallRequest;
use iroha_evm::eth::executor::Executor;
use iroha_evm::eth::executor::ExecutorConfig;
use iroha_evm::eth::primitives::Address;
use iroha_evm::eth::primitives::SlotIndex;
use iroha_evm::eth::primitives::SlotValue;
use iroha_evm::eth::storage::InMemoryLedgerStorage;
use iroha_evm::eth::storage::LedgerStorage;
use revm::primitives::SpecId;

static SIMPLE_STORAGE_BYTECODE: &str = include_str!("contracts/SimpleStorage.bin");

/// `set(1)`
const SET_ONE: &str = "60fe47b10000000000000000000000000000000000000000000000000000000000000001";

/// `get()`
const GET: &str = "6d4ce63c";

/// Init bytecode that stores 1 in slot zero and then reverts returning `0x42`.
const STORE_THEN_REVERT: &str = "600160005560426000526001601ffd";

/// Bytecode returning the three bytes `0x0f 0x00 0xff`.
const RETURN_LEADING_ZEROS: &str = "620f00ff6000526003601df3";

fn init_testenv(deploy_on_revert: bool) -> (Arc<Executor>, Arc<InMemoryLedgerStorage>) {
    let ledger = Arc::new(InMemoryLedgerStorage::default());
    let config = ExecutorConfig {
        executor_gas_limit: 1_000_000,
        executor_deploy_on_revert: deploy_on_revert,
        executor_evm_spec: SpecId::LONDON,
    };
    let executor = config.init(Arc::clone(&ledger) as Arc<dyn LedgerStorage>);
    (executor, ledger)
}

fn deploy(executor: &Executor, caller: &str) -> (Address, String) {
    let outcome = executor
        .call(CallRequest::new(SIMPLE_STORAGE_BYTECODE.trim(), "", caller, ""))
        .unwrap();
    assert!(outcome.success);
    (outcome.deployed.unwrap(), outcome.output)
}

#[test]
fn deploys_stores_and_reads_back() {
    let (executor, ledger) = init_testenv(false);

    // creation call installs the returned runtime code
    let (contract, runtime_code) = deploy(&executor, "admin@test");
    let account = ledger.read_account(contract).unwrap().unwrap();
    assert!(account.is_contract());
    assert_eq!(const_hex::encode(account.bytecode.as_ref()), runtime_code);

    // set(1), shipping the runtime code with the call
    let set = executor
        .call(CallRequest::new(runtime_code.as_str(), SET_ONE, "admin@test", contract.to_string()))
        .unwrap();
    assert!(set.success);
    assert_eq!(ledger.read_slot(contract, SlotIndex::ZERO).unwrap(), SlotValue::from(1u64));

    // get() through the stored code, no bytecode shipped
    let get = executor
        .call(CallRequest::new("", GET, "admin@test", contract.to_string()))
        .unwrap();
    assert!(get.success);

    let expected = format!("{:0>64}", "1");
    assert_eq!(get.output, expected);
}

#[test]
fn consecutive_creation_calls_deploy_to_distinct_addresses() {
    let (executor, ledger) = init_testenv(false);

    let (first, _) = deploy(&executor, "admin@test");
    let (second, _) = deploy(&executor, "admin@test");
    assert_ne!(first, second);

    assert!(ledger.read_account(first).unwrap().unwrap().is_contract());
    assert!(ledger.read_account(second).unwrap().unwrap().is_contract());
}

#[test]
fn named_callee_is_created_once_and_keeps_its_code() {
    let (executor, ledger) = init_testenv(false);
    let token = Address::derive("token@test");

    // first call finds no account, creates it and installs the output
    let first = executor
        .call(CallRequest::new(SIMPLE_STORAGE_BYTECODE.trim(), "", "admin@test", "token@test"))
        .unwrap();
    assert!(first.success);
    assert!(first.deployed.is_none());
    let installed = ledger.read_account(token).unwrap().unwrap().bytecode.clone();
    assert!(!installed.is_empty());

    // second call finds the account and must not change its code
    let second = executor
        .call(CallRequest::new(RETURN_LEADING_ZEROS, "", "admin@test", "token@test"))
        .unwrap();
    assert!(second.success);
    assert_eq!(ledger.read_account(token).unwrap().unwrap().bytecode, installed);
}

#[test]
fn reverted_creation_discards_state_and_skips_code() {
    let (executor, ledger) = init_testenv(false);

    let outcome = executor
        .call(CallRequest::new(STORE_THEN_REVERT, "", "admin@test", ""))
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.output, "42");

    // the account was created but received neither code nor storage
    let contract = outcome.deployed.unwrap();
    let account = ledger.read_account(contract).unwrap().unwrap();
    assert!(!account.is_contract());
    assert!(ledger.read_slot(contract, SlotIndex::ZERO).unwrap().is_zero());

    // the failed creation still consumed the caller nonce
    let retry = executor
        .call(CallRequest::new(STORE_THEN_REVERT, "", "admin@test", ""))
        .unwrap();
    assert_ne!(retry.deployed.unwrap(), contract);
}

#[test]
fn reverted_creation_installs_code_when_configured() {
    let (executor, ledger) = init_testenv(true);

    let outcome = executor
        .call(CallRequest::new(STORE_THEN_REVERT, "", "admin@test", ""))
        .unwrap();
    assert!(!outcome.success);

    let account = ledger.read_account(outcome.deployed.unwrap()).unwrap().unwrap();
    assert_eq!(const_hex::encode(account.bytecode.as_ref()), "42");

    // discarding the execution state is independent of the code policy
    assert!(ledger.read_slot(account.address, SlotIndex::ZERO).unwrap().is_zero());
}

#[test]
fn output_hex_preserves_leading_zero_nibbles_and_zero_bytes() {
    let (executor, _) = init_testenv(false);

    let outcome = executor
        .call(CallRequest::new(RETURN_LEADING_ZEROS, "", "admin@test", "leading@test"))
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.output, "0f00ff");
    assert_eq!(outcome.output.len() % 2, 0);
    assert_eq!(const_hex::decode(&outcome.output).unwrap(), vec![0x0f, 0x00, 0xff]);
}

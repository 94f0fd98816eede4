use std::sync::Arc;

use clap::Parser;

use iroha_evm::config::load_dotenv;
use iroha_evm::config::BridgeConfig;
use iroha_evm::eth::executor::CallRequest;
use iroha_evm::eth::storage::InMemoryLedgerStorage;
use iroha_evm::eth::storage::LedgerStorage;
use iroha_evm::infra;

// SimpleStorage contract compiled with solc 0.5.10:
//
// contract SimpleStorage {
//     uint256 data;
//
//     function get() public view returns (uint256) {
//         return data;
//     }
//
//     function set(uint256 newData) public {
//         data = newData;
//     }
// }
static SIMPLE_STORAGE_BYTECODE: &str = concat!(
    "608060405234801561001057600080fd5b5060c68061001f600039",
    "6000f3fe6080604052348015600f57600080fd5b506004361060325760003560e01c806",
    "360fe47b11460375780636d4ce63c146062575b600080fd5b6060600480360360208110",
    "15604b57600080fd5b8101908080359060200190929190505050607e565b005b6068608",
    "8565b6040518082815260200191505060405180910390f35b8060008190555050565b60",
    "00805490509056fea265627a7a72305820a191db5c7b4d4786fc90adff0e100187127c5",
    "4e0e902d124a41606297538376964736f6c634300050a0032"
);

/// `set(1)`
static SET_ONE: &str = "60fe47b10000000000000000000000000000000000000000000000000000000000000001";

/// `get()`
static GET: &str = "6d4ce63c";

fn main() -> anyhow::Result<()> {
    // get CLI configs
    load_dotenv();
    let config = BridgeConfig::parse();

    // init infra
    infra::init_tracing();

    // init services
    let ledger: Arc<dyn LedgerStorage> = Arc::new(InMemoryLedgerStorage::default());
    let executor = config.executor.init(Arc::clone(&ledger));

    // deploy the contract through a creation call
    let deployment = executor.call(CallRequest::new(SIMPLE_STORAGE_BYTECODE, "", "admin@test", ""))?;
    tracing::info!(success = deployment.success, output = %deployment.output, "contract deployed");
    let Some(contract) = deployment.deployed else {
        anyhow::bail!("creation call returned no contract address");
    };

    // store a value, shipping the installed runtime code with the call
    let set = executor.call(CallRequest::new(deployment.output.as_str(), SET_ONE, "admin@test", contract.to_string()))?;
    tracing::info!(success = set.success, "value stored");

    // read the value back through the code installed on the account
    let get = executor.call(CallRequest::new("", GET, "admin@test", contract.to_string()))?;
    tracing::info!(success = get.success, output = %get.output, "value read");

    Ok(())
}

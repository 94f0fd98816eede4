use std::sync::Arc;

use clap::Parser;
use revm::primitives::SpecId;

use crate::eth::executor::Executor;
use crate::eth::executor::Revm;
use crate::eth::storage::LedgerStorage;

#[derive(Debug, Clone, Parser)]
pub struct ExecutorConfig {
    /// Max gas a single call may consume.
    #[arg(long = "executor-gas-limit", alias = "gas-limit", env = "EXECUTOR_GAS_LIMIT", default_value = "1000000")]
    pub executor_gas_limit: u64,

    /// Should a creation call install the returned code even when the execution failed?
    #[arg(long = "executor-deploy-on-revert", env = "EXECUTOR_DEPLOY_ON_REVERT", default_value = "false")]
    pub executor_deploy_on_revert: bool,

    /// Hard fork the engine executes under.
    #[arg(long = "executor-evm-spec", env = "EXECUTOR_EVM_SPEC", default_value = "london", value_parser = parse_evm_spec)]
    pub executor_evm_spec: SpecId,
}

fn parse_evm_spec(input: &str) -> anyhow::Result<SpecId> {
    match input.to_ascii_lowercase().as_str() {
        "istanbul" => Ok(SpecId::ISTANBUL),
        "berlin" => Ok(SpecId::BERLIN),
        "london" => Ok(SpecId::LONDON),
        "merge" => Ok(SpecId::MERGE),
        "shanghai" => Ok(SpecId::SHANGHAI),
        spec => Err(anyhow::anyhow!("unknown hard fork: {spec}")),
    }
}

impl ExecutorConfig {
    /// Initializes the executor with the production engine.
    pub fn init(&self, ledger: Arc<dyn LedgerStorage>) -> Arc<Executor> {
        tracing::info!(config = ?self, "creating executor");

        let evm = Box::new(Revm::new(self.executor_evm_spec));
        Arc::new(Executor::new(ledger, evm, self.clone()))
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_spec_parsing() {
        assert_eq!(parse_evm_spec("london").unwrap(), SpecId::LONDON);
        assert_eq!(parse_evm_spec("London").unwrap(), SpecId::LONDON);
        assert!(parse_evm_spec("petersburg").is_err());
    }
}

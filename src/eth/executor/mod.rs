mod evm;
mod executor;
mod executor_config;
mod revm;

pub use evm::Evm;
pub use evm::EvmError;
pub use evm::EvmInput;
pub use executor::CallError;
pub use executor::CallOutcome;
pub use executor::CallRequest;
pub use executor::Executor;
pub use executor_config::ExecutorConfig;
pub use self::revm::Revm;

use crate::eth::primitives::Bytes;
use crate::eth::primitives::ExecutionAccountChanges;
use crate::eth::primitives::ExecutionResult;
use crate::eth::primitives::Gas;

/// Output of one engine execution.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvmExecution {
    /// Status of the execution.
    pub result: ExecutionResult,

    /// Bytes returned by the execution: function output, revert payload or,
    /// for a creation call, the code to install.
    pub output: Bytes,

    /// Consumed gas.
    pub gas: Gas,

    /// State changes that happened during the execution, ordered by account
    /// address. Empty when the execution failed.
    pub changes: Vec<ExecutionAccountChanges>,
}

impl EvmExecution {
    /// Checks if the execution was completed normally.
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

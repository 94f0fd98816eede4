//! `Evm` trait and `EvmInput` structure.
//!
//! Defines the interface between the call dispatcher and the execution engine
//! that actually runs EVM bytecode. The engine reads state through a
//! [`StateView`] and reports its writes as the change-set of the returned
//! [`EvmExecution`]; it never mutates the ledger storage directly. This keeps
//! the engine replaceable: the production adapter wraps `revm`, tests may
//! plug in a stub.

use display_json::DebugAsJson;

use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::EvmExecution;
use crate::eth::primitives::Gas;
use crate::eth::primitives::Wei;
use crate::eth::storage::StateView;
use crate::eth::storage::StorageError;

/// Execution engine operations.
pub trait Evm: Send + Sync {
    /// Executes bytecode against a state view.
    ///
    /// A reverted or halted execution is an ordinary [`EvmExecution`] outcome;
    /// [`EvmError`] is reserved for faults of the engine itself.
    fn execute(&self, view: &StateView, input: EvmInput) -> Result<EvmExecution, EvmError>;
}

/// Engine input data. Derived from a host call request.
#[derive(DebugAsJson, Clone, serde::Serialize)]
pub struct EvmInput {
    /// Operation party address.
    pub caller: Address,

    /// Operation counterparty address. The bytecode executes in this account's
    /// context.
    pub callee: Address,

    /// Bytecode to execute. When empty, the callee's stored code runs instead.
    pub bytecode: Bytes,

    /// Call data passed to the bytecode.
    pub data: Bytes,

    /// Transferred amount from party to counterparty. Always zero in the host
    /// protocol.
    pub value: Wei,

    /// Max gas the execution may consume.
    pub gas_limit: Gas,

    /// Block height visible to the bytecode. Stubbed to zero by the host.
    pub block_number: u64,

    /// Block timestamp visible to the bytecode. Stubbed to zero by the host.
    pub block_timestamp: u64,
}

/// Errors raised by the engine itself, not by the executed bytecode.
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    /// State could not be read during execution.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The engine rejected or failed the execution for an unexpected reason.
    #[error("Unexpected error during engine execution: {0}")]
    Unexpected(String),
}

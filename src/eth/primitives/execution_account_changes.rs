use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::ExecutionValueChange;
use crate::eth::primitives::Nonce;
use crate::eth::primitives::SlotIndex;
use crate::eth::primitives::SlotValue;
use crate::eth::primitives::Wei;

/// Changes that happened to a single account during an engine execution.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionAccountChanges {
    pub address: Address,
    pub nonce: ExecutionValueChange<Nonce>,
    pub balance: ExecutionValueChange<Wei>,
    pub bytecode: ExecutionValueChange<Bytes>,

    /// Changed slots ordered by index. Each entry carries the value read when
    /// execution started and the value written during execution.
    pub slots: Vec<(SlotIndex, ExecutionValueChange<SlotValue>)>,
}

impl ExecutionAccountChanges {
    /// Creates a new change-set for an account with nothing changed yet.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            nonce: ExecutionValueChange::default(),
            balance: ExecutionValueChange::default(),
            bytecode: ExecutionValueChange::default(),
            slots: Vec::new(),
        }
    }
}

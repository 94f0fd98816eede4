use display_json::DebugAsJson;
use revm::primitives::keccak256;
use revm::primitives::KECCAK_EMPTY;

use crate::alias::RevmAccountInfo;
use crate::eth::primitives::Address;
use crate::eth::primitives::Bytes;
use crate::eth::primitives::Nonce;
use crate::eth::primitives::Wei;

/// Ledger account (wallet or contract).
#[derive(DebugAsJson, Clone, Default, PartialEq, Eq, fake::Dummy, serde::Serialize, serde::Deserialize)]
pub struct Account {
    /// Immutable address of the account.
    pub address: Address,

    /// Current nonce of the account.
    pub nonce: Nonce,

    /// Current balance of the account.
    pub balance: Wei,

    /// Contract bytecode. Empty when the account is not a contract.
    pub bytecode: Bytes,
}

impl Account {
    /// Creates a new empty account.
    pub fn new_empty(address: Address) -> Self {
        Self {
            address,
            nonce: Nonce::ZERO,
            balance: Wei::ZERO,
            bytecode: Bytes::default(),
        }
    }

    /// Checks if the account holds contract code.
    pub fn is_contract(&self) -> bool {
        !self.bytecode.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Conversions: Self -> Other
// -----------------------------------------------------------------------------

impl From<Account> for RevmAccountInfo {
    fn from(value: Account) -> Self {
        let code_hash = if value.bytecode.is_empty() {
            KECCAK_EMPTY
        } else {
            keccak256(value.bytecode.as_ref())
        };
        Self {
            nonce: value.nonce.into(),
            balance: value.balance.into(),
            code_hash,
            code: if value.bytecode.is_empty() { None } else { Some(value.bytecode.into()) },
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

use alloy_primitives::keccak256;
use alloy_primitives::FixedBytes;
use display_json::DebugAsJson;
use fake::Dummy;
use fake::Faker;
use rand::RngCore;

use crate::alias::RevmAddress;
use crate::eth::primitives::Nonce;

/// Address of a ledger account (wallet or contract).
#[derive(DebugAsJson, Clone, Copy, Default, Eq, PartialEq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Address(pub FixedBytes<20>);

impl Address {
    /// Special address used in some contexts.
    pub const ZERO: Address = Address(FixedBytes::ZERO);

    /// Creates a new address from the given bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Derives the address of an account from its ledger identifier.
    ///
    /// Deterministic: the same identifier always maps to the same address.
    /// Any string is accepted, including the empty string.
    pub fn derive(identifier: &str) -> Self {
        let digest = keccak256(identifier.as_bytes());
        Self(FixedBytes::from_slice(&digest[12..]))
    }

    /// Derives the address a creation call deploys to.
    ///
    /// Digest of the caller address and its current nonce, so consecutive
    /// creation calls from the same caller land on distinct addresses.
    pub fn for_contract(caller: &Address, nonce: Nonce) -> Self {
        let mut preimage = [0u8; 28];
        preimage[..20].copy_from_slice(caller.as_slice());
        preimage[20..].copy_from_slice(&nonce.as_u64().to_be_bytes());

        let digest = keccak256(preimage);
        Self(FixedBytes::from_slice(&digest[12..]))
    }

    /// Checks if current address is the zero address.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", const_hex::encode_prefixed(self.0))
    }
}

impl Dummy<Faker> for Address {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        let mut bytes = [0u8; 20];
        rng.fill_bytes(&mut bytes);
        Self(FixedBytes(bytes))
    }
}

impl Deref for Address {
    type Target = FixedBytes<20>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// -----------------------------------------------------------------------------
// Conversions: Other -> Self
// -----------------------------------------------------------------------------

impl From<FixedBytes<20>> for Address {
    fn from(value: FixedBytes<20>) -> Self {
        Self(value)
    }
}

impl From<[u8; 20]> for Address {
    fn from(value: [u8; 20]) -> Self {
        Self(FixedBytes(value))
    }
}

impl From<RevmAddress> for Address {
    fn from(value: RevmAddress) -> Self {
        Self(FixedBytes(value.0 .0))
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(FixedBytes::from_str(s)?))
    }
}

// -----------------------------------------------------------------------------
// Conversions: Self -> Other
// -----------------------------------------------------------------------------

impl From<Address> for RevmAddress {
    fn from(value: Address) -> Self {
        RevmAddress::new(value.0 .0)
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

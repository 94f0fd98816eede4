use std::fmt::Display;

use display_json::DebugAsJson;
use fake::Dummy;
use fake::Faker;
use rand::RngCore;

use crate::gen_newtype_from;

/// Transaction counter of an account. Advances every time the account sends a creation call.
#[derive(DebugAsJson, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Nonce(u64);

impl Nonce {
    pub const ZERO: Nonce = Nonce(0);

    /// Converts itself to [`u64`].
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next nonce in the sequence.
    pub fn next(self) -> Nonce {
        Nonce(self.0.saturating_add(1))
    }
}

impl Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Dummy<Faker> for Nonce {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        Self(rng.next_u64())
    }
}

// -----------------------------------------------------------------------------
// Conversions: Other -> Self
// -----------------------------------------------------------------------------

gen_newtype_from!(self = Nonce, other = u64);

// -----------------------------------------------------------------------------
// Conversions: Self -> Other
// -----------------------------------------------------------------------------

impl From<Nonce> for u64 {
    fn from(value: Nonce) -> Self {
        value.0
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

use std::fmt::Display;

use display_json::DebugAsJson;
use fake::Dummy;
use fake::Faker;
use rand::RngCore;

use crate::gen_newtype_from;

/// Gas amount, either a budget or a consumption.
#[derive(DebugAsJson, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Gas(u64);

impl Gas {
    /// Converts itself to [`u64`].
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for Gas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Dummy<Faker> for Gas {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_: &Faker, rng: &mut R) -> Self {
        Self(rng.next_u64())
    }
}

// -----------------------------------------------------------------------------
// Conversions: Other -> Self
// -----------------------------------------------------------------------------

gen_newtype_from!(self = Gas, other = u64);

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

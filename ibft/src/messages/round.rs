//! Round identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(height, round)` pair naming one attempt at agreeing on one block.
///
/// Not `Ord` on purpose: rounds are only comparable within a single
/// sequence, and every comparison in this crate goes through
/// [`is_earlier_round_than`](Self::is_earlier_round_than) so that is
/// explicit at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusRoundIdentifier {
    /// Block height (sequence number).
    pub sequence_number: u64,
    /// Round within that height. Round 0 is the first attempt.
    pub round_number: u32,
}

impl ConsensusRoundIdentifier {
    pub fn new(sequence_number: u64, round_number: u32) -> Self {
        Self {
            sequence_number,
            round_number,
        }
    }

    /// True if `self` has a strictly lower round number than `other`.
    /// Sequence numbers are ignored; callers must already be scoped to one.
    pub fn is_earlier_round_than(&self, other: &Self) -> bool {
        self.round_number < other.round_number
    }
}

impl fmt::Display for ConsensusRoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sequence_number, self.round_number)
    }
}

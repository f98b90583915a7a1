//! # Message Payloads
//!
//! The unsigned bodies of the consensus messages this crate handles. Each
//! payload type carries its own message code, which is mixed into the
//! signed bytes so a PREPARE can never be passed off as a ROUND-CHANGE.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::round::ConsensusRoundIdentifier;
use super::signed::SignedData;
use crate::config::{PREPARE_MESSAGE_CODE, ROUND_CHANGE_MESSAGE_CODE};

/// Common behaviour of every signable payload.
pub trait Payload: Serialize + Clone + fmt::Debug {
    /// Wire message code, part of the signed bytes.
    const MESSAGE_CODE: u8;

    /// The round this message is about.
    fn round_identifier(&self) -> &ConsensusRoundIdentifier;
}

// ---------------------------------------------------------------------------
// PREPARE
// ---------------------------------------------------------------------------

/// A validator's statement that it accepted the proposal with `digest` in
/// `round_identifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparePayload {
    pub round_identifier: ConsensusRoundIdentifier,
    /// BLAKE3 digest of the proposed block.
    pub digest: [u8; 32],
}

impl PreparePayload {
    pub fn new(round_identifier: ConsensusRoundIdentifier, digest: [u8; 32]) -> Self {
        Self {
            round_identifier,
            digest,
        }
    }
}

impl Payload for PreparePayload {
    const MESSAGE_CODE: u8 = PREPARE_MESSAGE_CODE;

    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }
}

// ---------------------------------------------------------------------------
// Prepared certificate
// ---------------------------------------------------------------------------

/// Proof that a proposal gathered enough PREPAREs in an earlier round.
///
/// A validator that reached the prepared state attaches this to its round
/// change so the next proposer re-proposes the same block instead of a new
/// one. Without it a round change could abandon a block that some honest
/// validators have already locked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedCertificate {
    /// Round in which the proposal was prepared.
    pub proposal_round: ConsensusRoundIdentifier,
    /// Digest of the prepared proposal.
    pub proposal_digest: [u8; 32],
    /// PREPARE messages backing the proposal.
    pub prepares: Vec<SignedData<PreparePayload>>,
}

impl PreparedCertificate {
    pub fn new(
        proposal_round: ConsensusRoundIdentifier,
        proposal_digest: [u8; 32],
        prepares: Vec<SignedData<PreparePayload>>,
    ) -> Self {
        Self {
            proposal_round,
            proposal_digest,
            prepares,
        }
    }
}

// ---------------------------------------------------------------------------
// ROUND-CHANGE
// ---------------------------------------------------------------------------

/// A validator's request to move consensus to `round_identifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundChangePayload {
    /// The round being asked for, not the round being left.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Present when the sender had prepared a proposal in an earlier round.
    pub prepared_certificate: Option<PreparedCertificate>,
}

impl RoundChangePayload {
    pub fn new(
        round_identifier: ConsensusRoundIdentifier,
        prepared_certificate: Option<PreparedCertificate>,
    ) -> Self {
        Self {
            round_identifier,
            prepared_certificate,
        }
    }
}

impl Payload for RoundChangePayload {
    const MESSAGE_CODE: u8 = ROUND_CHANGE_MESSAGE_CODE;

    fn round_identifier(&self) -> &ConsensusRoundIdentifier {
        &self.round_identifier
    }
}

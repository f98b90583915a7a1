//! # Per-Round Accumulator
//!
//! Collects round changes targeting one round and mints the certificate
//! once quorum is reached.
//!
//! ```text
//! accumulating --(len >= quorum)--> ready --(mint)--> actioned
//! ```
//!
//! `actioned` is terminal: later messages are dropped and no second
//! certificate is ever produced.

use std::collections::HashSet;

use thiserror::Error;

use crate::crypto::Address;
use crate::messages::{RoundChangeCertificate, RoundChangePayload, SignedData};

/// Misuse of the round-change state machine.
///
/// The manager never triggers this; it exists so the contract is enforced
/// by a checked result rather than a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundChangeError {
    #[error(
        "round change certificate not ready: {have}/{quorum} messages, actioned={actioned}"
    )]
    CertificateNotReady {
        have: usize,
        quorum: usize,
        actioned: bool,
    },
}

/// Round changes received for a single target round.
///
/// Stores at most one message per author, keeping the first. Arrival order
/// is preserved and carried into the certificate.
#[derive(Debug, Clone)]
pub struct RoundChangeStatus {
    quorum_size: usize,
    received_messages: Vec<SignedData<RoundChangePayload>>,
    authors: HashSet<Address>,
    actioned: bool,
}

impl RoundChangeStatus {
    pub fn new(quorum_size: usize) -> Self {
        Self {
            quorum_size,
            received_messages: Vec::new(),
            authors: HashSet::new(),
            actioned: false,
        }
    }

    /// Record `msg` unless a certificate was already minted or its author
    /// has already been counted.
    pub fn add_message(&mut self, msg: SignedData<RoundChangePayload>) {
        if self.actioned {
            return;
        }
        if self.authors.insert(msg.author()) {
            self.received_messages.push(msg);
        }
    }

    /// True once quorum is reached and no certificate has been minted yet.
    pub fn round_change_ready(&self) -> bool {
        self.received_messages.len() >= self.quorum_size && !self.actioned
    }

    /// Mint the certificate and mark this round as actioned.
    ///
    /// Must only be called right after [`round_change_ready`] returned
    /// `true`, with no other mutation in between.
    ///
    /// [`round_change_ready`]: Self::round_change_ready
    pub fn create_round_change_certificate(
        &mut self,
    ) -> Result<RoundChangeCertificate, RoundChangeError> {
        if !self.round_change_ready() {
            return Err(RoundChangeError::CertificateNotReady {
                have: self.received_messages.len(),
                quorum: self.quorum_size,
                actioned: self.actioned,
            });
        }
        self.actioned = true;
        Ok(RoundChangeCertificate::new(self.received_messages.clone()))
    }

    pub fn quorum_size(&self) -> usize {
        self.quorum_size
    }

    /// Number of distinct authors counted so far.
    pub fn message_count(&self) -> usize {
        self.received_messages.len()
    }

    pub fn is_actioned(&self) -> bool {
        self.actioned
    }

    pub fn contains_author(&self, author: &Address) -> bool {
        self.authors.contains(author)
    }

    /// Stored messages in arrival order.
    pub fn messages(&self) -> &[SignedData<RoundChangePayload>] {
        &self.received_messages
    }
}

//! # Round-Change Certificates
//!
//! The proof the rest of the engine needs before moving to a new round: a
//! quorum of distinct validators, each with a signed round change for the
//! same target round.

use serde::{Deserialize, Serialize};

use super::payload::{PreparedCertificate, RoundChangePayload};
use super::round::ConsensusRoundIdentifier;
use super::signed::SignedData;
use crate::crypto::Address;

/// An immutable, ordered bundle of round-change messages that reached
/// quorum.
///
/// Messages appear in the order their authors were first heard from. Only
/// the state machine mints these; once handed out, the crate keeps no
/// reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundChangeCertificate {
    messages: Vec<SignedData<RoundChangePayload>>,
}

impl RoundChangeCertificate {
    pub(crate) fn new(messages: Vec<SignedData<RoundChangePayload>>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[SignedData<RoundChangePayload>] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignedData<RoundChangePayload>> {
        self.messages.iter()
    }

    /// Authors in arrival order.
    pub fn authors(&self) -> Vec<Address> {
        self.messages.iter().map(SignedData::author).collect()
    }

    /// The round this certificate justifies moving to.
    pub fn round_identifier(&self) -> Option<&ConsensusRoundIdentifier> {
        self.messages.first().map(SignedData::round_identifier)
    }

    /// Every prepared certificate carried by the bundled round changes.
    pub fn prepared_certificates(&self) -> impl Iterator<Item = &PreparedCertificate> {
        self.messages
            .iter()
            .filter_map(|msg| msg.payload().prepared_certificate.as_ref())
    }

    /// The prepared certificate from the most recent round, if any.
    ///
    /// The proposer of the new round must re-propose this block rather than
    /// building a fresh one. Ties keep the first one seen.
    pub fn latest_prepared_certificate(&self) -> Option<&PreparedCertificate> {
        self.prepared_certificates().fold(None, |best, candidate| match best {
            Some(current)
                if !current
                    .proposal_round
                    .is_earlier_round_than(&candidate.proposal_round) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
    }

    pub fn into_messages(self) -> Vec<SignedData<RoundChangePayload>> {
        self.messages
    }
}

impl<'a> IntoIterator for &'a RoundChangeCertificate {
    type Item = &'a SignedData<RoundChangePayload>;
    type IntoIter = std::slice::Iter<'a, SignedData<RoundChangePayload>>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::NodeKey;

    fn round_change(
        key: &NodeKey,
        target: u32,
        prepared: Option<PreparedCertificate>,
    ) -> SignedData<RoundChangePayload> {
        let payload =
            RoundChangePayload::new(ConsensusRoundIdentifier::new(4, target), prepared);
        SignedData::sign(payload, key).unwrap()
    }

    fn prepared_at(round: u32, digest_byte: u8) -> PreparedCertificate {
        PreparedCertificate::new(
            ConsensusRoundIdentifier::new(4, round),
            [digest_byte; 32],
            Vec::new(),
        )
    }

    #[test]
    fn authors_preserve_arrival_order() {
        let keys: Vec<NodeKey> = (0..3).map(|_| NodeKey::generate()).collect();
        let cert = RoundChangeCertificate::new(
            keys.iter().map(|k| round_change(k, 2, None)).collect(),
        );
        assert_eq!(cert.len(), 3);
        assert_eq!(
            cert.authors(),
            keys.iter().map(NodeKey::address).collect::<Vec<_>>()
        );
        assert_eq!(
            cert.round_identifier(),
            Some(&ConsensusRoundIdentifier::new(4, 2))
        );
    }

    #[test]
    fn latest_prepared_certificate_picks_highest_round() {
        let keys: Vec<NodeKey> = (0..4).map(|_| NodeKey::generate()).collect();
        let cert = RoundChangeCertificate::new(vec![
            round_change(&keys[0], 3, Some(prepared_at(0, 0xA0))),
            round_change(&keys[1], 3, None),
            round_change(&keys[2], 3, Some(prepared_at(2, 0xB2))),
            round_change(&keys[3], 3, Some(prepared_at(1, 0xC1))),
        ]);

        assert_eq!(cert.prepared_certificates().count(), 3);
        let latest = cert.latest_prepared_certificate().unwrap();
        assert_eq!(latest.proposal_round.round_number, 2);
        assert_eq!(latest.proposal_digest, [0xB2; 32]);
    }

    #[test]
    fn no_prepared_certificates_means_none() {
        let key = NodeKey::generate();
        let cert = RoundChangeCertificate::new(vec![round_change(&key, 1, None)]);
        assert!(cert.latest_prepared_certificate().is_none());
        assert!(!cert.is_empty());
    }
}

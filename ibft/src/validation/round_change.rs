//! # Round-Change Message Validator
//!
//! The production [`MessageValidator`]: Ed25519 signatures, validator-set
//! membership, height scoping, and the prepared-certificate quorum rule.
//!
//! Every rejection is logged at `debug` (or `warn` for bad signatures, which
//! point at a faulty or malicious peer rather than a late message) and then
//! collapsed into `false`.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::{HeightContext, MessageValidator, ValidatorFactory};
use crate::messages::{ConsensusRoundIdentifier, PreparedCertificate, RoundChangePayload, SignedData};

/// Validates round changes for one height.
#[derive(Debug, Clone)]
pub struct RoundChangeMessageValidator {
    context: HeightContext,
}

impl RoundChangeMessageValidator {
    pub fn new(context: HeightContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &HeightContext {
        &self.context
    }

    /// A prepared certificate is acceptable when:
    ///
    /// - it was prepared at this height, in a round before the target round;
    /// - it carries at least `required_prepare_count` PREPAREs;
    /// - every PREPARE comes from a distinct validator, is correctly signed,
    ///   and names the same round and digest as the certificate.
    fn validate_prepared_certificate(
        &self,
        certificate: &PreparedCertificate,
        target: &ConsensusRoundIdentifier,
    ) -> bool {
        let proposal_round = &certificate.proposal_round;

        if proposal_round.sequence_number != self.context.sequence_number {
            debug!(
                expected = self.context.sequence_number,
                got = proposal_round.sequence_number,
                "prepared certificate is for another height"
            );
            return false;
        }

        if !proposal_round.is_earlier_round_than(target) {
            debug!(
                prepared = %proposal_round,
                target = %target,
                "prepared certificate is not from an earlier round"
            );
            return false;
        }

        if certificate.prepares.len() < self.context.required_prepare_count {
            debug!(
                have = certificate.prepares.len(),
                need = self.context.required_prepare_count,
                "prepared certificate has too few prepares"
            );
            return false;
        }

        let mut seen = HashSet::with_capacity(certificate.prepares.len());
        for prepare in &certificate.prepares {
            let author = prepare.author();

            if !seen.insert(author) {
                debug!(%author, "duplicate prepare in prepared certificate");
                return false;
            }

            if !self.context.is_validator(&author) {
                debug!(%author, "prepare from non-validator");
                return false;
            }

            let payload = prepare.payload();
            if payload.round_identifier != *proposal_round
                || payload.digest != certificate.proposal_digest
            {
                debug!(%author, "prepare does not match prepared proposal");
                return false;
            }

            if !prepare.verify_signature() {
                warn!(%author, "prepare signature does not verify");
                return false;
            }
        }

        true
    }
}

impl MessageValidator for RoundChangeMessageValidator {
    fn validate(&self, msg: &SignedData<RoundChangePayload>) -> bool {
        let author = msg.author();
        let target = msg.round_identifier();

        if !self.context.is_validator(&author) {
            debug!(%author, "round change from non-validator");
            return false;
        }

        if target.sequence_number != self.context.sequence_number {
            debug!(
                %author,
                expected = self.context.sequence_number,
                got = target.sequence_number,
                "round change targets another height"
            );
            return false;
        }

        if !msg.verify_signature() {
            warn!(%author, round = %target, "round change signature does not verify");
            return false;
        }

        match &msg.payload().prepared_certificate {
            Some(certificate) => self.validate_prepared_certificate(certificate, target),
            None => true,
        }
    }
}

/// Factory producing [`RoundChangeMessageValidator`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519ValidatorFactory;

impl ValidatorFactory for Ed25519ValidatorFactory {
    type Validator = RoundChangeMessageValidator;

    fn create_validator(&self, context: &HeightContext) -> Self::Validator {
        RoundChangeMessageValidator::new(context.clone())
    }
}

//! # Round-Change Manager
//!
//! Owns every [`RoundChangeStatus`] for one block height. Round changes for
//! older heights should already have been dropped upstream and round changes
//! for future heights buffered; everything that reaches this type is for
//! `sequence_number` or is rejected by the message validator.
//!
//! ## Lifecycle
//!
//! One manager per height. It is created with the height's validator set,
//! lives while that height is under consensus, and is dropped (never reused)
//! when the chain advances. Accumulators are created lazily on the first
//! valid message for a round and removed only by
//! [`discard_rounds_prior_to`](RoundChangeManager::discard_rounds_prior_to).
//! A message for a round that was discarded starts a fresh accumulator from
//! zero; the manager keeps no memory of discarded rounds.
//!
//! ## Concurrency
//!
//! Both mutating operations take `&mut self`, so quorum check and certificate
//! minting always run under the same exclusive borrow. Share a manager
//! between threads through [`SharedRoundChangeManager`](super::SharedRoundChangeManager),
//! never by wrapping the accumulators individually.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, warn};

use super::round_change_status::RoundChangeStatus;
use crate::config::{ConfigError, RoundChangeConfig};
use crate::crypto::Address;
use crate::helpers::{calculate_required_validator_quorum, prepare_message_count_for_quorum};
use crate::messages::{
    ConsensusRoundIdentifier, RoundChangeCertificate, RoundChangePayload, SignedData,
};
use crate::validation::{HeightContext, MessageValidator, ValidatorFactory};

/// Collects round changes for one height and emits a certificate per round
/// the first time a quorum of distinct validators asks for it.
#[derive(Debug)]
pub struct RoundChangeManager<V> {
    sequence_number: u64,
    quorum_size: usize,
    validators: BTreeSet<Address>,
    message_validator: V,
    round_change_cache: HashMap<ConsensusRoundIdentifier, RoundChangeStatus>,
}

impl<V: MessageValidator> RoundChangeManager<V> {
    /// Creates the manager for `sequence_number`.
    ///
    /// Duplicate addresses in `validators` are collapsed before the quorum is
    /// derived. The set is expected to be non-empty; use
    /// [`from_config`](Self::from_config) to have that checked.
    pub fn new<F>(
        sequence_number: u64,
        validators: impl IntoIterator<Item = Address>,
        validator_factory: F,
    ) -> Self
    where
        F: ValidatorFactory<Validator = V>,
    {
        let validators: BTreeSet<Address> = validators.into_iter().collect();
        let quorum_size = calculate_required_validator_quorum(validators.len());

        let context = HeightContext {
            sequence_number,
            validators: validators.clone(),
            required_prepare_count: prepare_message_count_for_quorum(quorum_size),
        };
        let message_validator = validator_factory.create_validator(&context);

        debug!(
            sequence = sequence_number,
            validators = validators.len(),
            quorum = quorum_size,
            "round change manager created"
        );

        Self {
            sequence_number,
            quorum_size,
            validators,
            message_validator,
            round_change_cache: HashMap::new(),
        }
    }

    /// Creates the manager from a validated [`RoundChangeConfig`].
    pub fn from_config<F>(
        config: &RoundChangeConfig,
        validator_factory: F,
    ) -> Result<Self, ConfigError>
    where
        F: ValidatorFactory<Validator = V>,
    {
        config.validate()?;
        Ok(Self::new(
            config.sequence_number,
            config.validators.iter().copied(),
            validator_factory,
        ))
    }

    /// Adds a round change and returns a certificate if this message
    /// completed the quorum for its target round.
    ///
    /// Returns `None` both for invalid messages and for valid ones that did
    /// not (or no longer can) complete a quorum. The caller's next step is
    /// the same either way: wait for more messages.
    pub fn append_round_change_message(
        &mut self,
        msg: SignedData<RoundChangePayload>,
    ) -> Option<RoundChangeCertificate> {
        if !self.message_validator.validate(&msg) {
            info!(
                author = %msg.author(),
                round = %msg.round_identifier(),
                "round change message was invalid"
            );
            return None;
        }

        let target = *msg.round_identifier();
        let quorum_size = self.quorum_size;
        let status = self
            .round_change_cache
            .entry(target)
            .or_insert_with(|| RoundChangeStatus::new(quorum_size));

        status.add_message(msg);

        if !status.round_change_ready() {
            debug!(
                round = %target,
                have = status.message_count(),
                need = quorum_size,
                actioned = status.is_actioned(),
                "round change stored"
            );
            return None;
        }

        match status.create_round_change_certificate() {
            Ok(certificate) => {
                info!(
                    round = %target,
                    messages = certificate.len(),
                    "round change quorum reached"
                );
                Some(certificate)
            }
            Err(err) => {
                // Ready was checked under this same borrow, so this is a bug.
                warn!(round = %target, error = %err, "round change certificate not minted");
                None
            }
        }
    }

    /// Forgets every round whose round number is below `completed`'s.
    ///
    /// Only round numbers are compared. The manager is scoped to a single
    /// height, so a different sequence number here is a caller bug; it is
    /// logged and the round-number comparison is applied anyway.
    pub fn discard_rounds_prior_to(&mut self, completed: &ConsensusRoundIdentifier) {
        if completed.sequence_number != self.sequence_number {
            warn!(
                expected = self.sequence_number,
                got = completed.sequence_number,
                "discard requested with a round from another height"
            );
        }

        let before = self.round_change_cache.len();
        self.round_change_cache
            .retain(|round, _| !round.is_earlier_round_than(completed));

        debug!(
            prior_to = %completed,
            discarded = before - self.round_change_cache.len(),
            remaining = self.round_change_cache.len(),
            "discarded stale round changes"
        );
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn quorum_size(&self) -> usize {
        self.quorum_size
    }

    pub fn validators(&self) -> &BTreeSet<Address> {
        &self.validators
    }

    /// Rounds with a live accumulator, lowest round first.
    pub fn tracked_rounds(&self) -> Vec<ConsensusRoundIdentifier> {
        let mut rounds: Vec<_> = self.round_change_cache.keys().copied().collect();
        rounds.sort_by_key(|round| round.round_number);
        rounds
    }

    /// Read-only view of the accumulator for `round`.
    pub fn status(&self, round: &ConsensusRoundIdentifier) -> Option<&RoundChangeStatus> {
        self.round_change_cache.get(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::NodeKey;

    const HEIGHT: u64 = 5;

    fn round(r: u32) -> ConsensusRoundIdentifier {
        ConsensusRoundIdentifier::new(HEIGHT, r)
    }

    fn vote(key: &NodeKey, target: ConsensusRoundIdentifier) -> SignedData<RoundChangePayload> {
        SignedData::sign(RoundChangePayload::new(target, None), key).unwrap()
    }

    fn keys(n: usize) -> Vec<NodeKey> {
        (0..n).map(|_| NodeKey::generate()).collect()
    }

    fn accept_all(_: &HeightContext) -> fn(&SignedData<RoundChangePayload>) -> bool {
        |_| true
    }

    #[test]
    fn quorum_derived_from_validator_count() {
        let keys = keys(7);
        let manager = RoundChangeManager::new(HEIGHT, keys.iter().map(NodeKey::address), accept_all);
        assert_eq!(manager.quorum_size(), 5);
        assert_eq!(manager.sequence_number(), HEIGHT);
        assert_eq!(manager.validators().len(), 7);
    }

    #[test]
    fn duplicate_validators_do_not_inflate_quorum() {
        let key = NodeKey::generate();
        let validators = vec![key.address(), key.address(), key.address(), key.address()];
        let manager = RoundChangeManager::new(HEIGHT, validators, accept_all);
        assert_eq!(manager.quorum_size(), 1);
    }

    #[test]
    fn factory_sees_height_context() {
        let keys = keys(4);
        let manager = RoundChangeManager::new(
            HEIGHT,
            keys.iter().map(NodeKey::address),
            |ctx: &HeightContext| {
                assert_eq!(ctx.sequence_number, HEIGHT);
                assert_eq!(ctx.validators.len(), 4);
                assert_eq!(ctx.required_prepare_count, 2);
                |_: &SignedData<RoundChangePayload>| true
            },
        );
        assert_eq!(manager.quorum_size(), 3);
    }

    #[test]
    fn rejected_message_mutates_nothing() {
        let keys = keys(4);
        let mut manager = RoundChangeManager::new(
            HEIGHT,
            keys.iter().map(NodeKey::address),
            |_: &HeightContext| |_: &SignedData<RoundChangePayload>| false,
        );
        assert!(manager.append_round_change_message(vote(&keys[0], round(1))).is_none());
        assert!(manager.tracked_rounds().is_empty());
        assert!(manager.status(&round(1)).is_none());
    }

    #[test]
    fn accumulator_created_lazily_per_round() {
        let keys = keys(4);
        let mut manager =
            RoundChangeManager::new(HEIGHT, keys.iter().map(NodeKey::address), accept_all);

        manager.append_round_change_message(vote(&keys[0], round(3)));
        manager.append_round_change_message(vote(&keys[0], round(1)));

        assert_eq!(manager.tracked_rounds(), vec![round(1), round(3)]);
        assert_eq!(manager.status(&round(3)).unwrap().message_count(), 1);
        assert_eq!(manager.status(&round(1)).unwrap().quorum_size(), 3);
    }

    #[test]
    fn certificate_emitted_once_per_round() {
        let keys = keys(4);
        let mut manager =
            RoundChangeManager::new(HEIGHT, keys.iter().map(NodeKey::address), accept_all);

        assert!(manager.append_round_change_message(vote(&keys[0], round(1))).is_none());
        assert!(manager.append_round_change_message(vote(&keys[1], round(1))).is_none());
        let cert = manager
            .append_round_change_message(vote(&keys[2], round(1)))
            .expect("third vote completes quorum");
        assert_eq!(cert.len(), 3);
        assert!(manager.status(&round(1)).unwrap().is_actioned());

        assert!(manager.append_round_change_message(vote(&keys[3], round(1))).is_none());
        assert_eq!(manager.status(&round(1)).unwrap().message_count(), 3);
    }

    #[test]
    fn discard_keeps_target_round_and_later() {
        let keys = keys(4);
        let mut manager =
            RoundChangeManager::new(HEIGHT, keys.iter().map(NodeKey::address), accept_all);
        for r in 0..5 {
            manager.append_round_change_message(vote(&keys[0], round(r)));
        }

        manager.discard_rounds_prior_to(&round(2));
        assert_eq!(manager.tracked_rounds(), vec![round(2), round(3), round(4)]);

        // Discarding again at a lower round is a no-op.
        manager.discard_rounds_prior_to(&round(1));
        assert_eq!(manager.tracked_rounds().len(), 3);
    }

    #[test]
    fn from_config_validates_first() {
        let empty = RoundChangeConfig::new(HEIGHT, Vec::new());
        let result = RoundChangeManager::from_config(&empty, accept_all);
        assert!(matches!(result, Err(ConfigError::EmptyValidatorSet)));

        let keys = keys(4);
        let config = RoundChangeConfig::new(HEIGHT, keys.iter().map(NodeKey::address).collect());
        let manager = RoundChangeManager::from_config(&config, accept_all).unwrap();
        assert_eq!(manager.quorum_size(), 3);
    }
}

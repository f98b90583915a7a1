//! Thread-safe handle around a [`RoundChangeManager`].
//!
//! Round changes can arrive on several network tasks at once. Without a
//! single lock around the whole manager, two threads could both see a round
//! as ready before either mints, and the round would yield two
//! certificates. One `parking_lot::Mutex` per manager serializes
//! `append_round_change_message` and `discard_rounds_prior_to`, and the
//! quorum check and mint happen inside one critical section.

use std::sync::Arc;

use parking_lot::Mutex;

use super::round_change_manager::RoundChangeManager;
use crate::messages::{
    ConsensusRoundIdentifier, RoundChangeCertificate, RoundChangePayload, SignedData,
};
use crate::validation::MessageValidator;

/// Cloneable, lock-guarded [`RoundChangeManager`].
#[derive(Debug)]
pub struct SharedRoundChangeManager<V> {
    inner: Arc<Mutex<RoundChangeManager<V>>>,
}

impl<V> Clone for SharedRoundChangeManager<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: MessageValidator> SharedRoundChangeManager<V> {
    pub fn new(manager: RoundChangeManager<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// See [`RoundChangeManager::append_round_change_message`].
    pub fn append_round_change_message(
        &self,
        msg: SignedData<RoundChangePayload>,
    ) -> Option<RoundChangeCertificate> {
        self.inner.lock().append_round_change_message(msg)
    }

    /// See [`RoundChangeManager::discard_rounds_prior_to`].
    pub fn discard_rounds_prior_to(&self, completed: &ConsensusRoundIdentifier) {
        self.inner.lock().discard_rounds_prior_to(completed)
    }

    pub fn quorum_size(&self) -> usize {
        self.inner.lock().quorum_size()
    }

    /// Run a read-only closure against the manager while holding the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&RoundChangeManager<V>) -> R) -> R {
        let guard = self.inner.lock();
        f(&*guard)
    }
}

impl<V: MessageValidator> From<RoundChangeManager<V>> for SharedRoundChangeManager<V> {
    fn from(manager: RoundChangeManager<V>) -> Self {
        Self::new(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::NodeKey;
    use crate::validation::Ed25519ValidatorFactory;

    #[test]
    fn clones_share_state() {
        let keys: Vec<NodeKey> = (0..4).map(|_| NodeKey::generate()).collect();
        let manager =
            RoundChangeManager::new(2, keys.iter().map(NodeKey::address), Ed25519ValidatorFactory);
        let shared = SharedRoundChangeManager::from(manager);
        let other = shared.clone();

        let target = ConsensusRoundIdentifier::new(2, 1);
        let vote = |key: &NodeKey| {
            SignedData::sign(RoundChangePayload::new(target, None), key).unwrap()
        };

        assert!(shared.append_round_change_message(vote(&keys[0])).is_none());
        assert!(other.append_round_change_message(vote(&keys[1])).is_none());
        assert!(shared.append_round_change_message(vote(&keys[2])).is_some());

        other.discard_rounds_prior_to(&ConsensusRoundIdentifier::new(2, 2));
        assert!(shared.inspect(|m| m.tracked_rounds().is_empty()));
        assert_eq!(shared.quorum_size(), 3);
    }
}

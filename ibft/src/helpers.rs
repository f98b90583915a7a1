//! # Quorum Arithmetic
//!
//! IBFT tolerates `f` Byzantine validators out of `N >= 3f + 1`. A quorum is
//! the smallest group that is guaranteed to overlap any other quorum in at
//! least one honest validator: `floor(2N / 3) + 1`.

use crate::config::{QUORUM_DENOMINATOR, QUORUM_NUMERATOR};

/// Minimum number of distinct validators whose agreement is Byzantine-safe
/// for a set of `validator_count` validators.
///
/// | N | quorum |
/// |---|--------|
/// | 1 | 1      |
/// | 4 | 3      |
/// | 7 | 5      |
pub fn calculate_required_validator_quorum(validator_count: usize) -> usize {
    (QUORUM_NUMERATOR * validator_count / QUORUM_DENOMINATOR) + 1
}

/// Number of PREPARE messages a prepared certificate must carry.
///
/// The proposer's own PROPOSAL stands in for its prepare, so one fewer than
/// the quorum is enough.
pub fn prepare_message_count_for_quorum(quorum_size: usize) -> usize {
    quorum_size.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_for_common_set_sizes() {
        assert_eq!(calculate_required_validator_quorum(1), 1);
        assert_eq!(calculate_required_validator_quorum(2), 2);
        assert_eq!(calculate_required_validator_quorum(3), 3);
        assert_eq!(calculate_required_validator_quorum(4), 3);
        assert_eq!(calculate_required_validator_quorum(6), 5);
        assert_eq!(calculate_required_validator_quorum(7), 5);
        assert_eq!(calculate_required_validator_quorum(10), 7);
        assert_eq!(calculate_required_validator_quorum(100), 67);
    }

    #[test]
    fn two_quorums_always_overlap() {
        for n in 1..=64usize {
            let q = calculate_required_validator_quorum(n);
            assert!(q <= n, "quorum {} exceeds set size {}", q, n);
            // Any two quorums share more than n/3 members.
            assert!(3 * (2 * q - n) > n, "n={} q={}", n, q);
        }
    }

    #[test]
    fn prepare_count_is_one_less_than_quorum() {
        assert_eq!(prepare_message_count_for_quorum(3), 2);
        assert_eq!(prepare_message_count_for_quorum(1), 0);
        assert_eq!(prepare_message_count_for_quorum(0), 0);
    }
}

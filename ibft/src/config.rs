//! # Round-Change Configuration & Constants
//!
//! Every magic number the round-change subsystem depends on lives here,
//! next to the per-height configuration a driver hands to
//! [`RoundChangeManager::from_config`](crate::statemachine::RoundChangeManager::from_config).
//!
//! Changing any of the constants below changes what counts as a valid
//! signature or a valid quorum. That is a hard fork, not a tuning knob.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::Address;

// ---------------------------------------------------------------------------
// Quorum Parameters
// ---------------------------------------------------------------------------

/// Numerator of the BFT supermajority fraction. Quorum is
/// `floor(N * QUORUM_NUMERATOR / QUORUM_DENOMINATOR) + 1`.
pub const QUORUM_NUMERATOR: usize = 2;

/// Denominator of the BFT supermajority fraction.
pub const QUORUM_DENOMINATOR: usize = 3;

/// A height with fewer validators than this cannot run consensus at all.
pub const MIN_VALIDATORS: usize = 1;

// ---------------------------------------------------------------------------
// Message Codes
// ---------------------------------------------------------------------------

/// Message code for PREPARE messages. Prepares only reach this crate embedded
/// in a prepared certificate.
pub const PREPARE_MESSAGE_CODE: u8 = 0x01;

/// Message code for ROUND-CHANGE messages.
pub const ROUND_CHANGE_MESSAGE_CODE: u8 = 0x03;

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Domain separation tag mixed into every signed consensus message, so a
/// signature produced for IBFT can never be replayed as a transaction or
/// handshake signature (or the other way round).
pub const SIGNING_DOMAIN: &[u8] = b"NOVA-IBFT-v1";

// ---------------------------------------------------------------------------
// Per-height configuration
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a [`RoundChangeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("malformed round-change config: {0}")]
    Parse(#[from] serde_json::Error),

    /// No validators were listed for the height.
    #[error("validator set is empty")]
    EmptyValidatorSet,

    /// The same validator was listed twice.
    #[error("duplicate validator in set: {0}")]
    DuplicateValidator(Address),
}

/// Everything the round-change manager needs to know about one block height.
///
/// Built once per height by the round life-cycle driver and discarded when
/// the chain moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundChangeConfig {
    /// The block height under consensus.
    pub sequence_number: u64,
    /// Validator set for this height, as hex-encoded addresses.
    pub validators: Vec<Address>,
}

impl RoundChangeConfig {
    /// Creates a config for the given height and validator set.
    pub fn new(sequence_number: u64, validators: Vec<Address>) -> Self {
        Self {
            sequence_number,
            validators,
        }
    }

    /// Parses a config from JSON and validates it.
    ///
    /// ```
    /// use nova_ibft::config::RoundChangeConfig;
    ///
    /// let json = r#"{
    ///     "sequence_number": 7,
    ///     "validators": ["0101010101010101010101010101010101010101010101010101010101010101"]
    /// }"#;
    /// let config = RoundChangeConfig::from_json(json).unwrap();
    /// assert_eq!(config.sequence_number, 7);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the validator set is non-empty and free of duplicates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validators.len() < MIN_VALIDATORS {
            return Err(ConfigError::EmptyValidatorSet);
        }
        let mut seen = HashSet::with_capacity(self.validators.len());
        for validator in &self.validators {
            if !seen.insert(validator) {
                return Err(ConfigError::DuplicateValidator(*validator));
            }
        }
        Ok(())
    }
}

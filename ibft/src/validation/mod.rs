//! # Message Validation
//!
//! The state machine never looks at signatures or justifications itself. It
//! asks a [`MessageValidator`] for a yes/no answer and trusts it. The
//! validator is built once per height by a [`ValidatorFactory`] from the
//! [`HeightContext`] the manager derives at construction.
//!
//! Closures implement both traits, so tests can swap in a predicate without
//! ceremony:
//!
//! ```
//! use nova_ibft::crypto::Address;
//! use nova_ibft::messages::{RoundChangePayload, SignedData};
//! use nova_ibft::statemachine::RoundChangeManager;
//! use nova_ibft::validation::HeightContext;
//!
//! let validators = vec![Address::from_bytes([1; 32])];
//! let manager = RoundChangeManager::new(0, validators, |_: &HeightContext| {
//!     |_: &SignedData<RoundChangePayload>| true
//! });
//! assert_eq!(manager.quorum_size(), 1);
//! ```

pub mod round_change;

use std::collections::BTreeSet;

use crate::crypto::Address;
use crate::messages::{RoundChangePayload, SignedData};

pub use round_change::{Ed25519ValidatorFactory, RoundChangeMessageValidator};

/// What a height-scoped validator needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightContext {
    /// The height every accepted message must belong to.
    pub sequence_number: u64,
    /// Validators allowed to vote at this height.
    pub validators: BTreeSet<Address>,
    /// Minimum PREPAREs a prepared certificate must carry.
    pub required_prepare_count: usize,
}

impl HeightContext {
    pub fn is_validator(&self, address: &Address) -> bool {
        self.validators.contains(address)
    }
}

/// Boolean oracle deciding whether a round-change message may be counted.
///
/// Implementations must reject messages from non-validators, messages for
/// another height, and messages whose prepared certificate fails its own
/// quorum rule. Callers do not learn why a message was rejected.
pub trait MessageValidator {
    fn validate(&self, msg: &SignedData<RoundChangePayload>) -> bool;
}

impl<F> MessageValidator for F
where
    F: Fn(&SignedData<RoundChangePayload>) -> bool,
{
    fn validate(&self, msg: &SignedData<RoundChangePayload>) -> bool {
        self(msg)
    }
}

/// Builds the message validator for one height.
pub trait ValidatorFactory {
    type Validator: MessageValidator;

    fn create_validator(&self, context: &HeightContext) -> Self::Validator;
}

impl<F, V> ValidatorFactory for F
where
    F: Fn(&HeightContext) -> V,
    V: MessageValidator,
{
    type Validator = V;

    fn create_validator(&self, context: &HeightContext) -> V {
        self(context)
    }
}

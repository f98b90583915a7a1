//! # Signed Envelopes
//!
//! `SignedData<P>` pairs a payload with its author and an Ed25519 signature.
//!
//! The signed bytes are the bincode encoding of
//! `(SIGNING_DOMAIN, P::MESSAGE_CODE, payload)`. bincode is deterministic for
//! these types (no maps, no floats), so every node derives the same bytes
//! from the same payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::payload::Payload;
use crate::config::SIGNING_DOMAIN;
use crate::crypto::{Address, NodeKey, Signature};

/// Failure to produce the canonical encoding of a payload.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("failed to encode payload for signing: {0}")]
    Bincode(#[from] bincode::Error),
}

/// A payload together with its author and the author's signature over it.
///
/// Immutable once built. Whether the signature is valid is *not* checked on
/// construction; that is the message validator's job, and it is done exactly
/// once, before the message reaches the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData<P> {
    payload: P,
    author: Address,
    signature: Signature,
}

impl<P: Payload> SignedData<P> {
    /// Sign `payload` with `key`.
    pub fn sign(payload: P, key: &NodeKey) -> Result<Self, EncodingError> {
        let bytes = signing_bytes(&payload)?;
        Ok(Self {
            signature: key.sign(&bytes),
            author: key.address(),
            payload,
        })
    }

    /// Reassemble a message received from the network.
    pub fn from_parts(payload: P, author: Address, signature: Signature) -> Self {
        Self {
            payload,
            author,
            signature,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// The validator claiming to have sent this message.
    pub fn author(&self) -> Address {
        self.author
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Shorthand for `self.payload().round_identifier()`.
    pub fn round_identifier(&self) -> &super::ConsensusRoundIdentifier {
        self.payload.round_identifier()
    }

    /// Check the signature against the claimed author.
    pub fn verify_signature(&self) -> bool {
        match signing_bytes(&self.payload) {
            Ok(bytes) => self.author.verify(&bytes, &self.signature),
            Err(_) => false,
        }
    }

    /// BLAKE3 digest of author and signature. Identifies this exact message
    /// in logs without dumping the payload.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.author.as_bytes());
        hasher.update(self.signature.as_bytes());
        *hasher.finalize().as_bytes()
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

fn signing_bytes<P: Payload>(payload: &P) -> Result<Vec<u8>, EncodingError> {
    Ok(bincode::serialize(&(SIGNING_DOMAIN, P::MESSAGE_CODE, payload))?)
}

//! # Node Keys
//!
//! Ed25519 keys for consensus participants.
//!
//! A validator is identified by its [`Address`]: the 32-byte Ed25519
//! verifying key. There is no hashing or truncation step, so a signature can
//! be checked against the address directly without a lookup table.
//!
//! Key bytes are never logged. `NodeKey`'s `Debug` prints only the address.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while parsing key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: expected 32 bytes")]
    InvalidSecretKey,

    #[error("invalid address: expected 64 hex characters")]
    InvalidAddress,
}

// ---------------------------------------------------------------------------
// NodeKey
// ---------------------------------------------------------------------------

/// A validator's signing key.
///
/// Deliberately not `Serialize`. Exporting a secret should be an explicit
/// call to [`NodeKey::secret_key_bytes`], not a side effect of logging a
/// struct that happens to contain one.
pub struct NodeKey {
    signing_key: SigningKey,
}

impl NodeKey {
    /// Generate a fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key from a 32-byte seed. Handy for fixtures; use a real
    /// CSPRNG or KDF for anything else.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a hex-encoded 32-byte secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// The validator identity derived from this key.
    pub fn address(&self) -> Address {
        Address(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign raw bytes. Callers sign canonical message encodings, never
    /// ad-hoc buffers; see [`SignedData`](crate::messages::SignedData).
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            bytes: self.signing_key.sign(message).to_bytes().to_vec(),
        }
    }

    /// Raw secret key material. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for NodeKey {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey(address={})", self.address())
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A validator identity: the raw Ed25519 verifying key.
///
/// Comparable, hashable and `Copy`, so it can key maps and sets directly.
/// Serialized as a lowercase hex string in every format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

impl Address {
    /// Wrap raw bytes. No curve check happens here; an address that is not a
    /// valid point simply never verifies a signature.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded representation. 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify `signature` over `message` against this address.
    ///
    /// Returns `false` for malformed signatures, invalid points, and bad
    /// signatures alike. Callers only ever need a yes/no.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let Some(sig) = signature.to_dalek_signature() else {
            return false;
        };
        verifying_key.verify(message, &sig).is_ok()
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidAddress)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidAddress)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..16])
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An Ed25519 signature.
///
/// Stored as `Vec<u8>` for serde; a signature that is not exactly 64 bytes
/// fails verification instead of panicking.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn to_dalek_signature(&self) -> Option<DalekSignature> {
        let arr: [u8; 64] = self.bytes.as_slice().try_into().ok()?;
        Some(DalekSignature::from_bytes(&arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = hex::encode(&self.bytes);
        write!(f, "Signature({}..)", &hex[..hex.len().min(16)])
    }
}

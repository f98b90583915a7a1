//! # Cryptographic Primitives
//!
//! Ed25519 only. Every consensus message is signed by a [`NodeKey`] and
//! checked against the sender's [`Address`]. Hashing (BLAKE3) lives with the
//! messages that need it.

pub mod keys;

pub use keys::{Address, KeyError, NodeKey, Signature};

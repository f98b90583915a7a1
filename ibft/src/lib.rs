// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA IBFT — Round-Change Subsystem
//!
//! When a round of IBFT consensus stalls (the proposer went quiet, the
//! proposal was garbage, the network hiccuped), validators broadcast
//! round-change votes asking to move to a later round. This crate is the
//! part of the validator that counts those votes for one block height and,
//! once a Byzantine-safe quorum of distinct validators asks for the same
//! round, hands back a certificate proving it. Exactly once per round.
//!
//! It is deliberately small. It does not decide *when* to ask for a round
//! change and it does not care what the caller does with a certificate.
//! It counts, it proves, it forgets stale rounds when told to.
//!
//! ## Architecture
//!
//! - **config** — Protocol constants and the per-height configuration.
//! - **crypto** — Ed25519 node keys and the `Address` validator identity.
//! - **helpers** — Quorum arithmetic. Small, but every other module leans on it.
//! - **messages** — Round identifiers, payloads, signed envelopes, certificates.
//! - **validation** — The message-validator seam and its Ed25519 implementation.
//! - **statemachine** — Per-round accumulators and the per-height manager.
//! - **logging** — `tracing` subscriber setup for binaries and test harnesses.
//!
//! ## Quick tour
//!
//! ```
//! use nova_ibft::crypto::NodeKey;
//! use nova_ibft::messages::{ConsensusRoundIdentifier, RoundChangePayload, SignedData};
//! use nova_ibft::statemachine::RoundChangeManager;
//! use nova_ibft::validation::Ed25519ValidatorFactory;
//!
//! let keys: Vec<NodeKey> = (0..4).map(|_| NodeKey::generate()).collect();
//! let validators = keys.iter().map(NodeKey::address).collect::<Vec<_>>();
//! let mut manager = RoundChangeManager::new(5, validators, Ed25519ValidatorFactory);
//!
//! let target = ConsensusRoundIdentifier::new(5, 1);
//! let mut certificate = None;
//! for key in &keys[..3] {
//!     let vote = SignedData::sign(RoundChangePayload::new(target, None), key).unwrap();
//!     certificate = manager.append_round_change_message(vote);
//! }
//! assert_eq!(certificate.map(|c| c.len()), Some(3));
//! ```

pub mod config;
pub mod crypto;
pub mod helpers;
pub mod logging;
pub mod messages;
pub mod statemachine;
pub mod validation;

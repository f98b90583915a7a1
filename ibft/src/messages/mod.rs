//! # Consensus Messages
//!
//! ```text
//! round.rs        — (height, round) identifiers
//! payload.rs      — PREPARE / ROUND-CHANGE payloads, prepared certificates
//! signed.rs       — SignedData<P>: payload + author + Ed25519 signature
//! certificate.rs  — RoundChangeCertificate, the quorum proof
//! ```

pub mod certificate;
pub mod payload;
pub mod round;
pub mod signed;

pub use certificate::RoundChangeCertificate;
pub use payload::{Payload, PreparePayload, PreparedCertificate, RoundChangePayload};
pub use round::ConsensusRoundIdentifier;
pub use signed::{EncodingError, SignedData};

//! # Round-Change State Machine
//!
//! ```text
//! round_change_status.rs   — per-round accumulator, one certificate max
//! round_change_manager.rs  — per-height owner of all accumulators
//! shared.rs                — mutex-guarded handle for multi-threaded callers
//! ```
//!
//! Flow for every inbound round change:
//!
//! ```text
//! validate ──✗──> None (logged)
//!    │
//!    ✓
//!    ▼
//! status for target round (created on demand)
//!    │ add_message (first per author wins)
//!    ▼
//! ready? ──no──> None
//!    │
//!   yes
//!    ▼
//! mint certificate (actioned) ──> Some(certificate)
//! ```

pub mod round_change_manager;
pub mod round_change_status;
pub mod shared;

pub use round_change_manager::RoundChangeManager;
pub use round_change_status::{RoundChangeError, RoundChangeStatus};
pub use shared::SharedRoundChangeManager;

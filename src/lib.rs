//! # txflow
//!
//! Transaction signing-request resolution and broadcast engine.
//!
//! A pending signing request is resolved into a finalized, broadcast
//! outcome — success with a transaction id, or a classified failure — and
//! the outcome is reported back to the original requester exactly once per
//! successful attempt.
//!
//! ## Architecture
//!
//! The crate is split into focused modules:
//! - **eligibility**: tri-state sponsorship eligibility resolution
//! - **path**: path precedence and the consumed-once override flag
//! - **broadcast**: three backend adapters and outcome normalization
//! - **finalize**: at-most-once finalization delivery and navigation
//! - **engine**: the per-attempt orchestrator and state machine
//! - **queries / builder / signer**: consumed collaborator interfaces
//!
//! ## Key guarantees
//!
//! - Exactly one broadcast backend executes per submission attempt
//! - Signing completes before any broadcast call begins; a failed or absent
//!   signature aborts the attempt before any backend is reached
//! - Finalization delivery occurs at most once per attempt, and never for a
//!   failed attempt
//! - The override flag is consumed once and cleared on every exit path

#![warn(unused_imports)]
#![warn(dead_code)]
#![warn(unused_must_use)]

pub mod broadcast;
pub mod builder;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod errors;
pub mod finalize;
pub mod path;
pub mod queries;
pub mod signer;
pub mod structured_logging;
pub mod types;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use broadcast::{BroadcastDispatcher, BroadcastError, BroadcastOutcome, BroadcastSuccess};
pub use config::Config;
pub use eligibility::{EligibilityResolver, SponsorshipEligibility};
pub use engine::{EngineParams, SubmissionEngine};
pub use errors::SubmissionError;
pub use finalize::{FinalizationNotifier, FinalizedPayload, View};
pub use types::{FormValues, Path, RequestContext, TxId};

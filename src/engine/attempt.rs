//! Per-attempt record and state machine
//!
//! One attempt is one complete pass from submission to a terminal state.
//! Transitions are a pure function from (phase, event) to phase; the engine
//! only ever drives valid transitions, and an invalid one indicates a logic
//! defect.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::structured_logging::AttemptContext;
use crate::types::Path;

/// Phase of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Idle,
    ResolvingEligibility,
    PathSelected,
    Signing,
    Signed,
    Broadcasting,
    BroadcastAccepted,
    BroadcastFailed,
    SigningFailed,
    Finalized,
    ErrorReported,
}

impl AttemptPhase {
    /// Terminal phases re-enable submission for a fresh attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptPhase::Finalized | AttemptPhase::ErrorReported)
    }
}

/// Events driving the attempt state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEvent {
    StartResolving,
    PathChosen,
    StartSigning,
    SignSucceeded,
    SignFailed,
    StartBroadcast,
    BroadcastOk,
    BroadcastErr,
    DeliveryCompleted,
    FailureSurfaced,
}

/// Attempted transition not allowed by the state machine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid attempt transition from {from:?} on {event:?}")]
pub struct TransitionError {
    pub from: AttemptPhase,
    pub event: AttemptEvent,
}

/// Pure transition function of the attempt state machine
pub fn apply(phase: AttemptPhase, event: AttemptEvent) -> Result<AttemptPhase, TransitionError> {
    use AttemptEvent as E;
    use AttemptPhase as P;

    let next = match (phase, event) {
        (P::Idle, E::StartResolving) => P::ResolvingEligibility,
        (P::ResolvingEligibility, E::PathChosen) => P::PathSelected,
        (P::PathSelected, E::StartSigning) => P::Signing,
        (P::Signing, E::SignSucceeded) => P::Signed,
        (P::Signing, E::SignFailed) => P::SigningFailed,
        (P::Signed, E::StartBroadcast) => P::Broadcasting,
        (P::Broadcasting, E::BroadcastOk) => P::BroadcastAccepted,
        (P::Broadcasting, E::BroadcastErr) => P::BroadcastFailed,
        (P::BroadcastAccepted, E::DeliveryCompleted) => P::Finalized,
        // Any non-terminal phase can surface a failure and terminate.
        (from, E::FailureSurfaced) if !from.is_terminal() => P::ErrorReported,
        (from, event) => return Err(TransitionError { from, event }),
    };
    Ok(next)
}

/// One submission attempt from start to terminal state
#[derive(Debug, Clone)]
pub struct Attempt {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phase: AttemptPhase,
    pub path: Option<Path>,
    pub override_taken: bool,
    pub context: AttemptContext,
}

impl Attempt {
    pub fn begin() -> Self {
        let context = AttemptContext::new("submit");
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            phase: AttemptPhase::Idle,
            path: None,
            override_taken: false,
            context,
        }
    }

    /// Drive one transition, tracing the phase change
    ///
    /// The engine only issues valid events; a rejected transition is logged
    /// as a logic defect and leaves the phase unchanged.
    pub fn transition(&mut self, event: AttemptEvent) {
        match apply(self.phase, event) {
            Ok(next) => {
                tracing::trace!(
                    attempt_id = %self.id,
                    from = ?self.phase,
                    to = ?next,
                    event = ?event,
                    "Attempt phase transition"
                );
                self.phase = next;
            }
            Err(err) => {
                self.context.logger.error(&err.to_string());
            }
        }
    }

    pub fn set_path(&mut self, path: Path) {
        self.path = Some(path);
        self.transition(AttemptEvent::PathChosen);
    }
}

/// Snapshot of a finished attempt, exposed for display gating
#[derive(Debug, Clone)]
pub struct AttemptSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub phase: AttemptPhase,
    pub path: Option<Path>,
    pub failure: Option<String>,
}

impl AttemptSummary {
    pub fn from_attempt(attempt: &Attempt, failure: Option<String>) -> Self {
        Self {
            id: attempt.id,
            started_at: attempt.started_at,
            finished_at: Utc::now(),
            phase: attempt.phase,
            path: attempt.path,
            failure,
        }
    }
}

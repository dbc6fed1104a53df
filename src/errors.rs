//! Error types for the submission engine
//!
//! Every failure of a submission attempt is classified here and caught at
//! the attempt boundary: the engine converts it into a single failure
//! navigation and nothing escapes `submit` as an error.

use thiserror::Error;

use crate::broadcast::BroadcastError;
use crate::builder::BuilderError;
use crate::signer::SigningError;

/// Attempt-boundary error taxonomy
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    /// Sponsorship verification has not settled; a wait state, not a fault
    #[error("sponsorship verification still in flight")]
    EligibilityUnresolved,

    /// Unsigned transaction generation failed
    #[error("failed to generate unsigned transaction: {0}")]
    Builder(#[from] BuilderError),

    /// The signing capability failed or returned no transaction
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// A broadcast backend rejected the attempt
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    /// The requester identity required for finalization is absent
    ///
    /// A local logic defect under correct upstream wiring; still fails soft
    /// through the failure view rather than crashing.
    #[error("cannot finalize attempt: missing {missing}")]
    MissingRequestContext { missing: &'static str },

    /// A submission attempt is already in flight
    #[error("a submission attempt is already in flight")]
    AttemptInFlight,
}

impl SubmissionError {
    /// Error category for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::EligibilityUnresolved => "eligibility",
            Self::Builder(_) => "builder",
            Self::Signing(_) => "signing",
            Self::Broadcast(err) => match err {
                BroadcastError::Network { .. } => "network",
                BroadcastError::Sponsorship { .. } => "sponsorship",
                BroadcastError::Provider { .. } => "provider",
            },
            Self::MissingRequestContext { .. } => "finalization",
            Self::AttemptInFlight => "engine",
        }
    }

    /// Whether a fresh, user-triggered attempt may succeed
    ///
    /// Nothing retries automatically; this only informs what the failure
    /// view can suggest.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EligibilityUnresolved => true,
            Self::Broadcast(_) => true,
            Self::AttemptInFlight => true,
            Self::Builder(_) => false,
            Self::Signing(_) => false,
            Self::MissingRequestContext { .. } => false,
        }
    }

    /// The message carried to the failure view
    ///
    /// Broadcast failures surface the backend's extracted message verbatim;
    /// everything else uses its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Broadcast(err) => err.message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(SubmissionError::EligibilityUnresolved.category(), "eligibility");
        assert_eq!(
            SubmissionError::Signing(SigningError::KeyUnavailable).category(),
            "signing"
        );
        assert_eq!(
            SubmissionError::Broadcast(BroadcastError::Sponsorship {
                message: "x".to_string()
            })
            .category(),
            "sponsorship"
        );
    }

    #[test]
    fn test_broadcast_user_message_is_unframed() {
        let err = SubmissionError::Broadcast(BroadcastError::Provider {
            message: "insufficient funds".to_string(),
        });
        assert_eq!(err.user_message(), "insufficient funds");
    }

    #[test]
    fn test_retryability() {
        assert!(SubmissionError::EligibilityUnresolved.is_retryable());
        assert!(SubmissionError::Broadcast(BroadcastError::Network {
            message: "timeout".to_string()
        })
        .is_retryable());
        assert!(!SubmissionError::Signing(SigningError::EmptyResult).is_retryable());
        assert!(!SubmissionError::MissingRequestContext { missing: "tab id" }.is_retryable());
    }
}

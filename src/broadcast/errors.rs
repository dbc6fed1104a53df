//! Error types for the broadcast dispatcher
//!
//! Each backend normalizes its heterogeneous failure shapes into one variant
//! carrying a human-readable message. The message is what ultimately reaches
//! the failure view, so adapters put the most specific text they can extract
//! into it.

use thiserror::Error;

/// Which backend produced a broadcast failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastErrorSource {
    Network,
    SponsorshipService,
    AlternateProvider,
}

impl std::fmt::Display for BroadcastErrorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcastErrorSource::Network => write!(f, "network"),
            BroadcastErrorSource::SponsorshipService => write!(f, "sponsorship"),
            BroadcastErrorSource::AlternateProvider => write!(f, "provider"),
        }
    }
}

/// Normalized broadcast failure, one variant per backend
#[derive(Debug, Clone, Error)]
pub enum BroadcastError {
    /// Standard node broadcast failed (transport or node rejection)
    #[error("network broadcast failed: {message}")]
    Network { message: String },

    /// Sponsorship service reachable but rejected the transaction or
    /// omitted the transaction id
    #[error("sponsorship broadcast failed: {message}")]
    Sponsorship { message: String },

    /// Alternate provider rejected the transaction or was unreachable
    #[error("provider broadcast failed: {message}")]
    Provider { message: String },
}

impl BroadcastError {
    /// The backend this failure originated from
    pub fn source(&self) -> BroadcastErrorSource {
        match self {
            BroadcastError::Network { .. } => BroadcastErrorSource::Network,
            BroadcastError::Sponsorship { .. } => BroadcastErrorSource::SponsorshipService,
            BroadcastError::Provider { .. } => BroadcastErrorSource::AlternateProvider,
        }
    }

    /// The extracted human-readable message, without source framing
    pub fn message(&self) -> &str {
        match self {
            BroadcastError::Network { message }
            | BroadcastError::Sponsorship { message }
            | BroadcastError::Provider { message } => message,
        }
    }
}

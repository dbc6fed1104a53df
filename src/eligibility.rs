//! Sponsorship eligibility resolution
//!
//! Determines whether the fee-sponsored submission path is available for a
//! request and, if so, produces the parallel sponsored unsigned variant.
//! Resolution never fails: every internal check failure maps to
//! `Ineligible` with a specific reason, and an unsettled input maps to
//! `Verifying`, which callers must treat as "not submittable" rather than
//! as a yes or a no.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::SponsorshipConfig;
use crate::queries::{QueryError, QuerySnapshot};
use crate::types::{QueryStatus, UnsignedTransaction};

/// Why the sponsored path is not available
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// Sponsorship is switched off by configuration
    SponsorshipDisabled,

    /// The next-nonce query failed
    NonceUnavailable,

    /// The fee-calculation query failed
    FeeEstimateUnavailable,

    /// No unsigned transaction could be produced to verify
    TransactionUnavailable,

    /// The sponsorship service declined this transaction
    RejectedByService,

    /// The verification round trip itself failed
    VerificationFailed(String),
}

impl std::fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SponsorshipDisabled => write!(f, "sponsorship disabled"),
            Self::NonceUnavailable => write!(f, "nonce unavailable"),
            Self::FeeEstimateUnavailable => write!(f, "fee estimate unavailable"),
            Self::TransactionUnavailable => write!(f, "transaction unavailable"),
            Self::RejectedByService => write!(f, "rejected by sponsorship service"),
            Self::VerificationFailed(message) => write!(f, "verification failed: {message}"),
        }
    }
}

/// Tri-state sponsorship eligibility
///
/// `Verifying` is distinct from ineligible: while any input is unsettled the
/// request is not submittable, and submission gating must check for this
/// state explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SponsorshipEligibility {
    /// A query or the service verification round trip is still in flight
    Verifying,

    /// The sponsored path is available; carries the sponsored variant to sign
    Eligible { sponsored_tx: UnsignedTransaction },

    /// The sponsored path is not available
    Ineligible { reason: IneligibilityReason },
}

impl SponsorshipEligibility {
    pub fn is_verifying(&self) -> bool {
        matches!(self, Self::Verifying)
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }

    pub fn sponsored_tx(&self) -> Option<&UnsignedTransaction> {
        match self {
            Self::Eligible { sponsored_tx } => Some(sponsored_tx),
            _ => None,
        }
    }
}

/// Service-side check of whether a transaction can be sponsored
#[async_trait]
pub trait SponsorshipVerifier: Send + Sync {
    async fn verify(&self, unsigned: &UnsignedTransaction) -> Result<bool, QueryError>;
}

/// Resolves the sponsorship tri-state for one request
pub struct EligibilityResolver {
    enabled: bool,
    verifier: Arc<dyn SponsorshipVerifier>,
}

impl EligibilityResolver {
    pub fn new(config: &SponsorshipConfig, verifier: Arc<dyn SponsorshipVerifier>) -> Self {
        Self {
            enabled: config.enabled,
            verifier,
        }
    }

    /// Resolve eligibility from the unsigned transaction and query snapshot
    ///
    /// Requires the nonce and fee queries to have settled successfully;
    /// unsettled inputs yield `Verifying`, failed inputs a specific
    /// `Ineligible` reason. Never fails.
    pub async fn resolve(
        &self,
        unsigned: &UnsignedTransaction,
        snapshot: &QuerySnapshot,
    ) -> SponsorshipEligibility {
        if !self.enabled {
            return SponsorshipEligibility::Ineligible {
                reason: IneligibilityReason::SponsorshipDisabled,
            };
        }

        let next_nonce = match &snapshot.nonce {
            QueryStatus::Pending => return SponsorshipEligibility::Verifying,
            QueryStatus::Error(_) => {
                return SponsorshipEligibility::Ineligible {
                    reason: IneligibilityReason::NonceUnavailable,
                }
            }
            QueryStatus::Success(next) => next.nonce,
        };

        match &snapshot.fees {
            QueryStatus::Pending => return SponsorshipEligibility::Verifying,
            QueryStatus::Error(_) => {
                return SponsorshipEligibility::Ineligible {
                    reason: IneligibilityReason::FeeEstimateUnavailable,
                }
            }
            QueryStatus::Success(_) => {}
        }

        match self.verifier.verify(unsigned).await {
            Ok(true) => SponsorshipEligibility::Eligible {
                sponsored_tx: unsigned.sponsored_variant(next_nonce),
            },
            Ok(false) => SponsorshipEligibility::Ineligible {
                reason: IneligibilityReason::RejectedByService,
            },
            Err(err) => {
                debug!(error = %err, "Sponsorship verification round trip failed");
                SponsorshipEligibility::Ineligible {
                    reason: IneligibilityReason::VerificationFailed(err.to_string()),
                }
            }
        }
    }
}

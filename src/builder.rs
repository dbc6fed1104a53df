//! Unsigned-transaction builder interface
//!
//! The builder is an external collaborator: given the user-supplied form
//! values it produces the unsigned transaction for the standard and
//! alternate-provider paths. The sponsored variant is derived separately by
//! eligibility resolution.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{FormValues, UnsignedTransaction};

/// Failures while constructing an unsigned transaction
#[derive(Debug, Clone, Error)]
pub enum BuilderError {
    /// Form values fail structural validation
    #[error("invalid form values: {0}")]
    InvalidValues(String),

    /// Fee cannot be covered by the available unlocked balance
    #[error("fee {fee} exceeds available unlocked balance {available}")]
    InsufficientBalance { fee: u64, available: u64 },

    /// Underlying construction failure
    #[error("transaction construction failed: {0}")]
    Construction(String),
}

/// Produces an [`UnsignedTransaction`] from form values, or fails
#[async_trait]
pub trait UnsignedTransactionBuilder: Send + Sync {
    async fn build(&self, values: &FormValues) -> Result<UnsignedTransaction, BuilderError>;
}

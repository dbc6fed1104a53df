//! Transaction-signing capability interface
//!
//! Signing is an opaque external capability. The engine consumes it and
//! treats an absent result identically to a signing error: neither reaches
//! any broadcast backend.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{SignedTransaction, UnsignedTransaction};

/// Failures raised by the signing capability
#[derive(Debug, Clone, Error)]
pub enum SigningError {
    /// Key material is not available
    #[error("signing key unavailable")]
    KeyUnavailable,

    /// The unsigned payload could not be interpreted by the signer
    #[error("malformed transaction payload: {0}")]
    MalformedPayload(String),

    /// The signer completed without producing a transaction
    #[error("signer returned no transaction")]
    EmptyResult,

    /// The signer refused the request
    #[error("signing rejected: {0}")]
    Rejected(String),
}

/// Signs an [`UnsignedTransaction`]
///
/// `Ok(None)` means the capability completed without producing a signed
/// transaction; callers must treat it exactly like an error.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign(
        &self,
        unsigned: &UnsignedTransaction,
    ) -> Result<Option<SignedTransaction>, SigningError>;
}

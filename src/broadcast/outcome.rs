//! Terminal broadcast outcome

use crate::broadcast::errors::BroadcastError;
use crate::types::TxId;

/// Successful broadcast result delivered back to the requester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastSuccess {
    /// Network-assigned transaction id
    pub tx_id: TxId,

    /// Canonical hex serialization of the broadcast transaction
    pub raw_tx_hex: String,
}

/// Terminal outcome of a broadcast dispatch
///
/// A tagged union, never partially populated: either the backend accepted
/// the transaction and assigned an id, or it failed with a normalized
/// message and source.
#[derive(Debug, Clone)]
pub enum BroadcastOutcome {
    Success(BroadcastSuccess),
    Failure(BroadcastError),
}

impl BroadcastOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BroadcastOutcome::Success(_))
    }
}

impl From<Result<BroadcastSuccess, BroadcastError>> for BroadcastOutcome {
    fn from(result: Result<BroadcastSuccess, BroadcastError>) -> Self {
        match result {
            Ok(success) => BroadcastOutcome::Success(success),
            Err(err) => BroadcastOutcome::Failure(err),
        }
    }
}

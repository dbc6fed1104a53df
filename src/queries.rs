//! Consumed query interfaces and the per-page query snapshot
//!
//! Nonce, fee, and balance lookups are external collaborators with their own
//! caching and refresh policies. The engine only observes their tri-state
//! results; a pending query gates submission without being an error.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{AccountBalance, FeeQuote, NextNonce, QueryStatus, UnsignedTransaction};

/// Failures surfaced by the query collaborators
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("query transport failure: {0}")]
    Transport(String),

    #[error("query returned malformed data: {0}")]
    Malformed(String),

    #[error("query backend unavailable: {0}")]
    Unavailable(String),
}

/// Per-account next-nonce lookup
#[async_trait]
pub trait NonceQuery: Send + Sync {
    async fn next_nonce(&self, address: &str) -> Result<NextNonce, QueryError>;
}

/// Fee calculation for a concrete unsigned transaction
#[async_trait]
pub trait FeeQuery: Send + Sync {
    async fn estimate_fees(&self, unsigned: &UnsignedTransaction) -> Result<FeeQuote, QueryError>;
}

/// Available unlocked balance lookup
#[async_trait]
pub trait BalanceQuery: Send + Sync {
    async fn account_balance(&self, address: &str) -> Result<AccountBalance, QueryError>;
}

/// Settled-or-pending view of the three collaborator queries
///
/// Starts all-pending; the engine replaces it wholesale on refresh so no
/// attempt ever mixes results from two different refresh passes.
#[derive(Debug, Clone, Default)]
pub struct QuerySnapshot {
    pub nonce: QueryStatus<NextNonce>,
    pub fees: QueryStatus<FeeQuote>,
    pub balance: QueryStatus<AccountBalance>,
}

impl QuerySnapshot {
    /// Build a snapshot from settled query results
    pub fn from_results(
        nonce: Result<NextNonce, QueryError>,
        fees: Result<FeeQuote, QueryError>,
        balance: Result<AccountBalance, QueryError>,
    ) -> Self {
        Self {
            nonce: status_from(nonce),
            fees: status_from(fees),
            balance: status_from(balance),
        }
    }
}

fn status_from<T>(result: Result<T, QueryError>) -> QueryStatus<T> {
    match result {
        Ok(value) => QueryStatus::Success(value),
        Err(err) => QueryStatus::Error(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeeCalculation;

    #[test]
    fn test_snapshot_defaults_to_all_pending() {
        let snapshot = QuerySnapshot::default();
        assert!(snapshot.nonce.is_pending());
        assert!(snapshot.fees.is_pending());
        assert!(snapshot.balance.is_pending());
    }

    #[test]
    fn test_from_results_maps_errors_to_messages() {
        let snapshot = QuerySnapshot::from_results(
            Ok(NextNonce { nonce: 5 }),
            Err(QueryError::Unavailable("fee estimator offline".to_string())),
            Ok(AccountBalance {
                available_unlocked_balance: 1_000_000,
            }),
        );
        assert_eq!(snapshot.nonce.success(), Some(&NextNonce { nonce: 5 }));
        assert!(matches!(snapshot.fees, QueryStatus::Error(ref msg)
            if msg.contains("fee estimator offline")));
        assert!(snapshot.balance.is_success());

        let settled = QuerySnapshot::from_results(
            Ok(NextNonce { nonce: 0 }),
            Ok(FeeQuote {
                calculation: FeeCalculation::Default,
                options: vec![100, 180, 250],
            }),
            Ok(AccountBalance {
                available_unlocked_balance: 0,
            }),
        );
        assert!(settled.fees.is_success());
    }
}

//! Mock collaborators for tests
//!
//! Available to unit tests and, behind the `test_utils` feature, to
//! downstream integration harnesses.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::broadcast::{BroadcastBackend, BroadcastError, BroadcastSuccess};
use crate::builder::{BuilderError, UnsignedTransactionBuilder};
use crate::eligibility::SponsorshipVerifier;
use crate::finalize::{DeliveryChannel, FinalizedPayload, NavigationSink, View};
use crate::queries::{BalanceQuery, FeeQuery, NonceQuery, QueryError};
use crate::signer::{SigningError, TransactionSigner};
use crate::types::{
    AccountBalance, FeeCalculation, FeeQuote, FormValues, NextNonce, RequestContext,
    SignedTransaction, TxId, UnsignedTransaction,
};

/// Nonce query with a fixed result
pub struct MockNonceQuery {
    result: Result<NextNonce, QueryError>,
}

impl MockNonceQuery {
    pub fn returning(nonce: u64) -> Self {
        Self {
            result: Ok(NextNonce { nonce }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(QueryError::Unavailable(message.to_string())),
        }
    }
}

#[async_trait]
impl NonceQuery for MockNonceQuery {
    async fn next_nonce(&self, _address: &str) -> Result<NextNonce, QueryError> {
        self.result.clone()
    }
}

/// Fee query with a fixed quote
pub struct MockFeeQuery {
    result: Result<FeeQuote, QueryError>,
}

impl MockFeeQuery {
    pub fn returning(options: Vec<u64>) -> Self {
        Self {
            result: Ok(FeeQuote {
                calculation: FeeCalculation::FeeRate,
                options,
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(QueryError::Unavailable(message.to_string())),
        }
    }
}

#[async_trait]
impl FeeQuery for MockFeeQuery {
    async fn estimate_fees(&self, _unsigned: &UnsignedTransaction) -> Result<FeeQuote, QueryError> {
        self.result.clone()
    }
}

/// Balance query with a fixed balance
pub struct MockBalanceQuery {
    result: Result<AccountBalance, QueryError>,
}

impl MockBalanceQuery {
    pub fn returning(available_unlocked_balance: u64) -> Self {
        Self {
            result: Ok(AccountBalance {
                available_unlocked_balance,
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(QueryError::Unavailable(message.to_string())),
        }
    }
}

#[async_trait]
impl BalanceQuery for MockBalanceQuery {
    async fn account_balance(&self, _address: &str) -> Result<AccountBalance, QueryError> {
        self.result.clone()
    }
}

/// Builder returning a fixed unsigned transaction
pub struct StaticBuilder {
    result: Result<UnsignedTransaction, BuilderError>,
}

impl StaticBuilder {
    pub fn returning(tx: UnsignedTransaction) -> Self {
        Self { result: Ok(tx) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(BuilderError::Construction(message.to_string())),
        }
    }
}

#[async_trait]
impl UnsignedTransactionBuilder for StaticBuilder {
    async fn build(&self, _values: &FormValues) -> Result<UnsignedTransaction, BuilderError> {
        self.result.clone()
    }
}

/// How a [`MockSigner`] behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerBehavior {
    Succeed,
    ReturnNone,
    Fail,
}

/// Signer recording every transaction it was asked to sign
pub struct MockSigner {
    behavior: SignerBehavior,
    delay: Option<Duration>,
    signed: Mutex<Vec<UnsignedTransaction>>,
}

impl MockSigner {
    pub fn new(behavior: SignerBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(behavior: SignerBehavior, delay: Duration) -> Self {
        Self {
            behavior,
            delay: Some(delay),
            signed: Mutex::new(Vec::new()),
        }
    }

    /// Transactions handed to the signer, in order
    pub fn signed(&self) -> Vec<UnsignedTransaction> {
        self.signed.lock().clone()
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn sign(
        &self,
        unsigned: &UnsignedTransaction,
    ) -> Result<Option<SignedTransaction>, SigningError> {
        self.signed.lock().push(unsigned.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.behavior {
            SignerBehavior::Succeed => {
                let raw = serde_json::to_vec(unsigned).expect("serializable unsigned tx");
                Ok(Some(SignedTransaction::from_raw_bytes(raw)))
            }
            SignerBehavior::ReturnNone => Ok(None),
            SignerBehavior::Fail => Err(SigningError::KeyUnavailable),
        }
    }
}

/// Sponsorship verifier with a fixed verdict and call counter
pub struct MockVerifier {
    result: Result<bool, QueryError>,
    delay: Option<Duration>,
    calls: Mutex<u32>,
}

impl MockVerifier {
    pub fn verdict(eligible: bool) -> Self {
        Self {
            result: Ok(eligible),
            delay: None,
            calls: Mutex::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(QueryError::Transport(message.to_string())),
            delay: None,
            calls: Mutex::new(0),
        }
    }

    pub fn with_delay(eligible: bool, delay: Duration) -> Self {
        Self {
            result: Ok(eligible),
            delay: Some(delay),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock()
    }
}

#[async_trait]
impl SponsorshipVerifier for MockVerifier {
    async fn verify(&self, _unsigned: &UnsignedTransaction) -> Result<bool, QueryError> {
        *self.calls.lock() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// Broadcast backend with a fixed result and call recording
pub struct MockBackend {
    txid: Option<TxId>,
    error: Option<BroadcastError>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn succeeding(txid: &str) -> Self {
        Self {
            txid: Some(TxId::parse(txid).expect("valid txid literal")),
            error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: BroadcastError) -> Self {
        Self {
            txid: None,
            error: Some(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Digests of the signed transactions broadcast through this backend
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl BroadcastBackend for MockBackend {
    async fn broadcast(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        self.calls.lock().push(signed.digest());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(BroadcastSuccess {
            tx_id: self.txid.clone().expect("succeeding backend has a txid"),
            raw_tx_hex: signed.to_raw_hex(),
        })
    }
}

/// Delivery channel recording every payload it was handed
pub struct RecordingDeliveryChannel {
    deliveries: Mutex<Vec<(RequestContext, FinalizedPayload)>>,
}

impl RecordingDeliveryChannel {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<(RequestContext, FinalizedPayload)> {
        self.deliveries.lock().clone()
    }
}

impl Default for RecordingDeliveryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DeliveryChannel for RecordingDeliveryChannel {
    fn deliver(&self, context: &RequestContext, payload: &FinalizedPayload) {
        self.deliveries
            .lock()
            .push((context.clone(), payload.clone()));
    }
}

/// Navigation sink recording every view it was driven to
pub struct RecordingNavigation {
    views: Mutex<Vec<View>>,
}

impl RecordingNavigation {
    pub fn new() -> Self {
        Self {
            views: Mutex::new(Vec::new()),
        }
    }

    pub fn views(&self) -> Vec<View> {
        self.views.lock().clone()
    }
}

impl Default for RecordingNavigation {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationSink for RecordingNavigation {
    fn navigate(&self, view: View) {
        self.views.lock().push(view);
    }
}

//! Submission engine supercomponent
//!
//! Orchestrates one transaction-signing request from submission to a
//! terminal state: query refresh, eligibility resolution, path selection,
//! signing, broadcast dispatch, and exactly-once finalization.
//!
//! ## Attempt discipline
//!
//! - A single attempt is in flight per engine; a second `submit` while one
//!   is active is rejected, never queued or interleaved.
//! - Signing always completes before the broadcast call begins, and
//!   eligibility resolution settles (in one of its tri-states) before path
//!   selection.
//! - The override flag is read-and-cleared atomically at attempt start and
//!   cleared again on every exit path, so a failed attempt never re-forces
//!   the override on retry.
//! - `submit` never returns an error: every failure is funneled into one
//!   failure navigation.
//! - Eligibility is captured per attempt from the shared resolved state;
//!   `refresh` recomputes that state whenever fee, nonce, or balance inputs
//!   change, so no attempt reuses a prior attempt's captured value.
//!
//! If the surrounding page is torn down mid-attempt the future is dropped
//! and any in-flight backend call is abandoned without finalization; the
//! requester side carries its own stale-request timeout.

pub mod attempt;

pub use attempt::{Attempt, AttemptEvent, AttemptPhase, AttemptSummary};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::broadcast::{BroadcastDispatcher, BroadcastOutcome};
use crate::builder::UnsignedTransactionBuilder;
use crate::eligibility::{EligibilityResolver, IneligibilityReason, SponsorshipEligibility};
use crate::errors::SubmissionError;
use crate::finalize::{FinalizationNotifier, FinalizedPayload};
use crate::path::{select_path, PathOverrideStore};
use crate::queries::{BalanceQuery, FeeQuery, NonceQuery, QueryError, QuerySnapshot};
use crate::signer::{SigningError, TransactionSigner};
use crate::types::{FormValues, Path, RequestContext, TxId};

/// Collaborators and identity wired into a [`SubmissionEngine`]
pub struct EngineParams {
    /// Asset symbol shown on the success view
    pub token_symbol: String,

    /// Address the request signs for
    pub sender_address: String,

    /// Identity of the requester; required for finalization
    pub request_context: Option<RequestContext>,

    pub builder: Arc<dyn UnsignedTransactionBuilder>,
    pub signer: Arc<dyn TransactionSigner>,
    pub nonce_query: Arc<dyn NonceQuery>,
    pub fee_query: Arc<dyn FeeQuery>,
    pub balance_query: Arc<dyn BalanceQuery>,
    pub resolver: EligibilityResolver,
    pub dispatcher: BroadcastDispatcher,
    pub notifier: FinalizationNotifier,
    pub override_store: Arc<dyn PathOverrideStore>,
}

/// Resolves a pending signing request into a finalized broadcast outcome
pub struct SubmissionEngine {
    token_symbol: String,
    sender_address: String,
    request_context: Option<RequestContext>,
    builder: Arc<dyn UnsignedTransactionBuilder>,
    signer: Arc<dyn TransactionSigner>,
    nonce_query: Arc<dyn NonceQuery>,
    fee_query: Arc<dyn FeeQuery>,
    balance_query: Arc<dyn BalanceQuery>,
    resolver: EligibilityResolver,
    dispatcher: BroadcastDispatcher,
    notifier: FinalizationNotifier,
    override_store: Arc<dyn PathOverrideStore>,

    snapshot: RwLock<QuerySnapshot>,
    eligibility: RwLock<SponsorshipEligibility>,
    attempt_active: AtomicBool,
    last_attempt: parking_lot::Mutex<Option<AttemptSummary>>,
}

impl SubmissionEngine {
    pub fn new(params: EngineParams) -> Self {
        Self {
            token_symbol: params.token_symbol,
            sender_address: params.sender_address,
            request_context: params.request_context,
            builder: params.builder,
            signer: params.signer,
            nonce_query: params.nonce_query,
            fee_query: params.fee_query,
            balance_query: params.balance_query,
            resolver: params.resolver,
            dispatcher: params.dispatcher,
            notifier: params.notifier,
            override_store: params.override_store,
            snapshot: RwLock::new(QuerySnapshot::default()),
            eligibility: RwLock::new(SponsorshipEligibility::Verifying),
            attempt_active: AtomicBool::new(false),
            last_attempt: parking_lot::Mutex::new(None),
        }
    }

    /// Refresh collaborator queries and re-resolve sponsorship eligibility
    ///
    /// Called whenever fee, nonce, or balance inputs change. The snapshot is
    /// replaced wholesale and eligibility passes through `Verifying` while
    /// the resolution round trip is in flight.
    pub async fn refresh(&self, values: &FormValues) -> SponsorshipEligibility {
        *self.eligibility.write().await = SponsorshipEligibility::Verifying;

        let unsigned = match self.builder.build(values).await {
            Ok(tx) => Some(tx),
            Err(err) => {
                warn!(error = %err, "Failed to build unsigned transaction during refresh");
                None
            }
        };

        let (nonce, fees, balance) = futures::join!(
            self.nonce_query.next_nonce(&self.sender_address),
            async {
                match &unsigned {
                    Some(tx) => self.fee_query.estimate_fees(tx).await,
                    None => Err(QueryError::Unavailable(
                        "no unsigned transaction to estimate".to_string(),
                    )),
                }
            },
            self.balance_query.account_balance(&self.sender_address),
        );
        let snapshot = QuerySnapshot::from_results(nonce, fees, balance);
        tracing::debug!(
            nonce_ok = snapshot.nonce.is_success(),
            fees_ok = snapshot.fees.is_success(),
            balance_ok = snapshot.balance.is_success(),
            "Collaborator queries refreshed"
        );
        *self.snapshot.write().await = snapshot.clone();

        let eligibility = match &unsigned {
            Some(tx) => self.resolver.resolve(tx, &snapshot).await,
            None => SponsorshipEligibility::Ineligible {
                reason: IneligibilityReason::TransactionUnavailable,
            },
        };
        *self.eligibility.write().await = eligibility.clone();
        eligibility
    }

    /// Whether a submission attempt may start
    ///
    /// False while the balance or nonce queries are unsettled or failed,
    /// while sponsorship verification is in flight, and from the moment an
    /// attempt starts until it reaches a terminal state.
    pub async fn can_submit(&self) -> bool {
        if self.attempt_active.load(Ordering::Acquire) {
            return false;
        }
        let snapshot = self.snapshot.read().await;
        let eligibility = self.eligibility.read().await;
        snapshot.balance.is_success() && snapshot.nonce.is_success() && !eligibility.is_verifying()
    }

    /// The current eligibility tri-state, for display gating
    pub async fn eligibility(&self) -> SponsorshipEligibility {
        self.eligibility.read().await.clone()
    }

    /// The last finished attempt, for display gating
    pub fn last_attempt(&self) -> Option<AttemptSummary> {
        self.last_attempt.lock().clone()
    }

    /// Run one submission attempt to a terminal state
    ///
    /// Never returns an error: every failure is converted into a single
    /// failure navigation. A call while another attempt is active is
    /// rejected and ignored.
    pub async fn submit(&self, values: FormValues) {
        if self
            .attempt_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("{}", SubmissionError::AttemptInFlight);
            return;
        }
        let _active = scopeguard::guard((), |_| {
            self.attempt_active.store(false, Ordering::Release);
        });
        // Cleared on every exit path, not just the override-consuming one.
        let _override_flag = scopeguard::guard(Arc::clone(&self.override_store), |store| {
            store.clear();
        });

        let mut attempt = Attempt::begin();
        let logger = attempt.context.logger.clone();
        logger.log_submission_started(&self.sender_address);

        match self.run_attempt(&mut attempt, &values).await {
            Ok(tx_id) => {
                logger.log_finalized(tx_id.as_hex());
                *self.last_attempt.lock() = Some(AttemptSummary::from_attempt(&attempt, None));
            }
            Err(err) => {
                let message = err.user_message();
                warn!(
                    attempt_id = %attempt.id,
                    category = err.category(),
                    retryable = err.is_retryable(),
                    error = %err,
                    "Submission attempt failed"
                );
                self.notifier.report_failure(&message);
                attempt.transition(AttemptEvent::FailureSurfaced);
                *self.last_attempt.lock() =
                    Some(AttemptSummary::from_attempt(&attempt, Some(message)));
            }
        }
    }

    async fn run_attempt(
        &self,
        attempt: &mut Attempt,
        values: &FormValues,
    ) -> Result<TxId, SubmissionError> {
        attempt.transition(AttemptEvent::StartResolving);

        // Capture this attempt's inputs: the resolved eligibility and the
        // override flag, read-and-cleared atomically.
        let eligibility = self.eligibility.read().await.clone();
        let override_taken = self.override_store.take();
        attempt.override_taken = override_taken;

        // The override path is provider-directed and independent of
        // sponsorship verification.
        if eligibility.is_verifying() && !override_taken {
            return Err(SubmissionError::EligibilityUnresolved);
        }

        let path = select_path(&eligibility, override_taken);
        attempt.set_path(path);
        attempt.context.logger.log_path_selected(path, override_taken);

        // The sponsored path signs the variant produced at eligibility
        // resolution; the other paths build from the form values.
        let unsigned = match (path, eligibility.sponsored_tx()) {
            (Path::Sponsored, Some(sponsored_tx)) => sponsored_tx.clone(),
            _ => self.builder.build(values).await?,
        };

        attempt.transition(AttemptEvent::StartSigning);
        let signed = match self.signer.sign(&unsigned).await {
            Ok(Some(signed)) => signed,
            Ok(None) => {
                attempt.transition(AttemptEvent::SignFailed);
                attempt.context.logger.log_signing_result(false);
                return Err(SigningError::EmptyResult.into());
            }
            Err(err) => {
                attempt.transition(AttemptEvent::SignFailed);
                attempt.context.logger.log_signing_result(false);
                return Err(err.into());
            }
        };
        attempt.transition(AttemptEvent::SignSucceeded);
        attempt.context.logger.log_signing_result(true);

        attempt.transition(AttemptEvent::StartBroadcast);
        let broadcast_started = std::time::Instant::now();
        let outcome = self.dispatcher.dispatch(path, &signed).await;
        let latency_ms = broadcast_started.elapsed().as_millis() as u64;

        match outcome {
            BroadcastOutcome::Success(success) => {
                attempt.transition(AttemptEvent::BroadcastOk);
                attempt
                    .context
                    .logger
                    .log_broadcast_success(success.tx_id.as_hex(), latency_ms);

                let tx_id = success.tx_id.clone();
                self.notifier.finalize_success(
                    attempt.id,
                    self.request_context.as_ref(),
                    &self.token_symbol,
                    FinalizedPayload {
                        tx_raw: success.raw_tx_hex,
                        tx_id: success.tx_id,
                    },
                )?;
                attempt.transition(AttemptEvent::DeliveryCompleted);
                Ok(tx_id)
            }
            BroadcastOutcome::Failure(err) => {
                attempt.transition(AttemptEvent::BroadcastErr);
                attempt.context.logger.log_broadcast_failure(
                    &err.source().to_string(),
                    err.message(),
                    latency_ms,
                );
                Err(err.into())
            }
        }
    }
}

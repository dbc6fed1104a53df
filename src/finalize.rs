//! Finalization of a submission attempt
//!
//! Reports a completed attempt back to the original requester and drives the
//! local UI to its terminal view. Delivery happens at most once per attempt,
//! and only for successful attempts: a failed attempt navigates to the
//! failure view without touching the requester channel.

use dashmap::DashSet;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::SubmissionError;
use crate::types::{RequestContext, TxId};

/// Payload delivered to the requester on a successful attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedPayload {
    /// Canonical hex serialization of the broadcast transaction
    pub tx_raw: String,

    /// Network-assigned transaction id
    pub tx_id: TxId,
}

/// Local view the UI is driven to at a terminal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Success view parameterized by asset symbol and transaction id
    TransactionSummary { symbol: String, tx_id: TxId },

    /// Failure view carrying a human-readable message
    BroadcastError { message: String },
}

/// Cross-process channel that carries the finalization payload
///
/// Assumed at-most-once per call and fire-and-forget: no acknowledgment is
/// awaited. Reconnection policy belongs to the transport.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, context: &RequestContext, payload: &FinalizedPayload);
}

/// Local navigation collaborator
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, view: View);
}

/// Delivers broadcast outcomes exactly once per attempt
pub struct FinalizationNotifier {
    channel: Arc<dyn DeliveryChannel>,
    navigation: Arc<dyn NavigationSink>,
    delivered: DashSet<Uuid>,
}

impl FinalizationNotifier {
    pub fn new(channel: Arc<dyn DeliveryChannel>, navigation: Arc<dyn NavigationSink>) -> Self {
        Self {
            channel,
            navigation,
            delivered: DashSet::new(),
        }
    }

    /// Report a successful attempt to the requester and the local UI
    ///
    /// Requires a complete request context; an absent context is a
    /// classified local failure, never a silent drop. A repeated call for
    /// the same attempt id is a logged no-op.
    pub fn finalize_success(
        &self,
        attempt_id: Uuid,
        context: Option<&RequestContext>,
        symbol: &str,
        payload: FinalizedPayload,
    ) -> Result<(), SubmissionError> {
        let context = context.ok_or(SubmissionError::MissingRequestContext {
            missing: "request context",
        })?;
        if context.request_token.is_empty() {
            return Err(SubmissionError::MissingRequestContext {
                missing: "request token",
            });
        }

        if !self.delivered.insert(attempt_id) {
            warn!(
                attempt_id = %attempt_id,
                tx_id = %payload.tx_id,
                "Finalization already delivered for this attempt, skipping"
            );
            return Ok(());
        }

        info!(
            attempt_id = %attempt_id,
            tab_id = context.tab_id,
            tx_id = %payload.tx_id,
            "Delivering finalization to requester"
        );
        self.channel.deliver(context, &payload);
        self.navigation.navigate(View::TransactionSummary {
            symbol: symbol.to_string(),
            tx_id: payload.tx_id,
        });
        Ok(())
    }

    /// Surface a failed attempt on the local UI
    ///
    /// Failed attempts are never reported upstream as completed signatures.
    pub fn report_failure(&self, message: &str) {
        self.navigation.navigate(View::BroadcastError {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingDeliveryChannel, RecordingNavigation};

    const TXID: &str = "117a6522b4e9ec27ff10bbe3940a4a07fd58e5352010b4143992edb05a7130c7";

    fn notifier() -> (
        FinalizationNotifier,
        Arc<RecordingDeliveryChannel>,
        Arc<RecordingNavigation>,
    ) {
        let channel = Arc::new(RecordingDeliveryChannel::new());
        let navigation = Arc::new(RecordingNavigation::new());
        let notifier = FinalizationNotifier::new(channel.clone(), navigation.clone());
        (notifier, channel, navigation)
    }

    fn payload() -> FinalizedPayload {
        FinalizedPayload {
            tx_raw: "deadbeef".to_string(),
            tx_id: TxId::parse(TXID).unwrap(),
        }
    }

    fn context() -> RequestContext {
        RequestContext {
            request_token: "token".to_string(),
            tab_id: 7,
        }
    }

    #[test]
    fn test_success_delivers_then_navigates() {
        let (notifier, channel, navigation) = notifier();
        let attempt = Uuid::new_v4();

        notifier
            .finalize_success(attempt, Some(&context()), "STX", payload())
            .unwrap();

        assert_eq!(channel.deliveries().len(), 1);
        let views = navigation.views();
        assert_eq!(views.len(), 1);
        assert!(matches!(
            &views[0],
            View::TransactionSummary { symbol, .. } if symbol == "STX"
        ));
    }

    #[test]
    fn test_duplicate_finalization_is_a_noop() {
        let (notifier, channel, navigation) = notifier();
        let attempt = Uuid::new_v4();

        notifier
            .finalize_success(attempt, Some(&context()), "STX", payload())
            .unwrap();
        notifier
            .finalize_success(attempt, Some(&context()), "STX", payload())
            .unwrap();

        assert_eq!(channel.deliveries().len(), 1);
        assert_eq!(navigation.views().len(), 1);
    }

    #[test]
    fn test_new_attempt_gets_its_own_delivery() {
        let (notifier, channel, _navigation) = notifier();

        notifier
            .finalize_success(Uuid::new_v4(), Some(&context()), "STX", payload())
            .unwrap();
        notifier
            .finalize_success(Uuid::new_v4(), Some(&context()), "STX", payload())
            .unwrap();

        assert_eq!(channel.deliveries().len(), 2);
    }

    #[test]
    fn test_missing_context_fails_loudly_without_delivery() {
        let (notifier, channel, _navigation) = notifier();

        let err = notifier
            .finalize_success(Uuid::new_v4(), None, "STX", payload())
            .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::MissingRequestContext { .. }
        ));
        assert!(channel.deliveries().is_empty());

        let empty_token = RequestContext {
            request_token: String::new(),
            tab_id: 7,
        };
        let err = notifier
            .finalize_success(Uuid::new_v4(), Some(&empty_token), "STX", payload())
            .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::MissingRequestContext { missing: "request token" }
        ));
        assert!(channel.deliveries().is_empty());
    }

    #[test]
    fn test_failure_never_touches_the_channel() {
        let (notifier, channel, navigation) = notifier();

        notifier.report_failure("sponsor rejected");

        assert!(channel.deliveries().is_empty());
        let views = navigation.views();
        assert!(matches!(
            &views[0],
            View::BroadcastError { message } if message == "sponsor rejected"
        ));
    }
}

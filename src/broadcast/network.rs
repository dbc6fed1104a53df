//! Standard network broadcast adapter
//!
//! Posts the canonical transaction bytes to the node core API. The node
//! answers a success with a JSON-encoded transaction id string and a
//! rejection with an `{error, reason}` body; both shapes are normalized
//! here.

use serde::Deserialize;

use crate::broadcast::errors::BroadcastError;
use crate::broadcast::outcome::BroadcastSuccess;
use crate::broadcast::BroadcastBackend;
use crate::config::NetworkConfig;
use crate::types::{SignedTransaction, TxId};

/// Rejection body returned by the node core API
#[derive(Debug, Deserialize)]
struct NodeErrorBody {
    error: Option<String>,
    reason: Option<String>,
}

pub struct NetworkBroadcaster {
    client: reqwest::Client,
    base_url: String,
}

impl NetworkBroadcaster {
    pub fn new(config: &NetworkConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.core_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn transactions_url(&self) -> String {
        format!("{}/v2/transactions", self.base_url)
    }

    async fn broadcast_inner(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        let response = self
            .client
            .post(self.transactions_url())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(signed.raw_bytes().to_vec())
            .send()
            .await
            .map_err(|err| BroadcastError::Network {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BroadcastError::Network {
                message: err.to_string(),
            })?;

        if !status.is_success() {
            return Err(BroadcastError::Network {
                message: extract_node_error(&body, status),
            });
        }

        // The node answers with a JSON string; tolerate a bare id as well.
        let raw_id: String = serde_json::from_str(&body)
            .unwrap_or_else(|_| body.trim().trim_matches('"').to_string());
        let tx_id = TxId::parse(&raw_id).map_err(|err| BroadcastError::Network {
            message: format!("node returned malformed transaction id: {err}"),
        })?;

        Ok(BroadcastSuccess {
            tx_id,
            raw_tx_hex: signed.to_raw_hex(),
        })
    }
}

fn extract_node_error(body: &str, status: reqwest::StatusCode) -> String {
    match serde_json::from_str::<NodeErrorBody>(body) {
        Ok(parsed) => match (parsed.error, parsed.reason) {
            (Some(error), Some(reason)) => format!("{error} ({reason})"),
            (Some(error), None) => error,
            (None, Some(reason)) => reason,
            (None, None) => format!("node rejected transaction with status {status}"),
        },
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("node rejected transaction with status {status}"),
    }
}

#[async_trait::async_trait]
impl BroadcastBackend for NetworkBroadcaster {
    async fn broadcast(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        self.broadcast_inner(signed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_node_error_prefers_error_and_reason() {
        let body = r#"{"error": "transaction rejected", "reason": "BadNonce"}"#;
        let message = extract_node_error(body, reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(message, "transaction rejected (BadNonce)");
    }

    #[test]
    fn test_extract_node_error_falls_back_to_body_then_status() {
        let message = extract_node_error("gateway timeout", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(message, "gateway timeout");

        let message = extract_node_error("", reqwest::StatusCode::BAD_GATEWAY);
        assert!(message.contains("502"));
    }
}

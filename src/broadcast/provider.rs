//! Alternate-provider broadcast adapter
//!
//! The provider accepts `{serializedTx, fee}` and answers `{txid}`. Failure
//! message extraction prefers the nested body `message` field, falls back to
//! the transport error text, and bottoms out at a fixed unknown-error
//! string.

use serde::{Deserialize, Serialize};

use crate::broadcast::errors::BroadcastError;
use crate::broadcast::outcome::BroadcastSuccess;
use crate::broadcast::{shared_client, BroadcastBackend};
use crate::config::{NetworkId, ProviderConfig};
use crate::types::{SignedTransaction, TxId};

const UNKNOWN_ERROR: &str = "unknown error occurred";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRequest<'a> {
    serialized_tx: &'a str,
    fee: String,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    txid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

pub struct AlternateProviderClient {
    client: reqwest::Client,
    base_url: String,
    relay_fee: u64,
}

impl AlternateProviderClient {
    pub fn new(config: &ProviderConfig, network: NetworkId) -> Self {
        Self {
            client: shared_client(),
            base_url: config.url_for_network(network).trim_end_matches('/').to_string(),
            relay_fee: config.relay_fee,
        }
    }

    fn submit_url(&self) -> String {
        format!("{}/sponsor/token/transaction", self.base_url)
    }

    async fn submit_inner(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        let raw_tx_hex = signed.to_raw_hex();
        let request = ProviderRequest {
            serialized_tx: &raw_tx_hex,
            fee: self.relay_fee.to_string(),
        };

        let response = self
            .client
            .post(self.submit_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| BroadcastError::Provider {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| BroadcastError::Provider {
                message: err.to_string(),
            })?;

        if !status.is_success() {
            return Err(BroadcastError::Provider {
                message: extract_provider_error(&body, status),
            });
        }

        let parsed: ProviderResponse = serde_json::from_str(&body).unwrap_or(ProviderResponse {
            txid: None,
        });
        let raw_id = match parsed.txid {
            Some(raw_id) => raw_id,
            None => {
                return Err(BroadcastError::Provider {
                    message: UNKNOWN_ERROR.to_string(),
                })
            }
        };

        let tx_id = TxId::parse(&raw_id).map_err(|err| BroadcastError::Provider {
            message: format!("provider returned malformed transaction id: {err}"),
        })?;

        Ok(BroadcastSuccess { tx_id, raw_tx_hex })
    }
}

/// Prefer the nested `message` field, falling back to a status-derived text
fn extract_provider_error(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}

#[async_trait::async_trait]
impl BroadcastBackend for AlternateProviderClient {
    async fn broadcast(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        self.submit_inner(signed).await
    }
}

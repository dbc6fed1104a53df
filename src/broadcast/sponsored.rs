//! Sponsorship-service broadcast adapter
//!
//! The service relays the sponsored transaction and pays its fee. Its
//! response shape is `{txid}` on acceptance and `{error}` otherwise; a
//! success-status body without a `txid` is a rejection, not a success.

use serde::{Deserialize, Serialize};

use crate::broadcast::errors::BroadcastError;
use crate::broadcast::outcome::BroadcastSuccess;
use crate::broadcast::{shared_client, BroadcastBackend};
use crate::config::SponsorshipConfig;
use crate::types::{SignedTransaction, TxId};

#[derive(Debug, Serialize)]
struct SponsorshipRequest<'a> {
    tx: &'a str,
}

#[derive(Debug, Deserialize)]
struct SponsorshipResponse {
    txid: Option<String>,
    error: Option<String>,
}

pub struct SponsorshipClient {
    client: reqwest::Client,
    api_url: String,
}

impl SponsorshipClient {
    pub fn new(config: &SponsorshipConfig) -> Self {
        Self {
            client: shared_client(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn submit_url(&self) -> String {
        format!("{}/sponsor/transaction", self.api_url)
    }

    async fn submit_inner(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        let raw_tx_hex = signed.to_raw_hex();
        let response = self
            .client
            .post(self.submit_url())
            .json(&SponsorshipRequest { tx: &raw_tx_hex })
            .send()
            .await
            .map_err(|err| BroadcastError::Sponsorship {
                message: err.to_string(),
            })?;

        let body = response
            .text()
            .await
            .map_err(|err| BroadcastError::Sponsorship {
                message: err.to_string(),
            })?;

        let parsed: SponsorshipResponse =
            serde_json::from_str(&body).map_err(|_| BroadcastError::Sponsorship {
                message: "sponsorship service returned an unrecognized response".to_string(),
            })?;

        // A 200-shaped body without a txid is a rejection carrying the
        // service's error field.
        let raw_id = match parsed.txid {
            Some(raw_id) => raw_id,
            None => {
                return Err(BroadcastError::Sponsorship {
                    message: parsed.error.unwrap_or_else(|| {
                        "sponsorship service returned no transaction id".to_string()
                    }),
                })
            }
        };

        let tx_id = TxId::parse(&raw_id).map_err(|err| BroadcastError::Sponsorship {
            message: format!("sponsorship service returned malformed transaction id: {err}"),
        })?;

        Ok(BroadcastSuccess { tx_id, raw_tx_hex })
    }
}

#[async_trait::async_trait]
impl BroadcastBackend for SponsorshipClient {
    async fn broadcast(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError> {
        self.submit_inner(signed).await
    }
}

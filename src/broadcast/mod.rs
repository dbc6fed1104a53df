//! Broadcast dispatcher supercomponent
//!
//! Routes a signed transaction to exactly one of three backends and
//! normalizes each backend's response/error shape into a single
//! [`BroadcastOutcome`]:
//!
//! - **network**: direct broadcast through the node core API
//! - **sponsored**: fee-relayed broadcast through the sponsorship service
//! - **provider**: fee-relayed broadcast through the alternate provider
//!
//! The dispatcher never retries; a backend failure is terminal for the
//! attempt and propagates to the finalization failure path.

pub mod errors;
mod network;
mod outcome;
mod provider;
mod sponsored;

pub use errors::{BroadcastError, BroadcastErrorSource};
pub use network::NetworkBroadcaster;
pub use outcome::{BroadcastOutcome, BroadcastSuccess};
pub use provider::AlternateProviderClient;
pub use sponsored::SponsorshipClient;

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{info, warn};

use crate::config::Config;
use crate::types::{Path, SignedTransaction};

/// One broadcast backend behind a common contract
#[async_trait::async_trait]
pub trait BroadcastBackend: Send + Sync {
    async fn broadcast(
        &self,
        signed: &SignedTransaction,
    ) -> Result<BroadcastSuccess, BroadcastError>;
}

static SHARED_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Shared HTTP client for adapters without per-adapter timeout needs
pub(crate) fn shared_client() -> reqwest::Client {
    SHARED_CLIENT.clone()
}

/// Routes each dispatch to exactly one backend
pub struct BroadcastDispatcher {
    network: Arc<dyn BroadcastBackend>,
    sponsorship: Arc<dyn BroadcastBackend>,
    provider: Arc<dyn BroadcastBackend>,
}

impl BroadcastDispatcher {
    pub fn new(
        network: Arc<dyn BroadcastBackend>,
        sponsorship: Arc<dyn BroadcastBackend>,
        provider: Arc<dyn BroadcastBackend>,
    ) -> Self {
        Self {
            network,
            sponsorship,
            provider,
        }
    }

    /// Build the three concrete HTTP backends from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(NetworkBroadcaster::new(&config.network)?),
            Arc::new(SponsorshipClient::new(&config.sponsorship)),
            Arc::new(AlternateProviderClient::new(
                &config.provider,
                config.network.id,
            )),
        ))
    }

    /// Broadcast through the backend selected for this attempt
    ///
    /// Exactly one backend executes per call; the match is the whole routing
    /// decision.
    pub async fn dispatch(&self, path: Path, signed: &SignedTransaction) -> BroadcastOutcome {
        let backend = match path {
            Path::Standard => &self.network,
            Path::Sponsored => &self.sponsorship,
            Path::AlternateProvider => &self.provider,
        };

        let result = backend.broadcast(signed).await;
        match &result {
            Ok(success) => {
                info!(
                    path = %path,
                    tx_id = %success.tx_id,
                    tx_digest = %signed.digest(),
                    "Broadcast accepted"
                );
            }
            Err(err) => {
                warn!(
                    path = %path,
                    source = %err.source(),
                    error = %err.message(),
                    tx_digest = %signed.digest(),
                    "Broadcast failed"
                );
            }
        }
        result.into()
    }
}

//! Reverse-proxy reload trigger
//!
//! After records are reconciled, Traefik is asked to reload its providers
//! with a single POST. The call is independent of DNS correctness and can
//! be disabled entirely.

use crate::config::ReloadConfig;
use crate::error::{Error, Result};
use crate::traits::{HttpRequest, HttpTransport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a reload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadOutcome {
    /// True when no request was sent
    pub skipped: bool,
    /// HTTP status of the reload call, when one was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ReloadOutcome {
    /// Outcome for a reload that was not attempted
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            status: None,
        }
    }
}

/// Triggers the proxy reload endpoint
pub struct ProxyReloader {
    /// HTTP transport
    transport: Arc<dyn HttpTransport>,

    /// Endpoint, auth header and skip flag
    config: ReloadConfig,
}

impl ProxyReloader {
    /// Create a new reloader
    pub fn new(transport: Arc<dyn HttpTransport>, config: ReloadConfig) -> Self {
        Self { transport, config }
    }

    /// Whether failures of this reloader may be ignored
    pub fn is_skippable(&self) -> bool {
        self.config.skip
    }

    /// POST to the reload endpoint
    ///
    /// # Returns
    ///
    /// - `Ok(ReloadOutcome { skipped: true, .. })`: skip flag set or no URL, no request sent
    /// - `Ok(ReloadOutcome { skipped: false, status })`: 2xx response
    /// - `Err(Error::Reload)`: any other status
    pub async fn reload(&self) -> Result<ReloadOutcome> {
        let url = match self.config.url.as_deref() {
            Some(url) if !url.is_empty() && !self.config.skip => url,
            _ => {
                debug!("Proxy reload skipped");
                return Ok(ReloadOutcome::skipped());
            }
        };

        let mut request = HttpRequest::new(url);
        if let Some(auth) = self.config.authorization.as_deref().filter(|a| !a.is_empty()) {
            request = request.with_header("Authorization", auth);
        }

        debug!("Triggering proxy reload: {}", url);
        let response = self.transport.post(request).await?;

        if !response.is_success() {
            return Err(Error::Reload {
                status: response.status,
            });
        }

        info!("Proxy reload accepted with status {}", response.status);
        Ok(ReloadOutcome {
            skipped: false,
            status: Some(response.status),
        })
    }
}

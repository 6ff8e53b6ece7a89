//! One full sync pass: validate, reconcile, reload

use crate::config::SyncConfig;
use crate::error::Result;
use crate::reconciler::{Outcome, Reconciler};
use crate::reload::{ProxyReloader, ReloadOutcome};
use crate::traits::{DnsProvider, HttpTransport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Summary printed at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Per-subdomain outcomes, in input order
    pub dns_results: Vec<Outcome>,
    /// Proxy reload result
    pub reload: ReloadOutcome,
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// When the pass finished
    pub generated_at: DateTime<Utc>,
}

/// Run one sync pass
///
/// The configuration is validated before any network call. DNS failures
/// always propagate. A reload failure is swallowed only when the reload is
/// configured as skippable.
pub async fn run_sync(
    config: &SyncConfig,
    provider: Box<dyn DnsProvider>,
    transport: Arc<dyn HttpTransport>,
) -> Result<SyncReport> {
    config.validate()?;

    let desired = config.desired_records();
    info!(
        "Syncing {} record(s) -> {} via {}",
        desired.len(),
        config.target,
        provider.provider_name()
    );

    let reconciler = Reconciler::new(provider, config.dry_run);
    let dns_results = reconciler.ensure_all(&desired).await?;

    let reloader = ProxyReloader::new(transport, config.reload.clone());
    let reload = match reloader.reload().await {
        Ok(outcome) => outcome,
        Err(e) if reloader.is_skippable() => {
            warn!("Ignoring proxy reload failure: {}", e);
            ReloadOutcome::skipped()
        }
        Err(e) => return Err(e),
    };

    Ok(SyncReport {
        dns_results,
        reload,
        dry_run: config.dry_run,
        generated_at: Utc::now(),
    })
}

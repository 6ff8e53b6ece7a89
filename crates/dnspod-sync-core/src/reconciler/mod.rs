//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Reading the current record for each desired `(subdomain, type)`
//! - Deciding between create, update, or no-op
//! - Suppressing writes in dry-run mode
//!
//! ## Decision Flow
//!
//! ```text
//!                 find_record(subdomain, type)
//!                             │
//!            ┌────────────────┴────────────────┐
//!            ▼                                 ▼
//!         (none)                          (existing)
//!            │                                 │
//!     create / planned              ┌──────────┴──────────┐
//!                                   ▼                     ▼
//!                         value & ttl equal         otherwise
//!                                   │                     │
//!                               unchanged          modify / planned
//! ```
//!
//! Each call performs exactly one read and at most one write. Entries are
//! processed strictly one after another; the first failure aborts the pass
//! and earlier writes are not rolled back.

use crate::config::DesiredRecord;
use crate::error::Result;
use crate::traits::{DnsProvider, ProviderRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What the Reconciler did (or would do) for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Record already matched; nothing written
    Unchanged,
    /// Record did not exist and was created
    Created,
    /// Record existed with a different value or TTL and was modified
    Updated,
    /// A write was needed but dry-run suppressed it
    Planned,
}

/// Result of reconciling one desired record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Action taken
    pub action: Action,
    /// Record identifier, if known
    pub record_id: Option<String>,
    /// Subdomain label
    pub sub_domain: String,
    /// Desired value
    pub value: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
}

impl Outcome {
    fn for_existing(action: Action, record_id: Option<String>, existing: &ProviderRecord, desired: &DesiredRecord) -> Self {
        Self {
            action,
            record_id,
            sub_domain: existing.name.clone(),
            value: desired.value.clone(),
            record_type: existing.record_type.clone(),
        }
    }

    fn for_missing(action: Action, record_id: Option<String>, desired: &DesiredRecord) -> Self {
        Self {
            action,
            record_id,
            sub_domain: desired.subdomain.clone(),
            value: desired.value.clone(),
            record_type: desired.record_type.to_string(),
        }
    }
}

/// Idempotent DNS record reconciler
///
/// ## Dry-Run Mode
///
/// When `dry_run` is true the Reconciler still performs the read lookup
/// but never calls `create_record` or `modify_record`, and reports
/// [`Action::Planned`] wherever a write would have happened.
pub struct Reconciler {
    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// Suppress all writes
    dry_run: bool,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(provider: Box<dyn DnsProvider>, dry_run: bool) -> Self {
        if dry_run {
            warn!(
                "Reconciler for {} running in DRY-RUN mode - no changes will be made",
                provider.provider_name()
            );
        }
        Self { provider, dry_run }
    }

    /// Whether writes are suppressed
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Bring one record in line with `desired`
    ///
    /// # Returns
    ///
    /// - `Ok(Outcome)`: what was done
    /// - `Err(Error)`: the first failing provider call, unretried
    pub async fn ensure(&self, desired: &DesiredRecord) -> Result<Outcome> {
        let record_type = desired.record_type.as_str();

        debug!(
            "Reconciling {} ({}) -> {} ttl={}",
            desired.subdomain, record_type, desired.value, desired.ttl
        );

        let existing = self
            .provider
            .find_record(&desired.subdomain, record_type)
            .await?;

        let Some(existing) = existing else {
            return self.create(desired).await;
        };

        if existing.matches(desired) {
            info!(
                "Record {} ({}) already points at {}",
                existing.name, existing.record_type, desired.value
            );
            return Ok(Outcome::for_existing(
                Action::Unchanged,
                Some(existing.id.clone()),
                &existing,
                desired,
            ));
        }

        self.modify(&existing, desired).await
    }

    /// Reconcile every record in order, stopping at the first failure
    pub async fn ensure_all(&self, desired: &[DesiredRecord]) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(desired.len());

        for record in desired {
            let outcome = self.ensure(record).await?;
            outcomes.push(outcome);
        }

        info!(
            "Reconciled {} record(s) via {}",
            outcomes.len(),
            self.provider.provider_name()
        );
        Ok(outcomes)
    }

    async fn create(&self, desired: &DesiredRecord) -> Result<Outcome> {
        if self.dry_run {
            info!(
                "[DRY-RUN] Would create {} ({}) -> {}",
                desired.subdomain, desired.record_type, desired.value
            );
            return Ok(Outcome::for_missing(Action::Planned, None, desired));
        }

        let record_id = self.provider.create_record(desired).await?;
        info!(
            "Created {} ({}) -> {} [id: {}]",
            desired.subdomain,
            desired.record_type,
            desired.value,
            record_id.as_deref().unwrap_or("-")
        );
        Ok(Outcome::for_missing(Action::Created, record_id, desired))
    }

    async fn modify(&self, existing: &ProviderRecord, desired: &DesiredRecord) -> Result<Outcome> {
        if self.dry_run {
            info!(
                "[DRY-RUN] Would update {} ({}) -> {} (was: {})",
                existing.name, existing.record_type, desired.value, existing.value
            );
            return Ok(Outcome::for_existing(
                Action::Planned,
                Some(existing.id.clone()),
                existing,
                desired,
            ));
        }

        let record_id = self
            .provider
            .modify_record(existing, desired)
            .await?
            .unwrap_or_else(|| existing.id.clone());

        info!(
            "Updated {} ({}) -> {} (was: {})",
            existing.name, existing.record_type, desired.value, existing.value
        );
        Ok(Outcome::for_existing(
            Action::Updated,
            Some(record_id),
            existing,
            desired,
        ))
    }
}

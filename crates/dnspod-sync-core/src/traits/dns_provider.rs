// # DNS Provider Trait
//
// Defines the record-level operations the Reconciler needs from a provider.
//
// ## Implementations
//
// - DNSPod: `dnspod-sync-provider-dnspod` crate
//
// ## Usage
//
// ```rust,ignore
// use dnspod_sync_core::{DesiredRecord, DnsProvider};
//
// async fn show(provider: &dyn DnsProvider) -> dnspod_sync_core::Result<()> {
//     if let Some(record) = provider.find_record("www", "A").await? {
//         println!("{} -> {}", record.name, record.value);
//     }
//     Ok(())
// }
// ```

use crate::config::DesiredRecord;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A record as stored by the provider
///
/// Read-only snapshot fetched per call. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// Subdomain label the record is stored under
    pub name: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Current record value
    pub value: String,
    /// TTL in seconds; `None` if the provider returned something non-numeric
    pub ttl: Option<u32>,
    /// Routing line the record is served on; `None` means the provider default
    pub line_id: Option<String>,
}

impl ProviderRecord {
    /// Whether the stored value and TTL already match the desired record
    ///
    /// TTLs are compared as integers. An unparsable stored TTL never matches.
    pub fn matches(&self, desired: &DesiredRecord) -> bool {
        self.value == desired.value && self.ttl == Some(desired.ttl)
    }
}

/// Trait for DNS provider implementations
///
/// Providers execute single API calls. They do NOT decide whether a write
/// is needed, do NOT retry, and do NOT honour dry-run; all of that belongs
/// to the [`Reconciler`](crate::Reconciler).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up the record for `(subdomain, record_type)`
    ///
    /// Returns the first record the provider lists, or `None`.
    async fn find_record(&self, subdomain: &str, record_type: &str) -> Result<Option<ProviderRecord>>;

    /// Create a record
    ///
    /// Returns the identifier assigned by the provider, if it reported one.
    async fn create_record(&self, desired: &DesiredRecord) -> Result<Option<String>>;

    /// Overwrite `existing` with the desired value and TTL
    ///
    /// Keeps the existing record's name, type and routing line. Returns the
    /// identifier from the response, if it reported one.
    async fn modify_record(
        &self,
        existing: &ProviderRecord,
        desired: &DesiredRecord,
    ) -> Result<Option<String>>;

    /// Get the provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

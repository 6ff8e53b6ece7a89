// # DNSPod DNS Provider
//
// This crate provides the DNSPod provider (legacy `dnsapi.cn` API) and the
// reqwest-backed HTTP transport for dnspod-sync.
//
// ## Scope
//
// - ✅ One HTTP request per trait call
// - ✅ Full error propagation (endpoint path + provider message)
// - ✅ Domain addressed by `domain_id` when configured, else by `domain`
// - ❌ NO decision about whether a write is needed (owned by Reconciler)
// - ❌ NO dry-run handling (owned by Reconciler)
// - ❌ NO retry logic
//
// ## Security Requirements
//
// - Login token NEVER appears in logs or Debug output
//
// ## API Reference
//
// All calls are `POST <base><path>` with a form-encoded body and a JSON
// response whose `status.code` is `"1"` on success.
//
// - List records:   `/Record.List`   (`sub_domain`, `record_type`)
// - Create record:  `/Record.Create` (`sub_domain`, `record_type`, `value`, `ttl`, `record_line_id`)
// - Modify record:  `/Record.Modify` (`record_id`, + the create fields)

mod types;
pub mod transport;

pub use transport::ReqwestTransport;

use async_trait::async_trait;
use dnspod_sync_core::traits::{DnsProvider, HttpRequest, HttpTransport, ProviderRecord};
use dnspod_sync_core::{DesiredRecord, DomainRef, Error, ProviderConfig, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use types::{RecordList, RecordWrite};

/// List records endpoint
pub const RECORD_LIST: &str = "/Record.List";

/// Create record endpoint
pub const RECORD_CREATE: &str = "/Record.Create";

/// Modify record endpoint
pub const RECORD_MODIFY: &str = "/Record.Modify";

/// DNSPod's default routing line
pub const DEFAULT_RECORD_LINE_ID: &str = "0";

/// Value of `status.code` on success
const SUCCESS_CODE: &str = "1";

/// DNSPod DNS provider
pub struct DnspodProvider {
    /// DNSPod login token (`id,token`)
    /// ⚠️ NEVER log this value
    login_token: String,

    /// Zone reference sent with every request
    domain: DomainRef,

    /// API base URL without trailing slash
    api_base: String,

    /// HTTP transport
    transport: Arc<dyn HttpTransport>,
}

// Custom Debug implementation that hides the login token
impl std::fmt::Debug for DnspodProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnspodProvider")
            .field("login_token", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl DnspodProvider {
    /// Create a provider from a connection config
    ///
    /// Only the zone reference is required here; the rest of the config is
    /// checked by [`SyncConfig::validate`](dnspod_sync_core::SyncConfig::validate)
    /// before the first request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if neither a domain nor a domain id is set.
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let domain = config.domain_ref().ok_or_else(|| {
            Error::validation("Provide --domain or --domain-id (or TRAEFIK_DOMAIN / TRAEFIK_DNSPOD_DOMAIN_ID)")
        })?;

        Ok(Self {
            login_token: config.login_token.clone(),
            domain,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            transport,
        })
    }

    /// Call one API endpoint and return its payload
    ///
    /// # Errors
    ///
    /// - [`Error::HttpStatus`]: non-2xx HTTP response
    /// - [`Error::Api`]: `status.code` is not `"1"`, or the body is not JSON
    async fn call<T: DeserializeOwned + Send>(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<T> {
        let mut form: Vec<(String, String)> = vec![
            ("format".to_string(), "json".to_string()),
            ("lang".to_string(), "en".to_string()),
        ];
        form.push(match &self.domain {
            DomainRef::Id(id) => ("domain_id".to_string(), id.clone()),
            DomainRef::Name(name) => ("domain".to_string(), name.clone()),
        });
        form.extend(params.into_iter().map(|(k, v)| (k.to_string(), v)));
        form.push(("login_token".to_string(), self.login_token.clone()));

        let url = format!("{}{}", self.api_base, endpoint);
        tracing::debug!("DNSPod request: POST {}", url);

        let response = self
            .transport
            .post(HttpRequest::new(url).with_form(form))
            .await?;

        if !response.is_success() {
            return Err(Error::http_status(endpoint, response.status));
        }

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::api(endpoint, format!("Invalid JSON response: {}", e)))?;

        let status = &payload["status"];
        if status["code"].as_str() != Some(SUCCESS_CODE) {
            let message = status["message"]
                .as_str()
                .filter(|m| !m.is_empty())
                .unwrap_or("Unknown error");
            return Err(Error::api(endpoint, message));
        }

        serde_json::from_value(payload)
            .map_err(|e| Error::api(endpoint, format!("Unexpected response format: {}", e)))
    }
}

#[async_trait]
impl DnsProvider for DnspodProvider {
    async fn find_record(&self, subdomain: &str, record_type: &str) -> Result<Option<ProviderRecord>> {
        let list: RecordList = self
            .call(
                RECORD_LIST,
                vec![
                    ("sub_domain", subdomain.to_string()),
                    ("record_type", record_type.to_string()),
                ],
            )
            .await?;

        if list.records.len() > 1 {
            tracing::warn!(
                "DNSPod returned {} records for {} ({}); only the first is reconciled",
                list.records.len(),
                subdomain,
                record_type
            );
        }

        Ok(list.records.into_iter().next().map(ProviderRecord::from))
    }

    async fn create_record(&self, desired: &DesiredRecord) -> Result<Option<String>> {
        let write: RecordWrite = self
            .call(
                RECORD_CREATE,
                vec![
                    ("sub_domain", desired.subdomain.clone()),
                    ("record_type", desired.record_type.to_string()),
                    ("value", desired.value.clone()),
                    ("ttl", desired.ttl.to_string()),
                    ("record_line_id", DEFAULT_RECORD_LINE_ID.to_string()),
                ],
            )
            .await?;

        Ok(write.record_id())
    }

    async fn modify_record(
        &self,
        existing: &ProviderRecord,
        desired: &DesiredRecord,
    ) -> Result<Option<String>> {
        let line_id = existing
            .line_id
            .clone()
            .unwrap_or_else(|| DEFAULT_RECORD_LINE_ID.to_string());

        let write: RecordWrite = self
            .call(
                RECORD_MODIFY,
                vec![
                    ("record_id", existing.id.clone()),
                    ("sub_domain", existing.name.clone()),
                    ("value", desired.value.clone()),
                    ("record_type", existing.record_type.clone()),
                    ("ttl", desired.ttl.to_string()),
                    ("record_line_id", line_id),
                ],
            )
            .await?;

        Ok(write.record_id())
    }

    fn provider_name(&self) -> &'static str {
        "dnspod"
    }
}

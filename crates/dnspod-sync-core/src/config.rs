//! Configuration types for dnspod-sync
//!
//! Defaults live in named constants and are copied into [`SyncConfig`] at
//! startup. Nothing in the crate reads ambient globals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subdomains reconciled when none are given
pub const DEFAULT_SUBDOMAINS: &[&str] = &["@", "*", "www"];

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 600;

/// Default Traefik provider reload endpoint
pub const DEFAULT_RELOAD_URL: &str = "http://127.0.0.1:8080/api/providers/reload";

/// DNSPod legacy API base URL
pub const DEFAULT_API_BASE: &str = "https://dnsapi.cn";

/// Main sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS provider connection
    pub provider: ProviderConfig,

    /// Value every managed record should point at
    #[serde(default)]
    pub target: String,

    /// Record TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Record type for all managed subdomains
    #[serde(default)]
    pub record_type: RecordType,

    /// Subdomains to reconcile, processed in order
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Read-only mode: report intended writes without performing them
    #[serde(default)]
    pub dry_run: bool,

    /// Proxy reload settings
    #[serde(default)]
    pub reload: ReloadConfig,
}

impl SyncConfig {
    /// Create a configuration with the default subdomains, TTL and reload URL
    pub fn new(provider: ProviderConfig, target: impl Into<String>) -> Self {
        Self {
            provider,
            target: target.into(),
            ttl: DEFAULT_TTL,
            record_type: RecordType::default(),
            subdomains: default_subdomains(),
            dry_run: false,
            reload: ReloadConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// Runs before any network call. The first problem found is reported.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;

        if self.target.trim().is_empty() {
            return Err(crate::Error::validation(
                "Missing target IP (use --ip or TRAEFIK_TARGET_IP)",
            ));
        }

        if self.subdomains.iter().all(|s| s.trim().is_empty()) {
            return Err(crate::Error::validation("At least one subdomain is required"));
        }

        if self.ttl == 0 {
            return Err(crate::Error::validation(
                "TTL must be a positive number of seconds",
            ));
        }

        Ok(())
    }

    /// Expand the configuration into one desired record per subdomain
    pub fn desired_records(&self) -> Vec<DesiredRecord> {
        self.subdomains
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|sub| DesiredRecord {
                subdomain: sub.to_string(),
                record_type: self.record_type,
                value: self.target.clone(),
                ttl: self.ttl,
            })
            .collect()
    }
}

/// How requests identify the zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRef {
    /// Domain name, e.g. "example.com"
    Name(String),
    /// DNSPod numeric domain identifier
    Id(String),
}

/// DNSPod connection configuration
///
/// The Debug implementation does NOT expose the login token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// DNSPod login token in `id,token` form
    pub login_token: String,

    /// Root domain name
    #[serde(default)]
    pub domain: Option<String>,

    /// DNSPod domain identifier; takes precedence over `domain`
    #[serde(default)]
    pub domain_id: Option<String>,

    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("login_token", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("domain_id", &self.domain_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a provider configuration against the public DNSPod API
    pub fn new(login_token: impl Into<String>) -> Self {
        Self {
            login_token: login_token.into(),
            domain: None,
            domain_id: None,
            api_base: default_api_base(),
        }
    }

    /// Set the domain name
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the domain identifier
    pub fn with_domain_id(mut self, domain_id: impl Into<String>) -> Self {
        self.domain_id = Some(domain_id.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// The zone reference sent with every request
    ///
    /// A domain id wins over a domain name. Empty strings count as absent.
    pub fn domain_ref(&self) -> Option<DomainRef> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        non_empty(&self.domain_id)
            .map(DomainRef::Id)
            .or_else(|| non_empty(&self.domain).map(DomainRef::Name))
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.login_token.is_empty() {
            return Err(crate::Error::validation(
                "Missing DNSPod API token. Use --token or TRAEFIK_DNSPOD_API_KEY",
            ));
        }

        if self.domain_ref().is_none() {
            return Err(crate::Error::validation(
                "Provide --domain or --domain-id (or TRAEFIK_DOMAIN / TRAEFIK_DNSPOD_DOMAIN_ID)",
            ));
        }

        if self.api_base.is_empty() {
            return Err(crate::Error::validation("DNSPod API base URL cannot be empty"));
        }

        Ok(())
    }
}

/// Proxy reload configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Reload endpoint; `None` or empty disables the call
    #[serde(default)]
    pub url: Option<String>,

    /// Static `Authorization` header value
    #[serde(default)]
    pub authorization: Option<String>,

    /// Never call the endpoint and ignore reload failures
    #[serde(default)]
    pub skip: bool,
}

impl fmt::Debug for ReloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadConfig")
            .field("url", &self.url)
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "<REDACTED>"),
            )
            .field("skip", &self.skip)
            .finish()
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            url: Some(DEFAULT_RELOAD_URL.to_string()),
            authorization: None,
            skip: false,
        }
    }
}

/// One record the caller wants to exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Host label relative to the domain; `@` and `*` pass through as-is
    pub subdomain: String,

    /// Record type
    pub record_type: RecordType,

    /// Target value, not validated
    pub value: String,

    /// TTL in seconds
    pub ttl: u32,
}

impl DesiredRecord {
    /// Create a desired A record with the default TTL
    pub fn new(subdomain: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            record_type: RecordType::A,
            value: value.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    #[default]
    A,
    /// AAAA record (IPv6)
    Aaaa,
    /// CNAME record
    Cname,
    /// TXT record
    Txt,
}

impl RecordType {
    /// Wire name used by the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "TXT" => Ok(RecordType::Txt),
            other => Err(crate::Error::validation(format!(
                "Unsupported record type '{}'. Supported: A, AAAA, CNAME, TXT",
                other
            ))),
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_subdomains() -> Vec<String> {
    DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

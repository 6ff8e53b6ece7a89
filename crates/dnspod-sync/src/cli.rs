//! Command-line flags and environment fallbacks
//!
//! Flags win over environment variables. Where two environment variables
//! are listed, the first one that is set and non-empty wins.

use anyhow::{Context, Result};
use clap::Parser;
use dnspod_sync_core::config::{DEFAULT_API_BASE, DEFAULT_RELOAD_URL, DEFAULT_TTL};
use dnspod_sync_core::{ProviderConfig, RecordType, ReloadConfig, SyncConfig};

/// Reconcile DNSPod records against a target address, then reload Traefik.
///
/// Every option falls back to an environment variable when omitted.
#[derive(Parser, Debug)]
#[command(name = "dnspod-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root domain, e.g. example.com [env: TRAEFIK_DOMAIN, DNSPOD_DOMAIN]
    #[arg(long)]
    pub domain: Option<String>,

    /// DNSPod domain ID [env: TRAEFIK_DNSPOD_DOMAIN_ID, DNSPOD_DOMAIN_ID]
    #[arg(long)]
    pub domain_id: Option<String>,

    /// DNSPod login token in `id,token` form [env: TRAEFIK_DNSPOD_API_KEY, DNSPOD_LOGIN_TOKEN]
    #[arg(long)]
    pub token: Option<String>,

    /// Target address for the records [env: TRAEFIK_TARGET_IP, DNS_TARGET_IP]
    #[arg(long = "ip", visible_alias = "target", value_name = "ADDRESS")]
    pub target: Option<String>,

    /// TTL in seconds [env: TRAEFIK_DNS_TTL] [default: 600]
    #[arg(long)]
    pub ttl: Option<u32>,

    /// Record type: A, AAAA, CNAME or TXT [env: TRAEFIK_DNS_RECORD_TYPE] [default: A]
    #[arg(long)]
    pub record_type: Option<String>,

    /// Comma-separated subdomains [default: @,*,www]
    #[arg(long, value_name = "A,B,C")]
    pub subdomains: Option<String>,

    /// Do not perform write operations
    #[arg(long)]
    pub dry_run: bool,

    /// Do not call the Traefik reload endpoint
    #[arg(long)]
    pub skip_reload: bool,

    /// Traefik management endpoint [env: TRAEFIK_API_URL]
    #[arg(long, value_name = "URL")]
    pub traefik_reload_url: Option<String>,

    /// Authorization header value for Traefik reload [env: TRAEFIK_API_AUTH]
    #[arg(long, value_name = "VALUE")]
    pub traefik_reload_auth: Option<String>,

    /// DNSPod API base URL [env: DNSPOD_API_BASE] [default: https://dnsapi.cn]
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "DNSPOD_SYNC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Merge flags with environment variables into a [`SyncConfig`]
    ///
    /// `env` looks up a variable by name; `main` passes `std::env::var`.
    /// Only parse errors are reported here; missing required values are
    /// left for [`SyncConfig::validate`].
    pub fn into_config<F>(self, env: F) -> Result<SyncConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |names: &[&str]| -> Option<String> {
            names.iter().find_map(|name| env(name).filter(|v| !v.is_empty()))
        };

        let ttl = match self.ttl {
            Some(ttl) => ttl,
            None => match lookup(&["TRAEFIK_DNS_TTL"]) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("TRAEFIK_DNS_TTL must be a positive integer. Got: {}", raw))?,
                None => DEFAULT_TTL,
            },
        };

        let record_type = match self
            .record_type
            .or_else(|| lookup(&["TRAEFIK_DNS_RECORD_TYPE"]))
        {
            Some(raw) => raw.parse::<RecordType>()?,
            None => RecordType::default(),
        };

        let provider = ProviderConfig {
            login_token: self
                .token
                .or_else(|| lookup(&["TRAEFIK_DNSPOD_API_KEY", "DNSPOD_LOGIN_TOKEN"]))
                .unwrap_or_default(),
            domain: self
                .domain
                .or_else(|| lookup(&["TRAEFIK_DOMAIN", "DNSPOD_DOMAIN"])),
            domain_id: self
                .domain_id
                .or_else(|| lookup(&["TRAEFIK_DNSPOD_DOMAIN_ID", "DNSPOD_DOMAIN_ID"])),
            api_base: self
                .api_base
                .or_else(|| lookup(&["DNSPOD_API_BASE"]))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        };

        let reload = ReloadConfig {
            url: Some(
                self.traefik_reload_url
                    .or_else(|| lookup(&["TRAEFIK_API_URL"]))
                    .unwrap_or_else(|| DEFAULT_RELOAD_URL.to_string()),
            ),
            authorization: self
                .traefik_reload_auth
                .or_else(|| lookup(&["TRAEFIK_API_AUTH"])),
            skip: self.skip_reload,
        };

        let target = self
            .target
            .or_else(|| lookup(&["TRAEFIK_TARGET_IP", "DNS_TARGET_IP"]))
            .unwrap_or_default();

        let mut config = SyncConfig::new(provider, target);
        config.ttl = ttl;
        config.record_type = record_type;
        config.dry_run = self.dry_run;
        config.reload = reload;
        if let Some(list) = self.subdomains {
            config.subdomains = parse_subdomains(&list);
        }

        Ok(config)
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_subdomains(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

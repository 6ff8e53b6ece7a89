// # dnspod-sync
//
// Thin integration layer: reads configuration, wires the DNSPod provider
// and HTTP transport into dnspod-sync-core, prints the summary.
//
// All reconciliation and reload logic lives in dnspod-sync-core.
//
// ## Configuration
//
// Flags take precedence; each falls back to environment variables:
//
// - `--domain` / `TRAEFIK_DOMAIN`, `DNSPOD_DOMAIN`
// - `--domain-id` / `TRAEFIK_DNSPOD_DOMAIN_ID`, `DNSPOD_DOMAIN_ID`
// - `--token` / `TRAEFIK_DNSPOD_API_KEY`, `DNSPOD_LOGIN_TOKEN`
// - `--ip` / `TRAEFIK_TARGET_IP`, `DNS_TARGET_IP`
// - `--ttl` / `TRAEFIK_DNS_TTL`
// - `--record-type` / `TRAEFIK_DNS_RECORD_TYPE`
// - `--api-base` / `DNSPOD_API_BASE`
// - `--traefik-reload-url` / `TRAEFIK_API_URL`
// - `--traefik-reload-auth` / `TRAEFIK_API_AUTH`
// - `--log-level` / `DNSPOD_SYNC_LOG_LEVEL`
//
// ## Example
//
// ```bash
// export TRAEFIK_DNSPOD_API_KEY=12345,0123456789abcdef
// dnspod-sync --domain example.com --ip 203.0.113.10 --subdomains @,*,www
// ```
//
// The JSON summary goes to stdout; logs go to stderr.

mod cli;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use dnspod_sync_core::traits::HttpTransport;
use dnspod_sync_core::{SyncConfig, SyncReport, run_sync};
use dnspod_sync_provider_dnspod::{DnspodProvider, ReqwestTransport};
use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncExitCode {
    /// Sync (and reload, if enabled) succeeded, or help/version was shown
    Success = 0,
    /// Configuration, DNS, or reload failure
    Failure = 1,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNSPOD_SYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Parse command-line arguments
///
/// Help and version output map to [`SyncExitCode::Success`]; any usage
/// error is printed and maps to [`SyncExitCode::Failure`].
fn parse_args<I, T>(args: I) -> std::result::Result<Cli, SyncExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => SyncExitCode::Success,
            _ => SyncExitCode::Failure,
        }
    })
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code.into(),
    };

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return SyncExitCode::Failure.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::Failure.into();
    }

    let config = match cli.into_config(|name| std::env::var(name).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return SyncExitCode::Failure.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::Failure.into();
        }
    };

    let transport: Arc<dyn HttpTransport> = match ReqwestTransport::new() {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            eprintln!("{}", e);
            return SyncExitCode::Failure.into();
        }
    };

    let result = rt
        .block_on(run(config, transport))
        .and_then(|report| serde_json::to_string_pretty(&report).map_err(anyhow::Error::from));

    match result {
        Ok(summary) => {
            println!("{}", summary);
            SyncExitCode::Success.into()
        }
        Err(e) => {
            eprintln!("{}", e);
            SyncExitCode::Failure.into()
        }
    }
}

/// Build the provider and run one sync pass
async fn run(config: SyncConfig, transport: Arc<dyn HttpTransport>) -> Result<SyncReport> {
    let provider = DnspodProvider::new(&config.provider, transport.clone())?;
    info!(
        "Starting sync: {} subdomain(s), dry_run={}",
        config.subdomains.len(),
        config.dry_run
    );

    let report = run_sync(&config, Box::new(provider), transport).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnspod_sync_core::Action;
    use dnspod_sync_core::traits::{HttpRequest, HttpResponse};
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers DNSPod and Traefik endpoints by path
    struct FakeUpstreams {
        requests: Mutex<Vec<HttpRequest>>,
        reload_status: u16,
    }

    impl FakeUpstreams {
        fn new(reload_status: u16) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                reload_status,
            })
        }

        fn paths(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.rsplit('/').next().unwrap_or_default().to_string())
                .collect()
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for FakeUpstreams {
        async fn post(&self, request: HttpRequest) -> dnspod_sync_core::Result<HttpResponse> {
            let ok = |extra: serde_json::Value| {
                let mut body = json!({ "status": { "code": "1" } });
                body.as_object_mut()
                    .unwrap()
                    .extend(extra.as_object().unwrap().clone());
                HttpResponse::new(200, body.to_string())
            };

            let response = if request.url.ends_with("/Record.List") {
                if request.form_value("sub_domain") == Some("@") {
                    ok(json!({ "records": [{
                        "id": "100", "name": "@", "type": "A",
                        "ttl": "600", "value": "1.1.1.1", "line_id": "0"
                    }] }))
                } else {
                    ok(json!({ "records": [] }))
                }
            } else if request.url.ends_with("/Record.Modify") {
                let id = request.form_value("record_id").unwrap_or_default().to_string();
                ok(json!({ "record": { "id": id } }))
            } else if request.url.ends_with("/Record.Create") {
                ok(json!({ "record": { "id": "200" } }))
            } else if request.url.ends_with("/api/providers/reload") {
                HttpResponse::new(self.reload_status, "")
            } else {
                HttpResponse::new(404, "")
            };

            self.requests.lock().unwrap().push(request);
            Ok(response)
        }
    }

    fn config_from(args: &[&str]) -> SyncConfig {
        Cli::try_parse_from(std::iter::once("dnspod-sync").chain(args.iter().copied()))
            .unwrap()
            .into_config(|_| None)
            .unwrap()
    }

    const BASE_ARGS: &[&str] = &[
        "--domain", "example.com",
        "--token", "1,token",
        "--ip", "8.8.8.8",
        "--traefik-reload-url", "http://localhost:8080/api/providers/reload",
    ];

    #[tokio::test]
    async fn test_run_executes_with_reload() {
        let upstreams = FakeUpstreams::new(200);
        let config = config_from(&[BASE_ARGS, &["--subdomains", "@"][..]].concat());

        let report = run(config, upstreams.clone()).await.unwrap();

        assert_eq!(report.dns_results[0].action, Action::Updated);
        assert_eq!(report.reload.status, Some(200));
        assert_eq!(upstreams.paths(), vec!["Record.List", "Record.Modify", "reload"]);
    }

    #[tokio::test]
    async fn test_run_updates_and_creates() {
        let upstreams = FakeUpstreams::new(200);
        let config = config_from(&[BASE_ARGS, &["--subdomains", "@,*"][..]].concat());

        let report = run(config, upstreams.clone()).await.unwrap();
        let actions: Vec<_> = report.dns_results.iter().map(|o| o.action).collect();

        assert_eq!(actions, vec![Action::Updated, Action::Created]);
        let paths = upstreams.paths();
        assert_eq!(paths.iter().filter(|p| *p == "Record.Modify").count(), 1);
        assert_eq!(paths.iter().filter(|p| *p == "Record.Create").count(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_skip_reload_only_reads() {
        let upstreams = FakeUpstreams::new(500);
        let config = config_from(&[BASE_ARGS, &["--dry-run", "--skip-reload"][..]].concat());

        let report = run(config, upstreams.clone()).await.unwrap();

        assert!(report.dry_run);
        assert!(report.reload.skipped);
        assert!(report.dns_results.iter().all(|o| o.action == Action::Planned));
        assert_eq!(
            upstreams.paths(),
            vec!["Record.List", "Record.List", "Record.List"]
        );
    }

    #[tokio::test]
    async fn test_reload_failure_fails_run() {
        let upstreams = FakeUpstreams::new(502);
        let config = config_from(&[BASE_ARGS, &["--subdomains", "www"][..]].concat());

        let err = run(config, upstreams).await.unwrap_err();
        assert_eq!(err.to_string(), "Traefik reload failed with status 502");
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_network() {
        let upstreams = FakeUpstreams::new(200);
        let config = config_from(&["--domain", "example.com", "--ip", "8.8.8.8"]);

        let err = run(config, upstreams.clone()).await.unwrap_err();
        assert!(err.to_string().contains("Missing DNSPod API token"));
        assert!(upstreams.paths().is_empty());
    }

    #[tokio::test]
    async fn test_missing_target_fails_before_network() {
        let upstreams = FakeUpstreams::new(200);
        let config = config_from(&["--domain", "example.com", "--token", "1,token"]);

        let err = run(config, upstreams.clone()).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing target IP (use --ip or TRAEFIK_TARGET_IP)");
        assert!(upstreams.paths().is_empty());
    }

    #[test]
    fn test_usage_errors_exit_with_failure() {
        let bad_ttl = parse_args(["dnspod-sync", "--ttl", "abc", "--token", "1,t"]);
        assert_eq!(bad_ttl.unwrap_err(), SyncExitCode::Failure);

        let unknown = parse_args(["dnspod-sync", "--bogus"]);
        assert_eq!(unknown.unwrap_err(), SyncExitCode::Failure);
    }

    #[test]
    fn test_help_exits_with_success() {
        assert_eq!(
            parse_args(["dnspod-sync", "--help"]).unwrap_err(),
            SyncExitCode::Success
        );
        assert!(parse_args(["dnspod-sync", "--ttl", "300"]).is_ok());
    }

    #[test]
    fn test_report_is_json() {
        let report = SyncReport {
            dns_results: Vec::new(),
            reload: dnspod_sync_core::ReloadOutcome::skipped(),
            dry_run: false,
            generated_at: Default::default(),
        };
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(&report).unwrap()).unwrap();
        assert_eq!(value["reload"], json!({ "skipped": true }));
        assert!(value["dns_results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_log_level("verbose").is_err());
    }
}

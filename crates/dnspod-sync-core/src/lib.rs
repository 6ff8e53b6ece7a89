// # dnspod-sync-core
//
// Core library for reconciling DNS records against a desired target and
// triggering a reverse-proxy reload.
//
// ## Architecture Overview
//
// - **DnsProvider**: Trait for record-level provider API calls
// - **HttpTransport**: Trait for the injected HTTP capability
// - **Reconciler**: Decides create / update / no-op per record (idempotent)
// - **ProxyReloader**: Triggers the Traefik provider reload endpoint
// - **run_sync**: One full pass (validate → reconcile → reload)
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decisions live here, wire formats live in provider crates
// 2. **Sequential**: One record at a time, outcomes in input order
// 3. **Injected I/O**: Every network call goes through `HttpTransport`
// 4. **Idempotency**: A second pass against unchanged state writes nothing

pub mod traits;
pub mod reconciler;
pub mod reload;
pub mod sync;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, HttpRequest, HttpResponse, HttpTransport, ProviderRecord};
pub use reconciler::{Action, Outcome, Reconciler};
pub use reload::{ProxyReloader, ReloadOutcome};
pub use sync::{SyncReport, run_sync};
pub use config::{DesiredRecord, DomainRef, ProviderConfig, RecordType, ReloadConfig, SyncConfig};
pub use error::{Error, Result};

//! Core traits for dnspod-sync
//!
//! - [`DnsProvider`]: Record-level operations against a DNS provider API
//! - [`HttpTransport`]: Injected HTTP capability used by providers and the reloader

pub mod dns_provider;
pub mod transport;

pub use dns_provider::{DnsProvider, ProviderRecord};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};

//! Test doubles and common utilities for contract tests
//!
//! The doubles keep an in-memory zone so repeated passes observe earlier
//! writes, and count every call so tests can assert read/write totals.

#![allow(dead_code)]

use dnspod_sync_core::error::{Error, Result};
use dnspod_sync_core::traits::{
    DnsProvider, HttpRequest, HttpResponse, HttpTransport, ProviderRecord,
};
use dnspod_sync_core::{DesiredRecord, ProviderConfig, ReloadConfig, SyncConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ZoneState {
    records: Vec<ProviderRecord>,
    find_calls: usize,
    create_calls: usize,
    modify_calls: usize,
    next_id: u64,
    fail_find_on: Option<String>,
    omit_ids: bool,
    call_log: Vec<String>,
}

/// A mock DnsProvider backed by an in-memory zone
///
/// Clones share state, so a test can keep a handle after boxing one
/// into a Reconciler.
#[derive(Clone)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ZoneState>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ZoneState {
                next_id: 200,
                ..ZoneState::default()
            })),
        }
    }

    /// Seed the zone with an existing record
    pub fn with_record(self, record: ProviderRecord) -> Self {
        self.state.lock().unwrap().records.push(record);
        self
    }

    /// Make `find_record` fail for one subdomain
    pub fn failing_on(self, subdomain: &str) -> Self {
        self.state.lock().unwrap().fail_find_on = Some(subdomain.to_string());
        self
    }

    /// Make writes report no identifier
    pub fn omitting_ids(self) -> Self {
        self.state.lock().unwrap().omit_ids = true;
        self
    }

    pub fn find_calls(&self) -> usize {
        self.state.lock().unwrap().find_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn modify_calls(&self) -> usize {
        self.state.lock().unwrap().modify_calls
    }

    pub fn write_calls(&self) -> usize {
        self.create_calls() + self.modify_calls()
    }

    /// Calls in order, e.g. `find:@`, `modify:100`, `create:*`
    pub fn call_log(&self) -> Vec<String> {
        self.state.lock().unwrap().call_log.clone()
    }

    pub fn records(&self) -> Vec<ProviderRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn boxed(&self) -> Box<dyn DnsProvider> {
        Box::new(self.clone())
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn find_record(&self, subdomain: &str, record_type: &str) -> Result<Option<ProviderRecord>> {
        let mut state = self.state.lock().unwrap();
        state.find_calls += 1;
        state.call_log.push(format!("find:{}", subdomain));

        if state.fail_find_on.as_deref() == Some(subdomain) {
            return Err(Error::http_status("/Record.List", 500));
        }

        Ok(state
            .records
            .iter()
            .find(|r| r.name == subdomain && r.record_type == record_type)
            .cloned())
    }

    async fn create_record(&self, desired: &DesiredRecord) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        state.call_log.push(format!("create:{}", desired.subdomain));

        let id = state.next_id.to_string();
        state.next_id += 1;
        state.records.push(ProviderRecord {
            id: id.clone(),
            name: desired.subdomain.clone(),
            record_type: desired.record_type.to_string(),
            value: desired.value.clone(),
            ttl: Some(desired.ttl),
            line_id: Some("0".to_string()),
        });

        Ok((!state.omit_ids).then_some(id))
    }

    async fn modify_record(
        &self,
        existing: &ProviderRecord,
        desired: &DesiredRecord,
    ) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.modify_calls += 1;
        state.call_log.push(format!("modify:{}", existing.id));

        if let Some(record) = state.records.iter_mut().find(|r| r.id == existing.id) {
            record.value = desired.value.clone();
            record.ttl = Some(desired.ttl);
        }

        Ok((!state.omit_ids).then(|| existing.id.clone()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A transport that answers every POST with a fixed status and records requests
#[derive(Clone)]
pub struct RecordingTransport {
    status: u16,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn shared(&self) -> Arc<dyn HttpTransport> {
        Arc::new(self.clone())
    }
}

#[async_trait::async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse::new(self.status, ""))
    }
}

/// An existing A record as the provider would list it
pub fn existing_record(id: &str, name: &str, value: &str, ttl: u32) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: "A".to_string(),
        value: value.to_string(),
        ttl: Some(ttl),
        line_id: Some("0".to_string()),
    }
}

/// Helper to create a minimal SyncConfig for testing
pub fn minimal_config(subdomains: &[&str], target: &str) -> SyncConfig {
    let mut config = SyncConfig::new(
        ProviderConfig::new("1,token").with_domain("example.com"),
        target,
    );
    config.subdomains = subdomains.iter().map(|s| s.to_string()).collect();
    config.reload = ReloadConfig {
        url: Some("http://localhost:8080/api/providers/reload".to_string()),
        authorization: None,
        skip: false,
    };
    config
}

//! Test doubles and common utilities for run contract tests
//!
//! These doubles record every call so tests can assert on what the
//! engine did (or did not) ask of the provider and IP sources.

#![allow(dead_code)]

use cfddns_core::config::{CloudflareCredentials, LogSettings, UpdaterConfig};
use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, RecordEdit};
use cfddns_core::IpResolver;
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const ZONE_ID: &str = "zone-123";
pub const RECORD_NAME: &str = "home.example.com";

/// Build an A record
pub fn a_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: "A".to_string(),
        name: name.to_string(),
        content: content.to_string(),
        ttl: Some(1),
        proxied: Some(false),
    }
}

/// An in-memory zone that applies edits, with call counters
#[derive(Clone)]
pub struct MockDnsProvider {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    list_call_count: Arc<AtomicUsize>,
    edits: Arc<Mutex<Vec<(String, String, RecordEdit)>>>,
    fail_edits: Arc<AtomicBool>,
    fail_listing: Arc<AtomicBool>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            edits: Arc::new(Mutex::new(Vec::new())),
            fail_edits: Arc::new(AtomicBool::new(false)),
            fail_listing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every edit call fail
    pub fn failing_edits(self) -> Self {
        self.fail_edits.store(true, Ordering::SeqCst);
        self
    }

    /// Make every listing call fail
    pub fn failing_listing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Edits received, as (zone_id, record_id, body)
    pub fn edits(&self) -> Vec<(String, String, RecordEdit)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Error::provider("mock", "listing refused"));
        }
        Ok(self.records())
    }

    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        edit: &RecordEdit,
    ) -> Result<DnsRecord> {
        self.edits
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record_id.to_string(), edit.clone()));

        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Error::provider("mock", "edit rejected"));
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("mock", "unknown record"))?;
        record.content = edit.content.clone();
        record.ttl = Some(edit.ttl);
        record.proxied = Some(edit.proxied);
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out clones of one shared mock provider
pub struct MockFactory {
    pub provider: MockDnsProvider,
    pub create_call_count: AtomicUsize,
}

impl MockFactory {
    pub fn new(provider: MockDnsProvider) -> Self {
        Self {
            provider,
            create_call_count: AtomicUsize::new(0),
        }
    }
}

impl DnsProviderFactory for MockFactory {
    fn create(&self, _config: &UpdaterConfig) -> Result<Box<dyn DnsProvider>> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.provider.clone()))
    }
}

/// An IP source that always answers the same way, counting calls
pub struct ScriptedIpSource {
    name: String,
    answer: Option<Ipv4Addr>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn answering(name: &str, ip: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            answer: Some(ip),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unreachable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            answer: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter (survives moving the source into a resolver)
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| Error::http(format!("{}: connection refused", self.name)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Resolver whose single source answers `ip`
pub fn resolver_answering(ip: Ipv4Addr) -> IpResolver {
    IpResolver::new(vec![Box::new(ScriptedIpSource::answering("echo", ip))])
}

/// Helper to create a minimal valid configuration for testing
pub fn minimal_config(record_name: &str) -> UpdaterConfig {
    UpdaterConfig {
        credentials: CloudflareCredentials {
            email: "ops@example.com".to_string(),
            api_key: "test-key".to_string(),
        },
        zone_id: ZONE_ID.to_string(),
        record_name: Some(record_name.to_string()),
        log: LogSettings::default(),
        dry_run: false,
    }
}

/// In-memory log sink for asserting on what a run wrote
#[derive(Clone, Default)]
pub struct CapturedLog {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLog {
    /// Subscriber writing `LEVEL message` lines at INFO and above into this sink
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(self.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
    }

    /// Lines logged at ERROR
    pub fn error_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with("ERROR"))
            .map(str::to_string)
            .collect()
    }
}

pub struct CapturedLogWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedLogWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

// # DNS Provider Trait
//
// Defines the interface for reading and editing DNS records via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::{DnsProvider, RecordEdit};
//
// let records = provider.list_records("zone-id").await?;
// let edited = provider
//     .edit_record("zone-id", &records[0].id, &RecordEdit::a("home.example.com", ip))
//     .await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Record type string for IPv4 address records
pub const RECORD_TYPE_A: &str = "A";

/// TTL value meaning "automatic"
pub const AUTOMATIC_TTL: u32 = 1;

/// A DNS record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-specific record ID
    pub id: String,
    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record content (an address for A records)
    pub content: String,
    /// Time-to-live, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Whether the record is proxied, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl DnsRecord {
    /// Whether this is an A record called `name`
    pub fn is_a_record_named(&self, name: &str) -> bool {
        self.record_type == RECORD_TYPE_A && self.name == name
    }
}

/// Body of a record edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordEdit {
    /// Record type, always "A" here
    #[serde(rename = "type")]
    pub record_type: &'static str,
    /// Record name
    pub name: String,
    /// New content
    pub content: String,
    /// Time-to-live (1 = automatic)
    pub ttl: u32,
    /// Route through the provider's proxy
    pub proxied: bool,
}

impl RecordEdit {
    /// Edit that points the A record `name` at `ip`, automatic TTL, not proxied
    pub fn a(name: impl Into<String>, ip: Ipv4Addr) -> Self {
        Self {
            record_type: RECORD_TYPE_A,
            name: name.into(),
            content: ip.to_string(),
            ttl: AUTOMATIC_TTL,
            proxied: false,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Providers are isolated and single-shot: one logical request per call,
/// no retries, no caching, no decision about whether an edit is needed.
/// Those belong to the locator, updater and engine in this crate.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every DNS record in a zone
    ///
    /// Implementations that page through results return all pages
    /// concatenated in the order the provider returned them.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Apply `edit` to the record `record_id` and return the record as stored
    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        edit: &RecordEdit,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from the run configuration
    fn create(
        &self,
        config: &crate::config::UpdaterConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}

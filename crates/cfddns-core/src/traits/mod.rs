//! Core traits for the updater
//!
//! This module defines the abstract interfaces that implementations follow.
//!
//! - [`IpSource`]: Fetch the current public IPv4 address from one endpoint
//! - [`DnsProvider`]: List and edit DNS records via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory, DnsRecord, RecordEdit};

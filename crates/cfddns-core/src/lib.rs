// # cfddns-core
//
// Core library for the Cloudflare dynamic-DNS updater.
//
// ## Architecture Overview
//
// One invocation keeps a single A record pointed at the machine's public
// IPv4 address:
// - **IpSource** / **IpResolver**: Ordered fallback over IP-echo endpoints
// - **DnsProvider**: Trait for listing and editing records via a provider API
// - **locator**: Finds the first A record with the configured name
// - **updater**: Edits that record (type A, automatic TTL, not proxied)
// - **DdnsEngine** / **run_invocation**: Orchestrates one run and reports
//   its outcome without ever failing
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Explicit Errors**: Fatal conditions are `Error` values matched by the engine
// 3. **Library-First**: The binary only wires configuration, logging and crates

pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod resolver;
pub mod traits;
pub mod updater;

// Re-export core types for convenience
pub use config::{CloudflareCredentials, LogSettings, UpdaterConfig};
pub use engine::{DdnsEngine, RunId, RunOutcome, RunReport, run_invocation};
pub use error::{Error, Result};
pub use resolver::IpResolver;
pub use traits::{DnsProvider, DnsProviderFactory, DnsRecord, IpSource, RecordEdit};

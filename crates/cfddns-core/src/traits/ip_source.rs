// # IP Source Trait
//
// Defines the interface for fetching the machine's current public IPv4
// address from a single endpoint.
//
// ## Implementations
//
// - HTTP IP-echo endpoints: `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpSource;
//
// #[tokio::main(flavor = "current_thread")]
// async fn main() -> cfddns_core::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let ip = source.current().await?;
//     println!("{} says {}", source.name(), ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// One source corresponds to one endpoint. Fallback across several
/// endpoints is owned by [`crate::resolver::IpResolver`], so a source
/// makes exactly one attempt per call and reports failure as an error.
///
/// ## Forbidden
/// - Retrying or sleeping (the resolver moves on to the next source)
/// - Caching an address between calls
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The address reported by this endpoint
    /// - `Err(Error)`: Network error, non-success status, or a body with no
    ///   usable IPv4 address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Human-readable identifier for logs (usually the endpoint URL)
    fn name(&self) -> &str;
}

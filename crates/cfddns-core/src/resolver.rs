//! Public IP resolution with ordered fallback
//!
//! [`IpResolver`] holds an ordered list of [`IpSource`]s and returns the
//! address from the first one that answers. A failing source is logged and
//! skipped; only when every source has failed does resolution fail.

use crate::error::{Error, Result};
use crate::traits::IpSource;
use std::net::Ipv4Addr;
use tracing::{error, info, warn};

/// Ordered fallback over several IP sources
pub struct IpResolver {
    sources: Vec<Box<dyn IpSource>>,
}

impl IpResolver {
    /// Create a resolver that tries `sources` in the given order
    pub fn new(sources: Vec<Box<dyn IpSource>>) -> Self {
        Self { sources }
    }

    /// Number of configured sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no source is configured
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The first address successfully fetched
    /// - `Err(Error::IpResolution)`: Every source failed (or none configured)
    pub async fn resolve(&self) -> Result<Ipv4Addr> {
        for source in &self.sources {
            info!("Attempting to fetch IP from {}", source.name());

            match source.current().await {
                Ok(ip) => {
                    info!("Successfully retrieved IP from {}: {}", source.name(), ip);
                    return Ok(ip);
                }
                Err(e) => {
                    warn!("Failed to fetch IP from {}: {}", source.name(), e);
                }
            }
        }

        let msg = format!(
            "Failed to fetch public IP from all services ({} tried)",
            self.sources.len()
        );
        error!("{}", msg);
        Err(Error::ip_resolution(msg))
    }
}

// # HTTP IP Sources
//
// This crate provides HTTP IP-echo endpoints for the updater.
//
// ## Architecture
//
// An endpoint is described by an [`IpEndpoint`]: its URL plus the
// [`ResponseFormat`] used to pull the address out of the body. Each
// endpoint becomes one [`HttpIpSource`]; `cfddns_core::IpResolver` tries
// them in order. Supporting a service with a new response shape means
// adding a `ResponseFormat` variant, not branching on URLs.
//
// ## Default endpoints
//
// 1. `https://1.1.1.1/cdn-cgi/trace` (Cloudflare, `ip=` line)
// 2. `https://checkip.amazonaws.com` (Amazon, plain text)

use cfddns_core::traits::IpSource;
use cfddns_core::{Error, IpResolver, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

/// Per-request timeout for IP-echo endpoints
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloudflare trace endpoint
pub const CLOUDFLARE_TRACE_URL: &str = "https://1.1.1.1/cdn-cgi/trace";

/// Amazon checkip endpoint
pub const AWS_CHECKIP_URL: &str = "https://checkip.amazonaws.com";

/// How an endpoint encodes the address in its response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `key=value` lines; the value of the first line with this key
    KeyValue {
        /// Key to look for (e.g. "ip")
        key: String,
    },
    /// The whole body, trimmed
    PlainText,
}

impl ResponseFormat {
    /// Key-value format looking for `key`
    pub fn key_value(key: impl Into<String>) -> Self {
        Self::KeyValue { key: key.into() }
    }

    /// Extract an IPv4 address from a response body
    pub fn extract(&self, body: &str) -> Result<Ipv4Addr> {
        let raw = match self {
            Self::KeyValue { key } => body
                .lines()
                .find_map(|line| {
                    let (k, v) = line.split_once('=')?;
                    (k.trim() == key.as_str()).then_some(v.trim())
                })
                .ok_or_else(|| Error::invalid_input(format!("No '{key}=' line in response")))?,
            Self::PlainText => body.trim(),
        };

        raw.parse::<Ipv4Addr>()
            .map_err(|_| Error::invalid_input(format!("Invalid IPv4 address: {raw:?}")))
    }
}

/// Descriptor of one IP-echo endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpEndpoint {
    /// URL to GET
    pub url: String,
    /// Body format
    pub format: ResponseFormat,
}

impl IpEndpoint {
    /// Create an endpoint descriptor
    pub fn new(url: impl Into<String>, format: ResponseFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }
}

/// The built-in endpoints, in the order they are tried
pub fn default_endpoints() -> Vec<IpEndpoint> {
    vec![
        IpEndpoint::new(CLOUDFLARE_TRACE_URL, ResponseFormat::key_value("ip")),
        IpEndpoint::new(AWS_CHECKIP_URL, ResponseFormat::PlainText),
    ]
}

/// Build a resolver over `endpoints`, each with the default timeout
pub fn resolver_for(endpoints: Vec<IpEndpoint>) -> Result<IpResolver> {
    let sources = endpoints
        .into_iter()
        .map(|endpoint| HttpIpSource::new(endpoint).map(|s| Box::new(s) as Box<dyn IpSource>))
        .collect::<Result<Vec<_>>>()?;
    Ok(IpResolver::new(sources))
}

/// Build a resolver over [`default_endpoints`]
pub fn default_resolver() -> Result<IpResolver> {
    resolver_for(default_endpoints())
}

/// IP source backed by one HTTP IP-echo endpoint
pub struct HttpIpSource {
    /// Endpoint descriptor
    endpoint: IpEndpoint,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source with the default timeout
    pub fn new(endpoint: IpEndpoint) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom per-request timeout
    pub fn with_timeout(endpoint: IpEndpoint, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { endpoint, client })
    }

    /// The endpoint this source queries
    pub fn endpoint(&self) -> &IpEndpoint {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.endpoint.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("HTTP error: {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {e}")))?;

        tracing::debug!("{} answered {} bytes", self.endpoint.url, body.len());
        self.endpoint.format.extract(&body)
    }

    fn name(&self) -> &str {
        &self.endpoint.url
    }
}

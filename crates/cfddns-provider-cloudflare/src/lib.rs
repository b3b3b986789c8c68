// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the updater.
//
// ## Behavior
//
// - ✅ Lists every record of a zone, following `result_info.total_pages`
// - ✅ Edits one record with PATCH (type, name, content, ttl, proxied)
// - ✅ Authenticates with account email + global API key
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic (a failed call ends the run)
// - ❌ NO decision about whether an edit is needed (owned by cfddns-core)
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if email or key is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N&per_page=100`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfddns_core::config::{CloudflareCredentials, UpdaterConfig};
use cfddns_core::traits::{DnsProvider, DnsProviderFactory, DnsRecord, RecordEdit};
use cfddns_core::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page when listing a zone
const RECORDS_PER_PAGE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Response envelope shared by every Cloudflare v4 endpoint
#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CloudflareApiError>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct CloudflareApiError {
    code: i64,
    message: String,
}

/// Pagination block of list responses
#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl<T> CloudflareResponse<T> {
    /// "code: message" of the first API error, if any
    fn first_error(&self) -> Option<String> {
        self.errors
            .first()
            .map(|e| format!("{}: {}", e.code, e.message))
    }
}

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the listing GET requests
/// - Log the intended PATCH payload
/// - **NOT** actually modify DNS records
pub struct CloudflareProvider {
    /// Email + global API key
    /// ⚠️ NEVER log the key
    credentials: CloudflareCredentials,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PATCH updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("email", &self.credentials.email)
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the email or API key is empty
    /// - `Error::Http` if the HTTP client cannot be built
    pub fn new(credentials: CloudflareCredentials, dry_run: bool) -> Result<Self> {
        if credentials.email.trim().is_empty() {
            return Err(Error::config("Cloudflare email cannot be empty"));
        }
        if credentials.api_key.trim().is_empty() {
            return Err(Error::config("Cloudflare API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Point the provider at another API root (e.g. a local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether edits are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone_id: &str) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, zone_id)
    }

    /// Send an authenticated request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        action: &str,
    ) -> Result<(T, Option<ResultInfo>)> {
        let response = request
            .header("X-Auth-Email", &self.credentials.email)
            .header("X-Auth-Key", &self.credentials.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::provider(PROVIDER, format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body, action));
        }

        let envelope: CloudflareResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER, format!("Failed to parse response: {e}"))
        })?;

        if !envelope.success {
            let message = envelope
                .first_error()
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(Error::provider(PROVIDER, format!("{action} failed: {message}")));
        }

        let result = envelope.result.ok_or_else(|| {
            Error::provider(PROVIDER, "Invalid response format: missing result")
        })?;
        Ok((result, envelope.result_info))
    }
}

/// Map a non-success HTTP status to an error
///
/// The Cloudflare error message from the body is included when present.
fn status_error(status: u16, body: &str, action: &str) -> Error {
    let detail = serde_json::from_str::<CloudflareResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|r| r.first_error())
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 | 403 => Error::auth(format!(
            "Invalid email/API key or insufficient permissions. Status: {status} - {detail}"
        )),
        404 => Error::provider(PROVIDER, format!("{action}: not found. Status: {status} - {detail}")),
        429 => Error::rate_limited(format!("Please retry later. Status: {status}")),
        500..=599 => Error::provider(
            PROVIDER,
            format!("Cloudflare server error (transient): {status} - {detail}"),
        ),
        _ => Error::provider(PROVIDER, format!("{action} failed: {status} - {detail}")),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List every record of the zone
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=1&per_page=100
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(zone_id);
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!("GET {} (page {})", url, page);
            let request = self.client.get(&url).query(&[
                ("page", page.to_string()),
                ("per_page", RECORDS_PER_PAGE.to_string()),
            ]);
            let (batch, info): (Vec<DnsRecord>, _) = self.send(request, "List DNS records").await?;

            let batch_len = batch.len();
            records.extend(batch);

            match info.and_then(|i| i.total_pages.map(|total| (i.page, total))) {
                Some((current, total)) if current.max(page) < total && batch_len > 0 => {
                    page = current.max(page) + 1;
                }
                _ => break,
            }
        }

        Ok(records)
    }

    /// Patch one record
    ///
    /// # API Call
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// {"type":"A","name":"home.example.com","content":"1.2.3.4","ttl":1,"proxied":false}
    /// ```
    async fn edit_record(
        &self,
        zone_id: &str,
        record_id: &str,
        edit: &RecordEdit,
    ) -> Result<DnsRecord> {
        let url = format!("{}/{}", self.records_url(zone_id), record_id);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(edit)?
            );
            return Ok(DnsRecord {
                id: record_id.to_string(),
                record_type: edit.record_type.to_string(),
                name: edit.name.clone(),
                content: edit.content.clone(),
                ttl: Some(edit.ttl),
                proxied: Some(edit.proxied),
            });
        }

        tracing::debug!("PATCH {}", url);
        let request = self.client.patch(&url).json(edit);
        let (record, _) = self.send(request, "Update DNS record").await?;
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &UpdaterConfig) -> Result<Box<dyn DnsProvider>> {
        if config.dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Box::new(CloudflareProvider::new(
            config.credentials.clone(),
            config.dry_run,
        )?))
    }
}

//! Run orchestration
//!
//! One invocation of the updater is one straight-line run:
//!
//! ```text
//! config ──▶ provider ──▶ locate record ──▶ resolve IP ──▶ compare ──▶ edit?
//! ```
//!
//! [`DdnsEngine::run_once`] performs the locate/resolve/compare/edit part and
//! returns a `Result`. [`run_invocation`] wraps it with configuration
//! handling, banners and explicit matching on every error kind, and never
//! fails: the outcome is handed back as a [`RunReport`].

use crate::config::UpdaterConfig;
use crate::error::{Error, Result};
use crate::locator::locate_record;
use crate::resolver::IpResolver;
use crate::traits::{DnsProvider, DnsProviderFactory, DnsRecord};
use crate::updater::update_record;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::{debug, error, info};

const BANNER_WIDTH: usize = 80;

/// Identifier of one run, used to correlate its log lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId(String);

impl RunId {
    /// Derive an identifier from the current local time
    pub fn now() -> Self {
        Self(chrono::Local::now().format("%Y%m%d_%H%M%S").to_string())
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Record already pointed at the public IP; nothing was sent
    Unchanged {
        /// The public IP (equal to the record content)
        ip: Ipv4Addr,
    },
    /// Record content differed and was edited
    Updated {
        /// Record content before the edit
        previous: String,
        /// Record as returned by the provider after the edit
        record: DnsRecord,
    },
}

/// Result of [`run_invocation`]
#[derive(Debug)]
pub struct RunReport {
    /// Identifier of the run
    pub run_id: RunId,
    /// Outcome, or the error that ended the run
    pub result: Result<RunOutcome>,
}

impl RunReport {
    /// Whether the run finished without an error
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Whether the run edited the record
    pub fn updated(&self) -> bool {
        matches!(self.result, Ok(RunOutcome::Updated { .. }))
    }
}

/// Compares the published record with the public IP and edits it if needed
pub struct DdnsEngine {
    /// DNS provider for listing and editing records
    provider: Box<dyn DnsProvider>,

    /// Ordered IP-echo fallback
    resolver: IpResolver,

    /// Zone holding the record
    zone_id: String,

    /// Record to keep current
    record_name: Option<String>,
}

impl DdnsEngine {
    /// Create a new engine
    pub fn new(
        provider: Box<dyn DnsProvider>,
        resolver: IpResolver,
        zone_id: impl Into<String>,
        record_name: Option<String>,
    ) -> Self {
        Self {
            provider,
            resolver,
            zone_id: zone_id.into(),
            record_name,
        }
    }

    /// Locate the record, resolve the public IP, and edit the record if they differ
    ///
    /// The record is located first, so a missing record ends the run
    /// without any IP lookup.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let record =
            locate_record(self.provider.as_ref(), &self.zone_id, self.record_name.as_deref())
                .await?;
        info!("Current record - ID: {}, IP: {}", record.id, record.content);

        let public_ip = self.resolver.resolve().await?;

        if record_points_at(&record, public_ip) {
            info!("No update needed. IP matches: {}", public_ip);
            return Ok(RunOutcome::Unchanged { ip: public_ip });
        }

        info!(
            "IP mismatch detected. Current: {}, New: {}",
            record.content, public_ip
        );
        let updated = update_record(
            self.provider.as_ref(),
            &self.zone_id,
            &record.id,
            &record.name,
            public_ip,
        )
        .await?;

        Ok(RunOutcome::Updated {
            previous: record.content,
            record: updated,
        })
    }
}

/// Whether the record content is already `ip`
///
/// Content that is not an IPv4 address never matches.
fn record_points_at(record: &DnsRecord, ip: Ipv4Addr) -> bool {
    record.content.trim().parse::<Ipv4Addr>().ok() == Some(ip)
}

/// Execute one complete run
///
/// Logs the start banner, reports a configuration error and stops, or
/// builds the provider through `factory` and runs a [`DdnsEngine`]. Every
/// error is matched and logged here; the caller only receives the report.
///
/// A configuration error or a missing record ends the run before the
/// completion banner. Every other outcome ends with it.
pub async fn run_invocation(
    config: Result<UpdaterConfig>,
    factory: &dyn DnsProviderFactory,
    resolver: IpResolver,
) -> RunReport {
    let run_id = RunId::now();
    let result = run_inner(&run_id, config, factory, resolver).await;

    RunReport { run_id, result }
}

async fn run_inner(
    run_id: &RunId,
    config: Result<UpdaterConfig>,
    factory: &dyn DnsProviderFactory,
    resolver: IpResolver,
) -> Result<RunOutcome> {
    let banner = "=".repeat(BANNER_WIDTH);
    info!("{}", banner);
    info!("Starting new DNS update run ({})", run_id);
    info!("{}", banner);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    info!(
        "Configuration loaded - Email: {}, Zone ID: {}, Record Name: {}",
        config.credentials.email,
        config.zone_id,
        config.record_name_display()
    );
    if config.dry_run {
        info!("Dry-run mode: the record will not be modified");
    }

    let result = match factory.create(&config) {
        Ok(provider) => {
            info!("Initializing {} client", provider.provider_name());
            DdnsEngine::new(provider, resolver, config.zone_id, config.record_name)
                .run_once()
                .await
        }
        Err(e) => Err(e),
    };

    // Already logged by the locator; the run stops without a completion banner
    if matches!(result, Err(Error::RecordNotFound(_))) {
        return result;
    }

    match &result {
        Ok(RunOutcome::Unchanged { .. }) => debug!("Run finished without changes"),
        Ok(RunOutcome::Updated { previous, record }) => {
            debug!("Run moved {} from {} to {}", record.name, previous, record.content)
        }
        Err(e) => error!("Process failed: {}", e),
    }

    info!("DNS update process completed");
    info!("{}\n", banner);

    result
}

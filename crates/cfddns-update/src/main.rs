// # cfddns-update
//
// One-shot Cloudflare dynamic-DNS update. Meant to be invoked by cron or a
// systemd timer; it never stays resident.
//
// This binary is a THIN integration layer: it builds the logger, reads the
// environment, wires the crates together and hands control to
// `cfddns_core::run_invocation`. All update logic lives in cfddns-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `CLOUDFLARE_EMAIL`: Account email (required)
// - `CLOUDFLARE_API_KEY`: Global API key (required)
// - `CLOUDFLARE_ZONE_ID`: Zone ID (required)
// - `CLOUDFLARE_RECORD_NAME`: A record to keep current
// - `TIMEZONE`: IANA timezone for log timestamps (default: UTC)
// - `LOG_FILE`: Log path (default: ./logs/cloudflare_updater.log)
// - `LOG_LEVEL`: trace, debug, info, warn or error (default: info)
// - `DDNS_MODE`: `dry-run` to log the edit instead of sending it
//
// ## Exit status
//
// Always 0. The outcome of a run is reported only in the log file, so a
// scheduler never sees a failing job.
//
// ## Example
//
// ```bash
// export CLOUDFLARE_EMAIL=ops@example.com
// export CLOUDFLARE_API_KEY=your_global_key
// export CLOUDFLARE_ZONE_ID=your_zone_id
// export CLOUDFLARE_RECORD_NAME=home.example.com
// export TIMEZONE=Europe/Berlin
//
// cfddns-update
// ```

mod logging;

use anyhow::{Context, Result};
use cfddns_core::{LogSettings, RunReport, UpdaterConfig, run_invocation};
use cfddns_provider_cloudflare::CloudflareFactory;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let subscriber = match logging::file_subscriber(LogSettings::from_env()) {
        Ok(subscriber) => subscriber,
        Err(e) => {
            eprintln!("cfddns-update: failed to set up logging: {e:#}");
            return ExitCode::SUCCESS;
        }
    };
    let _log_guard = tracing::subscriber::set_default(subscriber);

    match run() {
        Ok(report) => debug!(
            "Run {} finished (success: {}, updated: {})",
            report.run_id,
            report.is_success(),
            report.updated()
        ),
        Err(e) => error!("Run could not start: {:#}", e),
    }

    ExitCode::SUCCESS
}

/// Build the runtime and components, then execute one run
fn run() -> Result<RunReport> {
    // Current-thread runtime: every call is awaited in sequence
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let resolver =
        cfddns_ip_http::default_resolver().context("Failed to initialize IP-echo clients")?;
    let config = UpdaterConfig::from_env();

    Ok(runtime.block_on(run_invocation(config, &CloudflareFactory, resolver)))
}

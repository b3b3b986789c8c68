//! Editing the located record to a new address

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsRecord, RecordEdit};
use std::net::Ipv4Addr;
use tracing::{error, info};

/// Point the A record `record_id` at `ip`
///
/// Sends one edit (type A, automatic TTL, not proxied). A provider failure
/// is logged and returned as [`Error::Update`]; nothing is retried.
pub async fn update_record(
    provider: &dyn DnsProvider,
    zone_id: &str,
    record_id: &str,
    record_name: &str,
    ip: Ipv4Addr,
) -> Result<DnsRecord> {
    info!(
        "Updating DNS record - Zone ID: {}, Record ID: {}, New IP: {}",
        zone_id, record_id, ip
    );

    let edit = RecordEdit::a(record_name, ip);

    match provider.edit_record(zone_id, record_id, &edit).await {
        Ok(record) => {
            info!(
                "Successfully updated DNS record: {} {} -> {} (ttl: {:?}, proxied: {:?})",
                record.record_type, record.name, record.content, record.ttl, record.proxied
            );
            Ok(record)
        }
        Err(e) => {
            error!("Failed to update {} record: {}", provider.provider_name(), e);
            Err(Error::update(e.to_string()))
        }
    }
}

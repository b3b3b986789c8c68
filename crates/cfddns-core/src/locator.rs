//! Locating the target A record in a zone

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsRecord};
use tracing::{error, info};

/// First A record named `record_name`, in listing order
pub fn find_a_record<'a>(records: &'a [DnsRecord], record_name: &str) -> Option<&'a DnsRecord> {
    records.iter().find(|r| r.is_a_record_named(record_name))
}

/// List the zone and return the A record called `record_name`
///
/// `None` for the name never matches. Listing failures are returned as-is;
/// a zone without a match yields [`Error::RecordNotFound`].
pub async fn locate_record(
    provider: &dyn DnsProvider,
    zone_id: &str,
    record_name: Option<&str>,
) -> Result<DnsRecord> {
    info!("Fetching DNS records for zone {}", zone_id);
    let records = provider.list_records(zone_id).await?;
    info!("Found {} DNS records", records.len());

    let display_name = record_name.unwrap_or("<unset>");
    let found = record_name.and_then(|name| find_a_record(&records, name));

    match found {
        Some(record) => {
            info!("Found matching A record: {}", record.name);
            Ok(record.clone())
        }
        None => {
            error!("No A record found for {}", display_name);
            Err(Error::record_not_found(format!(
                "No A record found for {display_name}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, record_type: &str, name: &str, content: &str) -> DnsRecord {
        DnsRecord {
            id: id.to_string(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl: None,
            proxied: None,
        }
    }

    #[test]
    fn finds_single_match() {
        let records = vec![
            record("1", "CNAME", "www.example.com", "example.com"),
            record("2", "A", "home.example.com", "1.2.3.4"),
        ];

        let found = find_a_record(&records, "home.example.com").unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn ignores_other_types_with_same_name() {
        let records = vec![
            record("1", "AAAA", "home.example.com", "::1"),
            record("2", "TXT", "home.example.com", "hello"),
        ];

        assert!(find_a_record(&records, "home.example.com").is_none());
    }

    #[test]
    fn first_of_several_matches_wins() {
        let records = vec![
            record("first", "A", "home.example.com", "1.1.1.1"),
            record("second", "A", "home.example.com", "2.2.2.2"),
        ];

        assert_eq!(find_a_record(&records, "home.example.com").unwrap().id, "first");
    }

    #[test]
    fn name_must_match_exactly() {
        let records = vec![record("1", "A", "home.example.com", "1.2.3.4")];

        assert!(find_a_record(&records, "HOME.example.com").is_none());
        assert!(find_a_record(&records, "example.com").is_none());
        assert!(find_a_record(&[], "home.example.com").is_none());
    }
}

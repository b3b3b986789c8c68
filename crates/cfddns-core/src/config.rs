//! Configuration types for the updater
//!
//! Everything is read from environment variables. Loading goes through a
//! lookup function so callers (and tests) can supply values without
//! touching the process environment.

use crate::error::{Error, Result};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::Level;

/// Cloudflare account email (`X-Auth-Email`)
pub const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";
/// Cloudflare global API key (`X-Auth-Key`)
pub const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
/// Zone holding the record
pub const ENV_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";
/// Fully-qualified name of the A record to keep current
pub const ENV_RECORD_NAME: &str = "CLOUDFLARE_RECORD_NAME";
/// IANA timezone used for log timestamps
pub const ENV_TIMEZONE: &str = "TIMEZONE";
/// Path of the log file
pub const ENV_LOG_FILE: &str = "LOG_FILE";
/// Maximum log level
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
/// `dry-run` disables the record edit
pub const ENV_MODE: &str = "DDNS_MODE";

/// Default log file, truncated on every start
pub const DEFAULT_LOG_FILE: &str = "./logs/cloudflare_updater.log";

/// Credentials for the Cloudflare API (email + global API key)
#[derive(Clone, PartialEq, Eq)]
pub struct CloudflareCredentials {
    /// Account email
    pub email: String,
    /// Global API key
    /// ⚠️ NEVER log this value
    pub api_key: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareCredentials")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

/// Settings the logger needs before the rest of the configuration is validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Log file path
    pub file: PathBuf,
    /// Maximum level written to the file
    pub level: Level,
    /// Timezone used to render timestamps
    pub timezone: Tz,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: Level::INFO,
            timezone: Tz::UTC,
        }
    }
}

impl LogSettings {
    /// Read log settings, falling back to defaults for anything unparsable
    ///
    /// The logger has to exist before a configuration error can be
    /// reported, so this never fails. [`UpdaterConfig::from_lookup`]
    /// rejects the same bad values strictly.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            file: non_empty(lookup(ENV_LOG_FILE))
                .map(PathBuf::from)
                .unwrap_or(defaults.file),
            level: non_empty(lookup(ENV_LOG_LEVEL))
                .and_then(|s| parse_level(&s).ok())
                .unwrap_or(defaults.level),
            timezone: non_empty(lookup(ENV_TIMEZONE))
                .and_then(|s| parse_timezone(&s).ok())
                .unwrap_or(defaults.timezone),
        }
    }

    /// Read log settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }
}

/// Complete, validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// API credentials
    pub credentials: CloudflareCredentials,
    /// Zone identifier
    pub zone_id: String,
    /// A record name; `None` matches no record
    pub record_name: Option<String>,
    /// Log settings
    pub log: LogSettings,
    /// Perform listing only and log the edit instead of sending it
    pub dry_run: bool,
}

impl UpdaterConfig {
    /// Load and validate configuration using `lookup` to read variables
    ///
    /// All missing required variables are reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = non_empty(lookup(ENV_EMAIL));
        let api_key = non_empty(lookup(ENV_API_KEY));
        let zone_id = non_empty(lookup(ENV_ZONE_ID));

        let missing: Vec<&str> = [
            (ENV_EMAIL, email.is_none()),
            (ENV_API_KEY, api_key.is_none()),
            (ENV_ZONE_ID, zone_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(email), Some(api_key), Some(zone_id)) = (email, api_key, zone_id) else {
            return Err(Error::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        };

        let defaults = LogSettings::default();
        let log = LogSettings {
            file: non_empty(lookup(ENV_LOG_FILE))
                .map(PathBuf::from)
                .unwrap_or(defaults.file),
            level: match non_empty(lookup(ENV_LOG_LEVEL)) {
                Some(raw) => parse_level(&raw)?,
                None => defaults.level,
            },
            timezone: match non_empty(lookup(ENV_TIMEZONE)) {
                Some(raw) => parse_timezone(&raw)?,
                None => defaults.timezone,
            },
        };

        let dry_run = lookup(ENV_MODE)
            .unwrap_or_default()
            .trim()
            .eq_ignore_ascii_case("dry-run");

        Ok(Self {
            credentials: CloudflareCredentials { email, api_key },
            zone_id,
            record_name: non_empty(lookup(ENV_RECORD_NAME)),
            log,
            dry_run,
        })
    }

    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Record name for log messages
    pub fn record_name_display(&self) -> &str {
        self.record_name.as_deref().unwrap_or("<unset>")
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_level(raw: &str) -> Result<Level> {
    raw.parse::<Level>().map_err(|_| {
        Error::config(format!(
            "{ENV_LOG_LEVEL} '{raw}' is not valid. Valid levels: trace, debug, info, warn, error"
        ))
    })
}

fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.parse::<Tz>()
        .map_err(|e| Error::config(format!("{ENV_TIMEZONE} '{raw}' is not a known timezone: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_EMAIL, "ops@example.com"),
            (ENV_API_KEY, "0123456789abcdef"),
            (ENV_ZONE_ID, "zone-123"),
        ]
    }

    #[test]
    fn loads_required_and_defaults() {
        let config = UpdaterConfig::from_lookup(lookup_from(&required())).unwrap();

        assert_eq!(config.credentials.email, "ops@example.com");
        assert_eq!(config.zone_id, "zone-123");
        assert_eq!(config.record_name, None);
        assert_eq!(config.log, LogSettings::default());
        assert!(!config.dry_run);
    }

    #[test]
    fn reports_every_missing_variable() {
        let err = UpdaterConfig::from_lookup(lookup_from(&[(ENV_EMAIL, "a@b.c")])).unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, Error::Config(_)));
        assert!(msg.contains(ENV_API_KEY));
        assert!(msg.contains(ENV_ZONE_ID));
        assert!(!msg.contains(ENV_EMAIL));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut pairs = required();
        pairs[2] = (ENV_ZONE_ID, "   ");

        let err = UpdaterConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains(ENV_ZONE_ID));
    }

    #[test]
    fn reads_optional_settings() {
        let mut pairs = required();
        pairs.extend([
            (ENV_RECORD_NAME, "home.example.com"),
            (ENV_TIMEZONE, "Europe/Berlin"),
            (ENV_LOG_FILE, "/tmp/updater.log"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_MODE, "DRY-RUN"),
        ]);

        let config = UpdaterConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.record_name.as_deref(), Some("home.example.com"));
        assert_eq!(config.log.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(config.log.file, PathBuf::from("/tmp/updater.log"));
        assert_eq!(config.log.level, Level::DEBUG);
        assert!(config.dry_run);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut pairs = required();
        pairs.push((ENV_TIMEZONE, "Mars/Olympus"));

        let err = UpdaterConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn log_settings_fall_back_instead_of_failing() {
        let settings = LogSettings::from_lookup(lookup_from(&[
            (ENV_TIMEZONE, "Mars/Olympus"),
            (ENV_LOG_LEVEL, "loud"),
        ]));

        assert_eq!(settings.timezone, Tz::UTC);
        assert_eq!(settings.level, Level::INFO);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = UpdaterConfig::from_lookup(lookup_from(&required())).unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("0123456789abcdef"));
        assert!(debug.contains("<REDACTED>"));
    }
}

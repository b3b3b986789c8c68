//! Run-scoped file logging
//!
//! Lines look like `2024-01-15 07:00:00 - INFO - message`, with the
//! timestamp rendered in the configured timezone. The file is truncated
//! when the subscriber is built.

use anyhow::{Context, Result};
use cfddns_core::LogSettings;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `<timestamp> - <LEVEL> - <message>` event format
#[derive(Debug, Clone, Copy)]
pub struct LogLineFormat {
    timezone: Tz,
}

impl LogLineFormat {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Everything before the message for an event at `at`
    pub fn prefix(&self, at: DateTime<Utc>, level: &Level) -> String {
        format!(
            "{} - {} - ",
            at.with_timezone(&self.timezone).format(TIMESTAMP_FORMAT),
            level
        )
    }
}

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}", self.prefix(Utc::now(), event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Create (or truncate) the log file, creating its directory if needed
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    File::create(path).with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Build the subscriber for one run
///
/// The caller installs it with `tracing::subscriber::set_default`, which
/// keeps it scoped to the returned guard instead of the whole process.
pub fn file_subscriber(settings: LogSettings) -> Result<impl Subscriber + Send + Sync> {
    let file = open_log_file(&settings.file)?;

    Ok(tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(settings.level)
        .with_writer(Mutex::new(file))
        .event_format(LogLineFormat::new(settings.timezone))
        .finish())
}

//! Resolution of the effective `since`/`until` window for a sync run.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Effective time window handed to the fetcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncWindow {
    /// Lower bound; `None` fetches from the beginning.
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a user- or platform-supplied timestamp into UTC.
///
/// Accepts RFC 3339 (`2024-01-02T03:04:05Z`, `...+02:00`). Timestamps
/// without an offset and bare dates are taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(at) => return Ok(at.with_timezone(&Utc)),
        Err(err) => err,
    };

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(rfc3339_err)
}

/// An explicit bound: blank strings count as absent, unparsable ones are
/// logged and dropped.
fn explicit_bound(field: &'static str, value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match parse_timestamp(value) {
        Ok(at) => Some(at),
        Err(err) => {
            tracing::warn!(field, value, error = %err, "Ignoring invalid timestamp");
            None
        }
    }
}

/// Compute the effective window for a run.
///
/// In priority order for `since`:
/// 1. `full_sync` drops the lower bound entirely.
/// 2. A valid explicit value wins.
/// 3. Otherwise (absent or invalid) the stored checkpoint is used, which may
///    itself be absent.
///
/// `until` is the explicit value or nothing; checkpoints never cap a run.
pub fn resolve_window(
    explicit_since: Option<&str>,
    explicit_until: Option<&str>,
    full_sync: bool,
    checkpoint: Option<DateTime<Utc>>,
) -> SyncWindow {
    let since = if full_sync {
        None
    } else {
        explicit_bound("since", explicit_since).or(checkpoint)
    };

    SyncWindow {
        since,
        until: explicit_bound("until", explicit_until),
    }
}

//! Time windows bounding telemetry queries.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Number of days covered by the window used when the caller supplies no bounds.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Errors raised while building a time window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A bound could not be parsed as an ISO-8601 timestamp.
    #[error("Invalid {field} '{value}': expected an ISO-8601 timestamp, e.g. 2025-09-10T00:00:00")]
    InvalidTimestamp {
        /// Name of the offending parameter.
        field: &'static str,
        /// The raw value supplied.
        value: String,
    },

    /// The start of the window lies after its end.
    #[error("start_date ({start}) must not be after end_date ({end})")]
    Inverted {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

/// A closed interval `[start, end]` of UTC instants.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use shared::models::TimeWindow;
///
/// let now = Utc::now();
/// let window = TimeWindow::resolve(None, None, now).unwrap();
/// assert_eq!(window.end(), now);
/// assert_eq!(window.start(), now - Duration::days(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Inverted`] if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// The window covering the `days` days leading up to `now`.
    #[must_use]
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// Fills in missing bounds relative to `now`.
    ///
    /// A missing start defaults to `now` minus [`DEFAULT_LOOKBACK_DAYS`],
    /// a missing end defaults to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Inverted`] if the resulting start is after the end.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, WindowError> {
        let default = Self::trailing(now, DEFAULT_LOOKBACK_DAYS);
        Self::new(start.unwrap_or(default.start), end.unwrap_or(default.end))
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Parses a timestamp supplied by a caller.
///
/// Accepts RFC 3339 (`2025-09-10T00:00:00Z`, `2025-09-10T02:00:00+02:00`),
/// naive date-times which are taken as UTC (`2025-09-10T00:00:00`,
/// `2025-09-10 00:00:00.250`), and plain dates meaning midnight UTC.
///
/// # Errors
///
/// Returns [`WindowError::InvalidTimestamp`] naming `field` if no format matches.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, WindowError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| WindowError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

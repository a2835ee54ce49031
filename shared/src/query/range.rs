//! Time-bounded range queries over a telemetry source.
//!
//! Both bounds of the window are inclusive for every source. The bounds are
//! encoded in the same representation the source stores its timestamps in,
//! so the store's native comparison gives time order:
//!
//! - native dates compare as milliseconds since the epoch. The lower bound is
//!   rounded up and the upper bound rounded down to whole milliseconds.
//! - ISO-8601 strings compare lexicographically. Bounds are rendered as
//!   `YYYY-MM-DDTHH:MM:SS`, with a six digit fraction only when the
//!   microseconds are non-zero. The lower bound is rounded up and the upper
//!   bound rounded down to whole microseconds.

use crate::models::{Source, TimeWindow, TimestampFormat};
use chrono::{DateTime, Duration, Utc};
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use std::cmp::Ordering;

const NANOS_PER_MILLI: u32 = 1_000_000;
const NANOS_PER_MICRO: u32 = 1_000;

/// A query for one source's records inside a time window.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::models::{Source, TimeWindow};
/// use shared::query::RangeQuery;
///
/// let window = TimeWindow::resolve(None, None, Utc::now()).unwrap();
/// let query = RangeQuery::new(Source::SmartFarm, window);
///
/// let filter = query.filter();
/// assert_eq!(filter.get_str("deviceName").unwrap(), "SmartFarm");
/// assert!(filter.get_document("timestamp_utc_dt").unwrap().contains_key("$gte"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    source: Source,
    window: TimeWindow,
}

impl RangeQuery {
    /// Creates a query for `source` restricted to `window`.
    #[must_use]
    pub fn new(source: Source, window: TimeWindow) -> Self {
        Self { source, window }
    }

    /// The source being queried.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// The requested window.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// The collection to run the query against.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        self.source.collection()
    }

    /// The filter document:
    /// `{ deviceName: <name>, <timestamp field>: { $gte: <start>, $lte: <end> } }`.
    #[must_use]
    pub fn filter(&self) -> Document {
        let mut bounds = Document::new();
        bounds.insert("$gte", self.lower_bound());
        bounds.insert("$lte", self.upper_bound());

        let mut filter = Document::new();
        filter.insert("deviceName", self.source.device_name());
        filter.insert(self.source.timestamp_field(), bounds);
        filter
    }

    /// Most recently inserted records first.
    #[must_use]
    pub fn sort_order() -> Document {
        doc! { "_id": -1 }
    }

    /// Evaluates the filter against a document the way the store would.
    ///
    /// Values of a different BSON type than the bound never match.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        if document.get_str("deviceName").ok() != Some(self.source.device_name()) {
            return false;
        }

        let Some(value) = document.get(self.source.timestamp_field()) else {
            return false;
        };

        let above = compare(value, &self.lower_bound()).is_some_and(|o| o != Ordering::Less);
        let below = compare(value, &self.upper_bound()).is_some_and(|o| o != Ordering::Greater);
        above && below
    }

    fn lower_bound(&self) -> Bson {
        let start = self.window.start();
        match self.source.timestamp_format() {
            TimestampFormat::Native => native(ceil_to(start, NANOS_PER_MILLI)),
            TimestampFormat::Iso8601 => {
                Bson::String(format_iso_timestamp(ceil_to(start, NANOS_PER_MICRO)))
            }
        }
    }

    fn upper_bound(&self) -> Bson {
        let end = self.window.end();
        match self.source.timestamp_format() {
            TimestampFormat::Native => native(floor_to(end, NANOS_PER_MILLI)),
            TimestampFormat::Iso8601 => {
                Bson::String(format_iso_timestamp(floor_to(end, NANOS_PER_MICRO)))
            }
        }
    }
}

/// Renders an instant the way string-timestamped collections store it.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use shared::query::format_iso_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2025, 9, 10, 8, 30, 0).unwrap();
/// assert_eq!(format_iso_timestamp(ts), "2025-09-10T08:30:00");
/// ```
#[must_use]
pub fn format_iso_timestamp(instant: DateTime<Utc>) -> String {
    if instant.timestamp_subsec_micros() == 0 {
        instant.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        instant.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn native(instant: DateTime<Utc>) -> Bson {
    Bson::DateTime(BsonDateTime::from_millis(instant.timestamp_millis()))
}

fn ceil_to(instant: DateTime<Utc>, unit_nanos: u32) -> DateTime<Utc> {
    let rem = instant.timestamp_subsec_nanos() % unit_nanos;
    if rem == 0 {
        instant
    } else {
        instant + Duration::nanoseconds(i64::from(unit_nanos - rem))
    }
}

fn floor_to(instant: DateTime<Utc>, unit_nanos: u32) -> DateTime<Utc> {
    let rem = instant.timestamp_subsec_nanos() % unit_nanos;
    instant - Duration::nanoseconds(i64::from(rem))
}

fn compare(value: &Bson, bound: &Bson) -> Option<Ordering> {
    match (value, bound) {
        (Bson::DateTime(v), Bson::DateTime(b)) => {
            Some(v.timestamp_millis().cmp(&b.timestamp_millis()))
        }
        (Bson::String(v), Bson::String(b)) => Some(v.as_str().cmp(b.as_str())),
        _ => None,
    }
}

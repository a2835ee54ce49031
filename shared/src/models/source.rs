//! Telemetry source mapping.
//!
//! Maps the logical device classes callers ask for onto the physical
//! collection, device-name filter, and timestamp field that hold their data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a source stores the timestamp of each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// Native BSON date-time (millisecond precision, UTC).
    Native,
    /// Naive UTC ISO-8601 string (`YYYY-MM-DDTHH:MM:SS[.ffffff]`).
    Iso8601,
}

/// A logical device class exposing telemetry.
///
/// # Example
///
/// ```
/// use shared::models::Source;
///
/// let source: Source = "SmartFarm".parse().unwrap();
/// assert_eq!(source, Source::SmartFarm);
/// assert_eq!(source.collection(), "telemetry_data_clean");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Field sensors of the SmartFarm installation.
    SmartFarm,
    /// Status reports of the Raspberry Pi gateway.
    RaspberryPi,
}

impl Source {
    /// All known sources, in the order they are advertised to callers.
    pub const ALL: [Source; 2] = [Source::SmartFarm, Source::RaspberryPi];

    /// The lowercase name used in URLs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SmartFarm => "smartfarm",
            Self::RaspberryPi => "raspberrypi",
        }
    }

    /// The collection holding this source's records.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            Self::SmartFarm => "telemetry_data_clean",
            Self::RaspberryPi => "raspberry_pi_telemetry_clean",
        }
    }

    /// The exact `deviceName` value identifying this source's records.
    #[must_use]
    pub fn device_name(self) -> &'static str {
        match self {
            Self::SmartFarm => "SmartFarm",
            Self::RaspberryPi => "raspberry_pi_status",
        }
    }

    /// The field carrying the record timestamp.
    #[must_use]
    pub fn timestamp_field(self) -> &'static str {
        "timestamp_utc_dt"
    }

    /// How the timestamp field is represented in this source's collection.
    ///
    /// Raspberry Pi status records are written by a separate collector that
    /// stores `timestamp_utc_dt` as an ISO-8601 string. If that collection is
    /// migrated to native dates this must change to [`TimestampFormat::Native`],
    /// otherwise every range query on it comes back empty.
    #[must_use]
    pub fn timestamp_format(self) -> TimestampFormat {
        match self {
            Self::SmartFarm => TimestampFormat::Native,
            Self::RaspberryPi => TimestampFormat::Iso8601,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a caller names a source that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Source not found. Use {}.", allowed_sources())]
pub struct UnknownSourceError {
    /// The name that failed to resolve.
    pub requested: String,
}

fn allowed_sources() -> String {
    Source::ALL
        .iter()
        .map(|s| format!("'{}'", s.name()))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl FromStr for Source {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSourceError {
                requested: s.to_string(),
            })
    }
}

//! Typed view of a job request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::RequestError;
use crate::storage::StorageConfig;

/// Camera orientation of an observation.
///
/// Signed and unchecked; the analyzer decides what a value means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    pub pan: i32,
    pub azimuth: i32,
}

/// Observation instant and camera orientation identifying one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobParams {
    pub year: u32,
    pub month: u32,
    pub dom: u32,
    pub hour: u32,
    pub minute: u32,
    /// Absent for deployments that work without per-camera orientation.
    pub orientation: Option<Orientation>,
}

/// The `datetime` object as it appears on the wire.
#[derive(Debug, Deserialize)]
struct RawDateTime {
    year: u32,
    month: u32,
    dom: u32,
    hour: u32,
    minute: u32,
    #[serde(default)]
    pan: Option<i32>,
    #[serde(default)]
    azimuth: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    datetime: RawDateTime,
    storage: StorageConfig,
}

impl TryFrom<RawDateTime> for JobParams {
    type Error = RequestError;

    fn try_from(raw: RawDateTime) -> Result<Self, Self::Error> {
        check_range("year", raw.year, 1..=9999, "1-9999")?;
        check_range("month", raw.month, 1..=12, "1-12")?;
        check_range("dom", raw.dom, 1..=31, "1-31")?;
        check_range("hour", raw.hour, 0..=23, "0-23")?;
        check_range("minute", raw.minute, 0..=59, "0-59")?;

        let orientation = match (raw.pan, raw.azimuth) {
            (Some(pan), Some(azimuth)) => Some(Orientation { pan, azimuth }),
            (None, None) => None,
            _ => return Err(RequestError::PartialOrientation),
        };

        Ok(Self {
            year: raw.year,
            month: raw.month,
            dom: raw.dom,
            hour: raw.hour,
            minute: raw.minute,
            orientation,
        })
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: std::ops::RangeInclusive<u32>,
    expected: &'static str,
) -> Result<(), RequestError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RequestError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

impl JobParams {
    /// Storage date path, `YYYY/MM/DD`.
    pub fn date_path(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.dom)
    }

    /// Per-observation collection name, `HHMM` with an optional `-PPP-AAA` suffix.
    pub fn slot(&self) -> String {
        match self.orientation {
            Some(o) => format!(
                "{:02}{:02}-{:03}-{:03}",
                self.hour, self.minute, o.pan, o.azimuth
            ),
            None => format!("{:02}{:02}", self.hour, self.minute),
        }
    }

    /// The `pan-azimuth` composite handed to the analyzer.
    pub fn pan_azimuth(&self) -> Option<String> {
        self.orientation.map(|o| format!("{}-{}", o.pan, o.azimuth))
    }
}

/// Zero-padded so log lines sort lexically: `YYYY-MM-DD HH:MM/PPP/AAA`.
impl fmt::Display for JobParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.dom, self.hour, self.minute
        )?;
        if let Some(o) = self.orientation {
            write!(f, "/{:03}/{:03}", o.pan, o.azimuth)?;
        }
        Ok(())
    }
}

/// A parsed job request.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub params: JobParams,
    pub storage: StorageConfig,
}

impl JobRequest {
    /// Parses the typed view of a raw request.
    pub fn from_value(value: &Value) -> Result<Self, RequestError> {
        let raw: RawRequest = RawRequest::deserialize(value)
            .map_err(|e| RequestError::Malformed(e.to_string()))?;

        Ok(Self {
            params: JobParams::try_from(raw.datetime)?,
            storage: raw.storage,
        })
    }
}

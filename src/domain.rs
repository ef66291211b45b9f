use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// label format stamped on every reading: month/day hour:minute, utc.
/// no year and no seconds, so text order is only chronological within a year.
pub const TIMESTAMP_FORMAT: &str = "%m/%d %H:%M";

/// one stored light sensor measurement
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// rowid assigned by sqlite
    #[allow(dead_code)]
    pub id: i64,
    /// raw sensor value, no range validation
    pub light_value: f64,
    /// server-side ingest time formatted with TIMESTAMP_FORMAT
    pub timestamp: String,
}

/// wire shape of a reading on GET /light-sensor/data (the id stays internal)
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ReadingView {
    pub light_value: f64,
    pub timestamp: String,
}

impl From<Reading> for ReadingView {
    fn from(reading: Reading) -> Self {
        Self { light_value: reading.light_value, timestamp: reading.timestamp }
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// source of "now" for the ingest path
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

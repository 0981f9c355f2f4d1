//! Civil-time conversion for record timestamps.

use crate::error::Result;
use chrono::{Local, TimeZone};
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;

/// Where a record's UTC offset comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    /// The same offset for every record.
    Fixed(UtcOffset),
    /// The system time zone's offset in effect at each record's own instant,
    /// so DST transitions inside an archive are honored.
    Local,
}

impl Zone {
    pub fn offset_at(self, epoch_seconds: i64) -> UtcOffset {
        match self {
            Zone::Fixed(o) => o,
            Zone::Local => local_offset_at(epoch_seconds),
        }
    }

    pub fn to_civil(self, epoch_seconds: u32) -> Result<OffsetDateTime> {
        let secs = i64::from(epoch_seconds);
        let utc = OffsetDateTime::from_unix_timestamp(secs)?;
        Ok(utc.to_offset(self.offset_at(secs)))
    }
}

// chrono's Local reads the zone rules itself and is safe off the main thread.
fn local_offset_at(epoch_seconds: i64) -> UtcOffset {
    let seconds = Local
        .timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| dt.offset().local_minus_utc());
    offset_or_utc(seconds)
}

fn offset_or_utc(seconds: Option<i32>) -> UtcOffset {
    match seconds.map(UtcOffset::from_whole_seconds) {
        Some(Ok(o)) => o,
        Some(Err(e)) => {
            warn!("local UTC offset out of range ({e}); using UTC");
            UtcOffset::UTC
        }
        None => {
            warn!("local UTC offset unavailable; using UTC");
            UtcOffset::UTC
        }
    }
}

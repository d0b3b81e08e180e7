use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

// Offset-less timestamps are assumed to be UTC.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A parsed timestamp and whether the text carried a UTC offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub time: DateTime<Utc>,
    pub has_offset: bool,
}

/// Parses the ISO-8601 flavours tracking backends emit. A trailing `Z` is
/// accepted as `+00:00`.
pub fn parse_timestamp(timestamp: &str) -> Result<ParsedTimestamp> {
    let trimmed = timestamp.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(without_z) => format!("{without_z}+00:00"),
        None => trimmed.to_string(),
    };
    let with_offset = |time: DateTime<FixedOffset>| ParsedTimestamp {
        time: time.with_timezone(&Utc),
        has_offset: true,
    };

    if let Ok(time) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(with_offset(time));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(time) = DateTime::<FixedOffset>::parse_from_str(&normalized, format) {
            return Ok(with_offset(time));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ParsedTimestamp {
                time: time.and_utc(),
                has_offset: false,
            });
        }
    }
    Err(anyhow!("unparsable timestamp: {:?}", timestamp))
}

pub fn parse_iso8601_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(timestamp).map(|parsed| parsed.time)
}

/// Elapsed time between two timestamps in (fractional) minutes. Negative when
/// `curr` is before `prev`.
pub fn minutes_between(prev: &DateTime<Utc>, curr: &DateTime<Utc>) -> f64 {
    (*curr - *prev).num_milliseconds() as f64 / 60_000.0
}

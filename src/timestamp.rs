//! Parsing and formatting of the `created_at` timestamps kept in the database.

use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{
        BorrowedFormatItem,
        well_known::{Iso8601, Rfc3339},
    },
    macros::format_description,
};

/// RFC 3339 in UTC with a fixed number of fractional digits, so that stored
/// timestamps sort lexicographically in time order.
const STORAGE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z");

/// The format SQLite uses for `CURRENT_TIMESTAMP`, always UTC.
const SQLITE_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const SQLITE_DATETIME_SUBSECOND: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");

/// A space separated date-time with a UTC offset, e.g. `2024-01-15 10:30:00.5+13:00`.
const SPACED_DATETIME_WITH_OFFSET: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
);

/// Format `timestamp` the way it is written to the database.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
    timestamp.to_offset(UtcOffset::UTC).format(STORAGE_FORMAT)
}

/// Parse a stored timestamp, trying each of the representations that may be
/// found in the database.
///
/// Timestamps without an offset are read as UTC.
/// Returns `None` if none of the formats match.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(raw, SPACED_DATETIME_WITH_OFFSET))
        .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
        .or_else(|_| PrimitiveDateTime::parse(raw, SQLITE_DATETIME).map(|dt| dt.assume_utc()))
        .or_else(|_| {
            PrimitiveDateTime::parse(raw, SQLITE_DATETIME_SUBSECOND).map(|dt| dt.assume_utc())
        })
        .ok()
}

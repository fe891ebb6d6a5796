use chrono::{DateTime, FixedOffset, Local};

/// RFC 1123 date with numeric time zone, like `Tue, 10 Nov 2009 23:00:00 +0100`.
const RFC_1123_NUMERIC_ZONE: &str = "%a, %d %b %Y %H:%M:%S %z";

/// format_date formats date as used in `Date` header.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format(RFC_1123_NUMERIC_ZONE).to_string()
}

/// now returns current wall clock time in local time zone.
pub fn now() -> DateTime<FixedOffset> {
    DateTime::<FixedOffset>::from(Local::now())
}

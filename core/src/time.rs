//! Time related utils.

use chrono::NaiveDateTime;
use chrono::Utc;

use crate::Error;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601 basic format: `20220313T072004Z`
///
/// Fractional seconds are dropped.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse time from ISO8601 basic format: `20220313T072004Z`
///
/// The input must match `YYYYMMDDTHHMMSSZ` exactly.
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    let bs = s.as_bytes();
    let well_formed = bs.len() == 16
        && bs[8] == b'T'
        && bs[15] == b'Z'
        && bs[..8].iter().all(u8::is_ascii_digit)
        && bs[9..15].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(Error::date_invalid(format!(
            "invalid date {s:?}, expected format is: 20151104T092022Z"
        )));
    }

    let t = NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ").map_err(|e| {
        Error::date_invalid(format!("invalid date {s:?}")).with_source(anyhow::Error::from(e))
    })?;
    Ok(t.and_utc())
}

/// Parse time from http date: `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn parse_http_date(s: &str) -> crate::Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s).map_err(|e| {
        Error::date_invalid(format!("invalid http date {s:?}"))
            .with_source(anyhow::Error::from(e))
    })?;
    Ok(t.with_timezone(&Utc))
}

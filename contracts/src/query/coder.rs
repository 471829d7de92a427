//! Shared scalar and date conversions used by both codec directions.
//!
//! Everything here is a pure string-to-value (or value-to-string) transform.
//! The decoder and encoder wrap these with field names to produce their
//! diagnostics; nothing in this module knows which field it is converting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::num::IntErrorKind;

/// Format pattern applied when a record type does not override its date
/// strategies. Offsets render without a colon, e.g.
/// `2017-10-31T16:15:56+0000`, always in UTC.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Why a raw string failed to convert to a scalar kind.
///
/// `OutOfRange` covers numeric text the kind cannot represent, including a
/// negative literal supplied for an unsigned kind. Everything else is
/// `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarError {
    Invalid,
    OutOfRange,
}

/// String conversions for every scalar kind a query field may hold.
///
/// An empty string is the valid empty `String` value, not an absent one;
/// absence is decided by key presence, one level up.
pub trait QueryScalar: Sized {
    /// Kind name used in decode diagnostics.
    const KIND: &'static str;

    fn from_query_value(raw: &str) -> Result<Self, ScalarError>;

    fn to_query_value(&self) -> String;
}

// A minus sign followed by digits parses as InvalidDigit for unsigned
// kinds; report it as a range violation instead so callers can tell
// garbage apart from a sign error.
fn is_negative_numeric(raw: &str) -> bool {
    match raw.strip_prefix('-') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

macro_rules! signed_scalar {
    ($($int:ty),*) => {$(
        impl QueryScalar for $int {
            const KIND: &'static str = stringify!($int);

            fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
                raw.parse::<$int>().map_err(|error| match error.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ScalarError::OutOfRange
                    }
                    _ => ScalarError::Invalid,
                })
            }

            fn to_query_value(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($int:ty),*) => {$(
        impl QueryScalar for $int {
            const KIND: &'static str = stringify!($int);

            fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
                raw.parse::<$int>().map_err(|error| match error.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ScalarError::OutOfRange
                    }
                    _ if is_negative_numeric(raw) => ScalarError::OutOfRange,
                    _ => ScalarError::Invalid,
                })
            }

            fn to_query_value(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

signed_scalar!(i8, i16, i32, i64, isize);
unsigned_scalar!(u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($float:ty),*) => {$(
        impl QueryScalar for $float {
            const KIND: &'static str = stringify!($float);

            fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
                raw.parse::<$float>().map_err(|_| ScalarError::Invalid)
            }

            // Integral values keep one fractional digit so `7.0` survives
            // a round trip as `"7.0"` rather than collapsing to `"7"`.
            fn to_query_value(&self) -> String {
                if self.is_finite() && self.fract() == 0.0 {
                    format!("{:.1}", self)
                } else {
                    self.to_string()
                }
            }
        }
    )*};
}

float_scalar!(f32, f64);

impl QueryScalar for bool {
    const KIND: &'static str = "bool";

    fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ScalarError::Invalid),
        }
    }

    fn to_query_value(&self) -> String {
        self.to_string()
    }
}

impl QueryScalar for String {
    const KIND: &'static str = "string";

    fn from_query_value(raw: &str) -> Result<Self, ScalarError> {
        Ok(raw.to_string())
    }

    fn to_query_value(&self) -> String {
        self.clone()
    }
}

/// How a record type's date fields are parsed from their string form.
///
/// The strategy is static per record type, fixed at type definition time
/// and read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub enum DateDecodingStrategy {
    /// Parse with [`DEFAULT_DATE_FORMAT`].
    Default,
    /// Parse signed fractional seconds since the Unix epoch.
    SecondsSince1970,
    /// Parse ISO-8601 text: `YYYY-MM-DDTHH:MM:SS(.sss)?` followed by `Z`,
    /// `+HH:MM` or `+HHMM`.
    Iso8601,
    /// Parse with the given chrono format pattern. Patterns without a time
    /// of day resolve to midnight UTC.
    Formatted(&'static str),
    /// Parse with a caller-supplied pure function.
    Custom(fn(&str) -> Option<DateTime<Utc>>),
}

/// How a record type's date fields are rendered to their string form.
#[derive(Debug, Clone, Copy)]
pub enum DateEncodingStrategy {
    /// Render with [`DEFAULT_DATE_FORMAT`].
    Default,
    /// Render fractional seconds since the Unix epoch.
    SecondsSince1970,
    /// Render ISO-8601 in UTC with a `Z` suffix.
    Iso8601,
    /// Render with the given chrono format pattern.
    Formatted(&'static str),
    /// Render with a caller-supplied pure function.
    Custom(fn(&DateTime<Utc>) -> String),
}

pub(crate) fn parse_date(raw: &str, strategy: DateDecodingStrategy) -> Option<DateTime<Utc>> {
    match strategy {
        DateDecodingStrategy::Default => DateTime::parse_from_str(raw, DEFAULT_DATE_FORMAT)
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        DateDecodingStrategy::SecondsSince1970 => {
            let seconds = raw.parse::<f64>().ok()?;
            if !seconds.is_finite() {
                return None;
            }
            let whole = seconds.floor();
            let nanos = ((seconds - whole) * 1_000_000_000.0).round() as u32;
            DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        }
        DateDecodingStrategy::Iso8601 => DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
            .map(|date| date.with_timezone(&Utc)),
        DateDecodingStrategy::Formatted(pattern) => parse_formatted(raw, pattern),
        DateDecodingStrategy::Custom(decode) => decode(raw),
    }
}

fn parse_formatted(raw: &str, pattern: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_str(raw, pattern) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
        return Some(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, pattern).ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

pub(crate) fn format_date(date: &DateTime<Utc>, strategy: DateEncodingStrategy) -> String {
    match strategy {
        DateEncodingStrategy::Default => date.format(DEFAULT_DATE_FORMAT).to_string(),
        DateEncodingStrategy::SecondsSince1970 => {
            let seconds =
                date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) / 1_000_000_000.0;
            seconds.to_query_value()
        }
        DateEncodingStrategy::Iso8601 => date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        DateEncodingStrategy::Formatted(pattern) => date.format(pattern).to_string(),
        DateEncodingStrategy::Custom(encode) => encode(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_conversions() {
        assert_eq!(i8::from_query_value("1"), Ok(1));
        assert_eq!(i16::from_query_value("1"), Ok(1));
        assert_eq!(i32::from_query_value("1"), Ok(1));
        assert_eq!(i64::from_query_value("1"), Ok(1));
        assert_eq!(isize::from_query_value("1"), Ok(1));
        assert_eq!(u8::from_query_value("2"), Ok(2));
        assert_eq!(u16::from_query_value("2"), Ok(2));
        assert_eq!(u32::from_query_value("2"), Ok(2));
        assert_eq!(u64::from_query_value("2"), Ok(2));
        assert_eq!(usize::from_query_value("2"), Ok(2));
    }

    #[test]
    fn test_integer_garbage_is_invalid() {
        assert_eq!(i32::from_query_value("abc"), Err(ScalarError::Invalid));
        assert_eq!(i32::from_query_value(""), Err(ScalarError::Invalid));
        assert_eq!(u32::from_query_value("1.5"), Err(ScalarError::Invalid));
    }

    #[test]
    fn test_integer_overflow_is_out_of_range() {
        assert_eq!(i8::from_query_value("127"), Ok(127));
        assert_eq!(i8::from_query_value("128"), Err(ScalarError::OutOfRange));
        assert_eq!(i8::from_query_value("-129"), Err(ScalarError::OutOfRange));
        assert_eq!(u8::from_query_value("256"), Err(ScalarError::OutOfRange));
    }

    #[test]
    fn test_negative_for_unsigned_is_out_of_range() {
        assert_eq!(u32::from_query_value("-1"), Err(ScalarError::OutOfRange));
        assert_eq!(u64::from_query_value("-27"), Err(ScalarError::OutOfRange));
        // A bare minus sign is garbage, not a sign violation.
        assert_eq!(u32::from_query_value("-"), Err(ScalarError::Invalid));
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(f64::from_query_value("3.0"), Ok(3.0));
        assert_eq!(f32::from_query_value("4.0"), Ok(4.0));
        assert_eq!(f64::from_query_value("x"), Err(ScalarError::Invalid));
    }

    #[test]
    fn test_float_rendering_keeps_fractional_digit() {
        assert_eq!(7.0_f64.to_query_value(), "7.0");
        assert_eq!(12.0_f64.to_query_value(), "12.0");
        assert_eq!(7.25_f64.to_query_value(), "7.25");
        assert_eq!((-0.5_f64).to_query_value(), "-0.5");
        assert_eq!(4.0_f32.to_query_value(), "4.0");
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(bool::from_query_value("true"), Ok(true));
        assert_eq!(bool::from_query_value("false"), Ok(false));
        assert_eq!(bool::from_query_value("TRUE"), Err(ScalarError::Invalid));
        assert_eq!(bool::from_query_value("1"), Err(ScalarError::Invalid));
        assert_eq!(true.to_query_value(), "true");
    }

    #[test]
    fn test_empty_string_is_a_value() {
        assert_eq!(String::from_query_value(""), Ok(String::new()));
    }

    #[test]
    fn test_default_date_round_trip() {
        let date = parse_date("2017-10-31T16:15:56+0000", DateDecodingStrategy::Default).unwrap();
        assert_eq!(
            format_date(&date, DateEncodingStrategy::Default),
            "2017-10-31T16:15:56+0000"
        );
    }

    #[test]
    fn test_default_date_rejects_garbage() {
        assert!(parse_date("31/10/2017", DateDecodingStrategy::Default).is_none());
    }

    #[test]
    fn test_epoch_seconds_round_trip() {
        let date = parse_date("1567684372.1", DateDecodingStrategy::SecondsSince1970).unwrap();
        assert_eq!(
            format_date(&date, DateEncodingStrategy::SecondsSince1970),
            "1567684372.1"
        );
    }

    #[test]
    fn test_epoch_seconds_whole_value() {
        let date = DateTime::from_timestamp(1_567_684_372, 0).unwrap();
        assert_eq!(
            format_date(&date, DateEncodingStrategy::SecondsSince1970),
            "1567684372.0"
        );
    }

    #[test]
    fn test_iso8601_accepts_both_offset_forms() {
        let compact = parse_date("2019-09-06T10:14:41+0000", DateDecodingStrategy::Iso8601);
        let zulu = parse_date("2019-09-06T10:14:41Z", DateDecodingStrategy::Iso8601);
        assert_eq!(compact, zulu);
        assert!(compact.is_some());
    }

    #[test]
    fn test_iso8601_renders_utc_zulu() {
        let date = parse_date("2019-09-06T10:14:41+0000", DateDecodingStrategy::Iso8601).unwrap();
        assert_eq!(
            format_date(&date, DateEncodingStrategy::Iso8601),
            "2019-09-06T10:14:41Z"
        );
    }

    #[test]
    fn test_formatted_date_only_pattern() {
        let date = parse_date("2017-10-31", DateDecodingStrategy::Formatted("%Y-%m-%d")).unwrap();
        assert_eq!(
            format_date(&date, DateEncodingStrategy::Formatted("%Y-%m-%d")),
            "2017-10-31"
        );
        assert_eq!(
            format_date(&date, DateEncodingStrategy::Iso8601),
            "2017-10-31T00:00:00Z"
        );
    }
}

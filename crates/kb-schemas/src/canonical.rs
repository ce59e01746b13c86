//! Canonicalisation applied to values once they pass validation.
//!
//! All transforms here are pure and idempotent:
//!
//! - [`round_to_cents`] fixes thresholds and penalties to two decimal places.
//! - [`Timestamp`] normalises any accepted ISO 8601 spelling to UTC with a
//!   literal `Z` suffix.

use std::fmt;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc,
};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Naive layouts accepted in addition to RFC 3339. Naive values are UTC.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset layouts for compact `+HHMM` offsets that RFC 3339 rejects.
const OFFSET_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_LAYOUT: &str = "%Y-%m-%d";

/// Round to two decimal places.
///
/// Ties are resolved half-to-even on the exact binary value, which is what
/// decimal formatting does; `0.125` is stored as exactly `0.125` and rounds
/// to `0.12`, while `0.375` rounds to `0.38`.
///
/// # Examples
/// ```
/// use kb_schemas::canonical::round_to_cents;
///
/// assert_eq!(round_to_cents(0.333), 0.33);
/// assert_eq!(round_to_cents(round_to_cents(0.666)), 0.67);
/// ```
#[must_use]
pub fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Serialise a 0/1 switch in its integer wire form.
pub(crate) fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// Raised when a string is not an accepted ISO 8601 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not an ISO 8601 timestamp")]
pub struct InvalidTimestamp {
    /// The rejected input.
    pub input: String,
}

/// A UTC instant with microsecond precision.
///
/// Serialises as `YYYY-MM-DDTHH:MM:SS[.ffffff]Z`; the fractional part is
/// omitted when zero.
///
/// # Examples
/// ```
/// use kb_schemas::canonical::Timestamp;
///
/// let ts = Timestamp::parse("2024-01-02T03:04:05+02:00").expect("valid timestamp");
/// assert_eq!(ts.to_string(), "2024-01-02T01:04:05Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse any accepted spelling and normalise it to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTimestamp`] when no accepted layout matches.
    pub fn parse(raw: &str) -> Result<Self, InvalidTimestamp> {
        parse_instant(raw)
            .map(Self::from_datetime)
            .ok_or_else(|| InvalidTimestamp {
                input: raw.to_owned(),
            })
    }

    /// Wrap a native instant, truncating below microseconds.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(6))
    }

    /// The underlying UTC instant.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Canonical `...Z` rendering.
    #[must_use]
    pub fn to_canonical(&self) -> String {
        let precision = if self.0.timestamp_subsec_nanos() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        self.0.to_rfc3339_opts(precision, true)
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::<FixedOffset>::parse_from_str(raw, layout).ok())
    {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, DATE_LAYOUT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

#[cfg(test)]
mod tests {
    //! Covers rounding and timestamp normalisation.

    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.333, 0.33)]
    #[case(0.4, 0.4)]
    #[case(0.125, 0.12)]
    #[case(0.375, 0.38)]
    #[case(0.999, 1.0)]
    #[case(0.0, 0.0)]
    #[case(0.95, 0.95)]
    fn rounds_to_two_places(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(round_to_cents(input), expected);
    }

    #[rstest]
    #[case(0.333)]
    #[case(0.125)]
    #[case(0.6666)]
    fn rounding_is_idempotent(#[case] input: f64) {
        let once = round_to_cents(input);
        assert_eq!(round_to_cents(once), once);
    }

    #[rstest]
    #[case("2024-01-02T03:04:05+02:00", "2024-01-02T01:04:05Z")]
    #[case("2024-01-02T03:04:05Z", "2024-01-02T03:04:05Z")]
    #[case("2024-01-02T03:04:05-05:30", "2024-01-02T08:34:05Z")]
    #[case("2024-01-02T03:04:05+0200", "2024-01-02T01:04:05Z")]
    #[case("2024-01-02T03:04:05", "2024-01-02T03:04:05Z")]
    #[case("2024-01-02 03:04:05", "2024-01-02T03:04:05Z")]
    #[case("2024-01-02T03:04", "2024-01-02T03:04:00Z")]
    #[case("2024-01-02", "2024-01-02T00:00:00Z")]
    #[case("2024-01-02T03:04:05.250Z", "2024-01-02T03:04:05.250000Z")]
    #[case("2024-01-02T03:04:05.123456789Z", "2024-01-02T03:04:05.123456Z")]
    fn normalises_accepted_spellings(#[case] raw: &str, #[case] expected: &str) {
        let ts = Timestamp::parse(raw).expect("accepted timestamp");
        assert_eq!(ts.to_canonical(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2024-13-01T00:00:00Z")]
    #[case("2024-01-02T25:00:00Z")]
    #[case("02/01/2024")]
    fn rejects_malformed_spellings(#[case] raw: &str) {
        let err = Timestamp::parse(raw).expect_err("malformed timestamp");
        assert_eq!(err.input, raw);
    }

    #[rstest]
    fn canonical_form_is_a_fixed_point() {
        let first = Timestamp::parse("2024-06-30T23:59:59.5+01:00").expect("valid");
        let second = Timestamp::parse(&first.to_canonical()).expect("canonical parses");
        assert_eq!(first, second);
        assert_eq!(second.to_canonical(), "2024-06-30T22:59:59.500000Z");
    }

    #[rstest]
    fn native_datetimes_are_truncated() {
        let instant = Utc
            .timestamp_opt(1_704_164_645, 987_654_321)
            .single()
            .expect("valid instant");
        let ts = Timestamp::from(instant);
        assert_eq!(ts.to_string(), "2024-01-02T03:04:05.987654Z");
    }

    #[rstest]
    fn serialises_canonical_string() {
        let ts = Timestamp::parse("2024-01-02T03:04:05+02:00").expect("valid");
        let json = serde_json::to_string(&ts).expect("serialise");
        assert_eq!(json, "\"2024-01-02T01:04:05Z\"");
    }
}

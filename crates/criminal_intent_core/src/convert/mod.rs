//! Storage converters for rich crime field types.
//!
//! # Responsibility
//! - Translate `DateTime<Utc>` <-> epoch milliseconds (`INTEGER` columns).
//! - Translate `CrimeId` <-> canonical UUID text (`TEXT` columns).
//! - Publish the explicit converter registration table; `repo` converts
//!   rows only through the functions registered there.
//!
//! # Invariants
//! - Every converter is pure and reentrant; none touches shared state.
//! - Absence maps to absence in both directions, including text -> id.
//! - Timestamp round-trips are exact to millisecond precision.

mod registry;

pub use registry::{
    ColumnType, Converter, ConverterRegistration, RichType, TypeConverters, CRIME_ID_CONVERTER,
    TIMESTAMP_CONVERTER,
};

use crate::model::crime::CrimeId;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Failure converting a stored primitive back into a rich type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Stored text is not a syntactically valid identifier.
    InvalidCrimeId { value: String, reason: String },
    /// Stored epoch milliseconds fall outside the representable date range.
    TimestampOutOfRange(i64),
    /// Column held a primitive of a different kind than the converter reads.
    UnexpectedStorageValue {
        expected: ColumnType,
        found: &'static str,
    },
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCrimeId { value, reason } => {
                write!(f, "invalid crime id `{value}`: {reason}")
            }
            Self::TimestampOutOfRange(millis) => {
                write!(f, "epoch milliseconds {millis} out of supported date range")
            }
            Self::UnexpectedStorageValue { expected, found } => {
                write!(f, "expected {expected} storage value, found {found}")
            }
        }
    }
}

impl Error for ConvertError {}

/// Converts a timestamp to its epoch-milliseconds storage form.
///
/// Sub-millisecond precision is truncated toward negative infinity.
pub fn timestamp_to_epoch_ms(date: Option<DateTime<Utc>>) -> Option<i64> {
    date.map(|value| value.timestamp_millis())
}

/// Converts stored epoch milliseconds back into a timestamp.
///
/// # Errors
/// - `TimestampOutOfRange` when the value lies beyond chrono's supported
///   range (roughly +/-262,000 years). Such rows can only come from
///   external writers.
pub fn epoch_ms_to_timestamp(millis: Option<i64>) -> ConvertResult<Option<DateTime<Utc>>> {
    millis
        .map(|value| {
            DateTime::<Utc>::from_timestamp_millis(value)
                .ok_or(ConvertError::TimestampOutOfRange(value))
        })
        .transpose()
}

/// Parses stored identifier text into a `CrimeId`.
///
/// Absent text yields an absent id rather than an error.
///
/// # Errors
/// - `InvalidCrimeId` when present text is not a valid UUID representation.
pub fn text_to_crime_id(text: Option<&str>) -> ConvertResult<Option<CrimeId>> {
    text.map(str::parse::<CrimeId>).transpose()
}

/// Converts an id to its canonical lowercase hyphenated text form.
pub fn crime_id_to_text(id: Option<CrimeId>) -> Option<String> {
    id.map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        crime_id_to_text, epoch_ms_to_timestamp, text_to_crime_id, timestamp_to_epoch_ms,
        ConvertError,
    };
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn pre_epoch_sub_millisecond_values_floor() {
        let date = Utc.timestamp_opt(-1, 999_999_999).unwrap();
        assert_eq!(timestamp_to_epoch_ms(Some(date)), Some(-1));
    }

    #[test]
    fn epoch_ms_beyond_supported_range_is_rejected() {
        let err = epoch_ms_to_timestamp(Some(i64::MAX)).unwrap_err();
        assert_eq!(err, ConvertError::TimestampOutOfRange(i64::MAX));
    }

    #[test]
    fn extreme_supported_dates_roundtrip() {
        for date in [DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC] {
            let millis = timestamp_to_epoch_ms(Some(date));
            let restored = epoch_ms_to_timestamp(millis).unwrap().unwrap();
            assert_eq!(restored.timestamp_millis(), date.timestamp_millis());
        }
    }

    #[test]
    fn uppercase_and_simple_forms_parse_to_canonical_text() {
        let upper = text_to_crime_id(Some("123E4567-E89B-12D3-A456-426614174000"))
            .unwrap()
            .unwrap();
        let simple = text_to_crime_id(Some("123e4567e89b12d3a456426614174000"))
            .unwrap()
            .unwrap();
        assert_eq!(upper, simple);
        assert_eq!(
            crime_id_to_text(Some(upper)).as_deref(),
            Some("123e4567-e89b-12d3-a456-426614174000")
        );
    }

    #[test]
    fn empty_and_padded_text_is_malformed() {
        assert!(matches!(
            text_to_crime_id(Some("")),
            Err(ConvertError::InvalidCrimeId { .. })
        ));
        assert!(matches!(
            text_to_crime_id(Some(" 123e4567-e89b-12d3-a456-426614174000")),
            Err(ConvertError::InvalidCrimeId { .. })
        ));
    }
}

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Text form used for dates at every boundary of the engine.
pub const DAY_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{input}` is not a DD/MM/YYYY date")]
pub struct DayParseError {
    pub input: String,
}

pub fn parse_day(input: &str) -> Result<NaiveDate, DayParseError> {
    NaiveDate::parse_from_str(input.trim(), DAY_FORMAT).map_err(|_| DayParseError {
        input: input.to_string(),
    })
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Resolves "today minus `n` days". A negative `n` moves forward.
pub fn days_before(today: NaiveDate, n: i64) -> Option<NaiveDate> {
    today.checked_sub_signed(Duration::try_days(n)?)
}

/// Every calendar day from `start` to `end`, both inclusive. Empty when `end < start`.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Serde adapter that stores a `NaiveDate` as its `DD/MM/YYYY` text form.
pub mod serde_day {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_day(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_formats_with_zero_padding() {
        let day = parse_day(" 05/03/2024 ").unwrap();
        assert_eq!(day, ymd(2024, 3, 5));
        assert_eq!(format_day(day), "05/03/2024");
    }

    #[test]
    fn rejects_other_layouts() {
        assert!(parse_day("2024-03-05").is_err());
        assert!(parse_day("31/02/2024").is_err());
        let err = parse_day("tomorrow").unwrap_err();
        assert_eq!(err.to_string(), "`tomorrow` is not a DD/MM/YYYY date");
    }

    #[test]
    fn resolves_days_before_today() {
        let today = ymd(2024, 3, 1);
        assert_eq!(days_before(today, 0), Some(today));
        assert_eq!(days_before(today, 1), Some(ymd(2024, 2, 29)));
        assert_eq!(days_before(today, -1), Some(ymd(2024, 3, 2)));
    }

    #[test]
    fn day_range_is_inclusive_and_empty_when_inverted() {
        let days: Vec<_> = day_range(ymd(2024, 1, 30), ymd(2024, 2, 2)).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days.first(), Some(&ymd(2024, 1, 30)));
        assert_eq!(days.last(), Some(&ymd(2024, 2, 2)));
        assert_eq!(day_range(ymd(2024, 1, 2), ymd(2024, 1, 1)).count(), 0);
    }
}

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

use crate::day::{format_day, parse_day};

/// Completion state of a single day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    None,
    Done,
    #[serde(rename = "Not-Done")]
    NotDone,
}

impl Status {
    /// Successor in the `None -> Done -> NotDone -> None` cycle.
    pub fn next(self) -> Self {
        match self {
            Status::None => Status::Done,
            Status::Done => Status::NotDone,
            Status::NotDone => Status::None,
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::None => "None",
            Status::Done => "Done",
            Status::NotDone => "Not-Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-habit record of daily status. Iteration is always chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<NaiveDate, Status>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status recorded for `day`; `None` when the day is outside the ledger.
    pub fn status(&self, day: NaiveDate) -> Option<Status> {
        self.entries.get(&day).copied()
    }

    pub fn set(&mut self, day: NaiveDate, status: Status) {
        self.entries.insert(day, status);
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.entries.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Status)> + '_ {
        self.entries.iter().map(|(day, status)| (*day, *status))
    }
}

impl FromIterator<(NaiveDate, Status)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Status)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// Stored as an object keyed by the DD/MM/YYYY text form.
impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (day, status) in &self.entries {
            map.serialize_entry(&format_day(*day), status)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LedgerVisitor)
    }
}

struct LedgerVisitor;

impl<'de> de::Visitor<'de> for LedgerVisitor {
    type Value = Ledger;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from DD/MM/YYYY dates to statuses")
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut access: A) -> Result<Ledger, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, status)) = access.next_entry::<String, Status>()? {
            let day = parse_day(&key).map_err(de::Error::custom)?;
            if entries.insert(day, status).is_some() {
                return Err(de::Error::custom(format!(
                    "day {} appears more than once",
                    format_day(day)
                )));
            }
        }
        Ok(Ledger { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_steps_close_the_cycle() {
        for status in [Status::None, Status::Done, Status::NotDone] {
            assert_eq!(status.next().next().next(), status);
        }
        assert_eq!(Status::None.next(), Status::Done);
        assert_eq!(Status::Done.next(), Status::NotDone);
        assert_eq!(Status::NotDone.next(), Status::None);
    }

    #[test]
    fn iterates_chronologically_regardless_of_insert_order() {
        let mut ledger = Ledger::new();
        ledger.set(ymd(2024, 2, 1), Status::Done);
        ledger.set(ymd(2023, 12, 31), Status::None);
        ledger.set(ymd(2024, 1, 10), Status::NotDone);
        let days: Vec<_> = ledger.iter().map(|(day, _)| day).collect();
        assert_eq!(days, vec![ymd(2023, 12, 31), ymd(2024, 1, 10), ymd(2024, 2, 1)]);
        assert_eq!(ledger.first_day(), Some(ymd(2023, 12, 31)));
        assert_eq!(ledger.last_day(), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn missing_day_is_absent() {
        let ledger: Ledger = [(ymd(2024, 1, 1), Status::Done)].into_iter().collect();
        assert_eq!(ledger.status(ymd(2024, 1, 1)), Some(Status::Done));
        assert_eq!(ledger.status(ymd(2024, 1, 2)), None);
    }

    #[test]
    fn serializes_with_text_keys_and_stored_labels() {
        let ledger: Ledger = [
            (ymd(2024, 1, 2), Status::NotDone),
            (ymd(2024, 1, 1), Status::Done),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"01/01/2024":"Done","02/01/2024":"Not-Done"}"#);

        let parsed: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ledger);
    }

    #[test]
    fn rejects_the_same_day_written_twice() {
        let result: Result<Ledger, _> =
            serde_json::from_str(r#"{"1/1/2024":"Done","01/01/2024":"None"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("day 01/01/2024 appears more than once"));

        let unpadded: Ledger = serde_json::from_str(r#"{"2/1/2024":"Done"}"#).unwrap();
        assert_eq!(unpadded.status(ymd(2024, 1, 2)), Some(Status::Done));
    }

    #[test]
    fn rejects_malformed_keys() {
        let result: Result<Ledger, _> = serde_json::from_str(r#"{"2024-01-01":"Done"}"#);
        assert!(result.is_err());
    }
}

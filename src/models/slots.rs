use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Per-doctor map from a calendar date to the time slots already reserved on
/// that date. A time appears at most once under any date.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotMap(BTreeMap<String, Vec<String>>);

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> Result<Self, AppError> {
        if s.trim().is_empty() {
            return Ok(SlotMap::new());
        }
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_booked(&self, date: &str, time: &str) -> bool {
        self.0
            .get(date)
            .map_or(false, |times| times.iter().any(|t| t == time))
    }

    pub fn slots_on(&self, date: &str) -> &[String] {
        self.0.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Claims `time` on `date`, creating the date entry if it is absent.
    pub fn reserve(&mut self, date: &str, time: &str) -> Result<(), AppError> {
        if self.is_booked(date, time) {
            return Err(AppError::SlotConflict);
        }
        self.0
            .entry(date.to_string())
            .or_default()
            .push(time.to_string());
        Ok(())
    }

    /// Drops every occurrence of `time` under `date`. The date entry is kept
    /// even when it becomes empty; an absent date is left untouched.
    ///
    /// Returns whether anything was removed.
    pub fn release(&mut self, date: &str, time: &str) -> bool {
        match self.0.get_mut(date) {
            Some(times) => {
                let before = times.len();
                times.retain(|t| t != time);
                times.len() != before
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_then_conflict() {
        let mut slots = SlotMap::new();
        slots.reserve("2024-05-01", "10:00").unwrap();

        assert_eq!(slots.slots_on("2024-05-01"), ["10:00".to_string()]);
        assert!(matches!(
            slots.reserve("2024-05-01", "10:00"),
            Err(AppError::SlotConflict)
        ));
        assert_eq!(slots.slots_on("2024-05-01").len(), 1);
    }

    #[test]
    fn same_time_on_other_date_is_free() {
        let mut slots = SlotMap::new();
        slots.reserve("2024-05-01", "10:00").unwrap();
        slots.reserve("2024-05-02", "10:00").unwrap();
        slots.reserve("2024-05-01", "10:30").unwrap();

        assert_eq!(slots.slots_on("2024-05-01").len(), 2);
        assert!(slots.is_booked("2024-05-02", "10:00"));
    }

    #[test]
    fn release_keeps_empty_date_entry() {
        let mut slots = SlotMap::new();
        slots.reserve("2024-05-01", "10:00").unwrap();

        assert!(slots.release("2024-05-01", "10:00"));
        assert_eq!(slots.to_json().unwrap(), r#"{"2024-05-01":[]}"#);

        slots.reserve("2024-05-01", "10:00").unwrap();
        assert_eq!(slots.to_json().unwrap(), r#"{"2024-05-01":["10:00"]}"#);
    }

    #[test]
    fn release_is_a_no_op_on_absence() {
        let mut slots = SlotMap::new();
        assert!(!slots.release("2024-05-01", "10:00"));
        assert_eq!(slots, SlotMap::new());

        slots.reserve("2024-05-01", "11:00").unwrap();
        assert!(!slots.release("2024-05-01", "10:00"));
        assert_eq!(slots.slots_on("2024-05-01"), ["11:00".to_string()]);
    }

    #[test]
    fn release_removes_stray_duplicates() {
        let mut slots =
            SlotMap::from_json(r#"{"2024-05-01":["10:00","11:00","10:00"]}"#).unwrap();
        assert!(slots.release("2024-05-01", "10:00"));
        assert_eq!(slots.slots_on("2024-05-01"), ["11:00".to_string()]);
    }

    #[test]
    fn blank_column_is_an_empty_map() {
        assert_eq!(SlotMap::from_json("").unwrap(), SlotMap::new());
        assert_eq!(SlotMap::from_json("{}").unwrap(), SlotMap::new());
        assert!(SlotMap::from_json("[1, 2]").is_err());
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One timetable cell, e.g. `4:38` + `am`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTime {
    pub clock: String,
    pub meridiem: String,
}

impl SlotTime {
    pub fn new(clock: impl Into<String>, meridiem: impl Into<String>) -> Self {
        Self {
            clock: clock.into(),
            meridiem: meridiem.into(),
        }
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.clock, self.meridiem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub date: NaiveDate,
    pub fajr: SlotTime,
    pub sunrise: SlotTime,
    pub luhar: SlotTime,
    pub asar: SlotTime,
    pub maghrib: SlotTime,
    pub isha: SlotTime,
}

impl PrayerTimes {
    /// Slots in timetable column order, with their display names.
    pub fn slots(&self) -> [(&'static str, &SlotTime); 6] {
        [
            ("Fajr", &self.fajr),
            ("Sunrise", &self.sunrise),
            ("Luhar", &self.luhar),
            ("Asar", &self.asar),
            ("Maghrib", &self.maghrib),
            ("Isha", &self.isha),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    DayNotFound,
    MalformedRow { tokens: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DayNotFound => write!(f, "no prayer time found"),
            SkipReason::MalformedRow { tokens } => {
                write!(f, "line format error ({} tokens, expected at least 13)", tokens)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Sent { date: NaiveDate },
    Skipped { date: NaiveDate, reason: SkipReason },
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent { .. })
    }
}

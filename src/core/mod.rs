pub mod engine;
pub mod pipeline;
pub mod schedule;
pub mod server;
pub mod timetable;

pub use crate::domain::model::{DeliveryOutcome, PrayerTimes, SkipReason, SlotTime};
pub use crate::domain::ports::{ConfigProvider, Notifier, Pipeline, Storage, TimetableSource};
pub use crate::utils::error::Result;

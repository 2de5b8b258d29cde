use crate::domain::model::{DeliveryOutcome, PrayerTimes, SkipReason};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Local cache for downloaded timetables.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the monthly timetable PDF comes from.
#[async_trait]
pub trait TimetableSource: Send + Sync {
    async fn fetch(&self, target: NaiveDate) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// One delivery, split into the three stages the engine sequences.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Timetable text for the month containing `target`.
    async fn extract(&self, target: NaiveDate) -> Result<String>;
    async fn transform(
        &self,
        text: String,
        target: NaiveDate,
    ) -> Result<std::result::Result<PrayerTimes, SkipReason>>;
    async fn load(&self, times: PrayerTimes) -> Result<DeliveryOutcome>;
}

pub trait ConfigProvider: Send + Sync {
    /// Relative path the downloaded timetable is cached under.
    fn cache_file(&self) -> &str;
    fn location(&self) -> &str;
}

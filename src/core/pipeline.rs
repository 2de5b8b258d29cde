use crate::core::timetable::{extract_text, find_day_row, format_message, parse_row};
use crate::core::{
    ConfigProvider, DeliveryOutcome, Notifier, Pipeline, PrayerTimes, SkipReason, Storage,
    TimetableSource,
};
use crate::utils::error::{BotError, Result};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct DigestPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: Arc<dyn TimetableSource>,
    notifier: Arc<dyn Notifier>,
}

impl<S: Storage, C: ConfigProvider> DigestPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        source: Arc<dyn TimetableSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            config,
            source,
            notifier,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DigestPipeline<S, C> {
    async fn extract(&self, target: NaiveDate) -> Result<String> {
        let pdf = self.source.fetch(target).await?;

        tracing::debug!("Caching timetable as {}", self.config.cache_file());
        self.storage.write_file(self.config.cache_file(), &pdf).await?;

        // pdf-extract 是同步且可能 panic，放到 blocking 執行緒
        tokio::task::spawn_blocking(move || extract_text(&pdf))
            .await
            .map_err(|e| BotError::PdfError {
                message: format!("text extraction aborted: {}", e),
            })?
    }

    async fn transform(
        &self,
        text: String,
        target: NaiveDate,
    ) -> Result<std::result::Result<PrayerTimes, SkipReason>> {
        let Some(row) = find_day_row(&text, target) else {
            return Ok(Err(SkipReason::DayNotFound));
        };
        Ok(parse_row(&row, target))
    }

    async fn load(&self, times: PrayerTimes) -> Result<DeliveryOutcome> {
        let message = format_message(&times, self.config.location());
        tracing::debug!("Sending message:\n{}", message);

        self.notifier.send(&message).await?;
        Ok(DeliveryOutcome::Sent { date: times.date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timetable::DEFAULT_LOCATION;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn cache_file(&self) -> &str {
            "today.pdf"
        }

        fn location(&self) -> &str {
            DEFAULT_LOCATION
        }
    }

    struct StaticSource(Vec<u8>);

    #[async_trait]
    impl TimetableSource for StaticSource {
        async fn fetch(&self, _target: NaiveDate) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> Result<()> {
            self.sent.lock().await.push(text.to_string());
            Ok(())
        }
    }

    fn pipeline(
        source: Vec<u8>,
    ) -> (
        DigestPipeline<MockStorage, MockConfig>,
        MockStorage,
        Arc<RecordingNotifier>,
    ) {
        let storage = MockStorage::default();
        let notifier = Arc::new(RecordingNotifier::default());
        let pipeline = DigestPipeline::new(
            storage.clone(),
            MockConfig,
            Arc::new(StaticSource(source)),
            notifier.clone(),
        );
        (pipeline, storage, notifier)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_extract_caches_download_before_parsing() {
        let (pipeline, storage, _) = pipeline(b"not a pdf".to_vec());

        let err = pipeline.extract(date(2025, 7, 31)).await.unwrap_err();

        assert!(matches!(err, BotError::PdfError { .. }));
        assert_eq!(storage.get("today.pdf").await.unwrap(), b"not a pdf");
    }

    #[tokio::test]
    async fn test_transform_day_not_found() {
        let (pipeline, _, _) = pipeline(Vec::new());

        let result = pipeline
            .transform("1-Aug\n".to_string(), date(2025, 7, 31))
            .await
            .unwrap();

        assert_eq!(result, Err(SkipReason::DayNotFound));
    }

    #[tokio::test]
    async fn test_transform_malformed_row() {
        let (pipeline, _, _) = pipeline(Vec::new());
        let text = "31-Jul\n4:38\n6:03\n12:13\n3:33\n6:23\n7:35\nend\n";

        let result = pipeline
            .transform(text.to_string(), date(2025, 7, 31))
            .await
            .unwrap();

        assert_eq!(result, Err(SkipReason::MalformedRow { tokens: 7 }));
    }

    #[tokio::test]
    async fn test_transform_then_load_sends_message() {
        let (pipeline, _, notifier) = pipeline(Vec::new());
        let text = "31-Jul\n4:38 am\n6:03 am\n12:13 pm\n3:33 pm\n6:23 pm\n7:35 pm\n1-Aug\n";

        let times = pipeline
            .transform(text.to_string(), date(2025, 7, 31))
            .await
            .unwrap()
            .unwrap();
        let outcome = pipeline.load(times).await.unwrap();

        assert_eq!(outcome, DeliveryOutcome::Sent { date: date(2025, 7, 31) });
        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Prayer Times - Colombo (Sri Lanka)\n31 July 2025\n"));
        assert!(sent[0].contains("Asar - 3:33 pm"));
        assert!(sent[0].ends_with("{ACJU}"));
    }
}

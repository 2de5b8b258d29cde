use crate::domain::ports::TimetableSource;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://github.com/farhathkkk/acju-prayer-times/raw/main/Prayer-Times-{month}-2025-COLOMBO.pdf";

/// Substitutes `{month}` (full English name) and `{year}` for `target`.
pub fn resolve_url(template: &str, target: NaiveDate) -> String {
    template
        .replace("{month}", &target.format("%B").to_string())
        .replace("{year}", &target.format("%Y").to_string())
}

#[derive(Debug, Clone)]
pub struct HttpTimetableSource {
    client: Client,
    url_template: String,
}

impl HttpTimetableSource {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prayer-times-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
        })
    }
}

#[async_trait]
impl TimetableSource for HttpTimetableSource {
    async fn fetch(&self, target: NaiveDate) -> Result<Vec<u8>> {
        let url = resolve_url(&self.url_template, target);
        tracing::debug!("Downloading timetable from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("Timetable response status: {}", status);

        if !status.is_success() {
            return Err(BotError::HttpStatusError {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        tracing::info!("Downloaded timetable ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}

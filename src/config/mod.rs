pub mod toml_config;

use crate::adapters::http::DEFAULT_URL_TEMPLATE;
use crate::core::schedule::{LocalClock, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SEND_AT};
use crate::core::timetable::DEFAULT_LOCATION;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveTime;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "prayer-times-bot")]
#[command(about = "Posts tomorrow's prayer times to a Telegram chat every day")]
pub struct CliConfig {
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, env = "CHAT_ID")]
    pub chat_id: Option<String>,

    #[arg(long, env = "TIMETABLE_URL_TEMPLATE", default_value = DEFAULT_URL_TEMPLATE)]
    pub url_template: String,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = "today.pdf")]
    pub cache_file: String,

    #[arg(long, default_value = DEFAULT_LOCATION)]
    pub location: String,

    #[arg(long, env = "SEND_AT", default_value = DEFAULT_SEND_AT, help = "Daily send time, HH:MM")]
    pub send_at: String,

    #[arg(long, env = "UTC_OFFSET", help = "Fixed offset such as +05:30; system zone when unset")]
    pub utc_offset: Option<String>,

    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    #[arg(long, help = "Do not send immediately on startup")]
    pub skip_startup_send: bool,

    #[arg(long, help = "Send tomorrow's times once and exit, without the server or scheduler")]
    pub once: bool,

    #[arg(long, env = "TELEGRAM_API_URL")]
    pub telegram_api_url: Option<String>,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, help = "TOML file whose values override the command line")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("url_template", &self.url_template)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("data_dir", &self.data_dir)
            .field("cache_file", &self.cache_file)
            .field("location", &self.location)
            .field("send_at", &self.send_at)
            .field("utc_offset", &self.utc_offset)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("skip_startup_send", &self.skip_startup_send)
            .field("once", &self.once)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("config", &self.config)
            .finish()
    }
}

impl CliConfig {
    /// Parses arguments and applies `--config` when given.
    pub fn load() -> Result<Self> {
        let mut config = Self::parse();
        if let Some(path) = config.config.clone() {
            toml_config::FileConfig::from_file(&path)?.apply_to(&mut config);
        }
        Ok(config)
    }

    pub fn bot_token(&self) -> Result<&str> {
        validation::validate_required_field("BOT_TOKEN", &self.bot_token).map(String::as_str)
    }

    pub fn chat_id(&self) -> Result<&str> {
        validation::validate_required_field("CHAT_ID", &self.chat_id).map(String::as_str)
    }

    pub fn send_time(&self) -> Result<NaiveTime> {
        validation::parse_send_time("send_at", &self.send_at)
    }

    pub fn clock(&self) -> Result<LocalClock> {
        match &self.utc_offset {
            Some(offset) => Ok(LocalClock::Fixed(validation::parse_utc_offset(
                "utc_offset",
                offset,
            )?)),
            None => Ok(LocalClock::System),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigProvider for CliConfig {
    fn cache_file(&self) -> &str {
        &self.cache_file
    }

    fn location(&self) -> &str {
        &self.location
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("BOT_TOKEN", self.bot_token()?)?;
        validation::validate_chat_id("CHAT_ID", self.chat_id()?)?;
        validation::validate_url_template("url_template", &self.url_template)?;
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("cache_file", &self.cache_file)?;
        validation::validate_non_empty_string("location", &self.location)?;
        self.send_time()?;
        self.clock()?;
        // 輪詢間隔超過一分鐘會錯過觸發的那一分鐘
        validation::validate_range("poll_interval_secs", self.poll_interval_secs, 1, 59)?;
        validation::validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        validation::validate_positive_number("port", u64::from(self.port), 1)?;
        if let Some(api_url) = &self.telegram_api_url {
            validation::validate_url("telegram_api_url", api_url)?;
        }
        Ok(())
    }
}

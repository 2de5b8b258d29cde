use crate::config::CliConfig;
use crate::utils::error::{BotError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML configuration; every key present overrides the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub telegram: Option<TelegramSection>,
    pub source: Option<SourceSection>,
    pub schedule: Option<ScheduleSection>,
    pub server: Option<ServerSection>,
    pub message: Option<MessageSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramSection {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    pub url_template: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub data_dir: Option<String>,
    pub cache_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSection {
    pub send_at: Option<String>,
    pub utc_offset: Option<String>,
    pub poll_interval_seconds: Option<u64>,
    pub send_on_startup: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageSection {
    pub location: Option<String>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOT_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| BotError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_to(self, config: &mut CliConfig) {
        if let Some(telegram) = self.telegram {
            override_opt(&mut config.bot_token, telegram.bot_token);
            override_opt(&mut config.chat_id, telegram.chat_id);
            override_opt(&mut config.telegram_api_url, telegram.api_url);
        }
        if let Some(source) = self.source {
            override_with(&mut config.url_template, source.url_template);
            override_with(&mut config.request_timeout_secs, source.timeout_seconds);
            override_with(&mut config.data_dir, source.data_dir);
            override_with(&mut config.cache_file, source.cache_file);
        }
        if let Some(schedule) = self.schedule {
            override_with(&mut config.send_at, schedule.send_at);
            override_opt(&mut config.utc_offset, schedule.utc_offset);
            override_with(&mut config.poll_interval_secs, schedule.poll_interval_seconds);
            if let Some(send_on_startup) = schedule.send_on_startup {
                config.skip_startup_send = !send_on_startup;
            }
        }
        if let Some(server) = self.server {
            override_with(&mut config.host, server.host);
            override_with(&mut config.port, server.port);
        }
        if let Some(message) = self.message {
            override_with(&mut config.location, message.location);
        }
    }
}

fn override_with<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn override_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

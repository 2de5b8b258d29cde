use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Timetable download failed with status {status}: {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Telegram request failed: {0}")]
    TelegramError(#[from] teloxide::RequestError),

    #[error("PDF extraction failed: {message}")]
    PdfError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Dockerfile does not satisfy the image contract: {message}")]
    ImageContractError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Telegram,
    Document,
    Io,
    Configuration,
    Packaging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::HttpError(_) | BotError::HttpStatusError { .. } => ErrorCategory::Network,
            BotError::TelegramError(_) => ErrorCategory::Telegram,
            BotError::PdfError { .. } => ErrorCategory::Document,
            BotError::IoError(_) | BotError::ServerError { .. } => ErrorCategory::Io,
            BotError::ConfigError { .. }
            | BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BotError::ImageContractError { .. } => ErrorCategory::Packaging,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路與 Telegram 錯誤通常下一輪就會恢復
            ErrorCategory::Network | ErrorCategory::Telegram => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::Packaging => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BotError::HttpError(_) => "Check network connectivity to the timetable host",
            BotError::HttpStatusError { status: 404, .. } => {
                "The timetable for this month may not be published yet; check the URL template"
            }
            BotError::HttpStatusError { .. } => "The timetable host returned an error; retry later",
            BotError::TelegramError(_) => "Verify BOT_TOKEN and CHAT_ID and that the bot can post to the chat",
            BotError::PdfError { .. } => "The downloaded file is not a readable PDF; check the URL template",
            BotError::IoError(_) => "Check file permissions and free disk space",
            BotError::ConfigError { .. } | BotError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and restart"
            }
            BotError::MissingConfigError { .. } => "Set the missing environment variable or flag",
            BotError::ImageContractError { .. } => "Regenerate the Dockerfile with `dockerfile render`",
            BotError::ServerError { .. } => "Make sure the port is free and the host address is valid",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::MissingConfigError { field } => format!("Missing required setting: {}", field),
            BotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            BotError::HttpStatusError { status, .. } => {
                format!("Could not download the prayer timetable (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }

    /// 依嚴重程度決定程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

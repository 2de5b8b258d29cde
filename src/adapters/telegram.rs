use crate::domain::ports::Notifier;
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;

/// Numeric ids (`-100...`) or `@channel` usernames.
pub fn parse_recipient(chat_id: &str) -> Result<Recipient> {
    let trimmed = chat_id.trim();
    if trimmed.starts_with('@') && trimmed.len() > 1 {
        return Ok(Recipient::ChannelUsername(trimmed.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| BotError::InvalidConfigValueError {
            field: "chat_id".to_string(),
            value: chat_id.to_string(),
            reason: "Expected a numeric chat id or an @channel username".to_string(),
        })
}

#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str) -> Result<Self> {
        Ok(Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id)?,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let url = url::Url::parse(api_url).map_err(|e| BotError::InvalidConfigValueError {
            field: "telegram_api_url".to_string(),
            value: api_url.to_string(),
            reason: e.to_string(),
        })?;
        self.bot = self.bot.set_api_url(url);
        Ok(self)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let message = self
            .bot
            .send_message(self.recipient.clone(), text)
            .await?;
        tracing::info!("Message {} delivered to chat {}", message.id.0, message.chat.id.0);
        Ok(())
    }
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod packaging;
pub mod utils;

pub use adapters::{HttpTimetableSource, LocalStorage, TelegramNotifier};
pub use config::CliConfig;
pub use crate::core::{engine::DigestEngine, pipeline::DigestPipeline};
pub use utils::error::{BotError, Result};

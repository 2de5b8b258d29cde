// Adapters layer: concrete implementations of the domain ports (http, storage, telegram).

pub mod http;
pub mod storage;
pub mod telegram;

pub use http::HttpTimetableSource;
pub use storage::LocalStorage;
pub use telegram::TelegramNotifier;

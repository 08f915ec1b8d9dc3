pub mod core;
pub mod export;
pub mod i18n;
pub mod language_store;
pub mod mock;
pub mod sheets;

pub use core::HttpClientFactory;
pub use language_store::JsonLanguageStore;
pub use sheets::{SheetsFormClient, SheetsReadClient};

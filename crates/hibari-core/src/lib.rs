pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod reminders;
pub mod storage;
pub mod token;

pub use error::HibariError;
pub use library::WatchList;
pub use storage::TokenStore;

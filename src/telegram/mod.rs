//! Telegram Bot API transport
//!
//! - [`client`] - HTTP client for `getUpdates` / `sendMessage`
//! - [`models`] - Request/response data types
//! - [`poller`] - Long-polling loop driving the dialogue engine

pub mod client;
pub mod models;
pub mod poller;

// Re-export commonly used types
pub use client::TelegramClient;
pub use models::{Message, Update, User};
pub use poller::Poller;

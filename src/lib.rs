// Library crate - journal core, dialogue engine and transport

pub mod config;
pub mod dialogue;
pub mod health;
pub mod journal;
pub mod messages;
pub mod telegram;

// Re-export commonly used types
pub use config::BotConfig;
pub use dialogue::DialogueEngine;
pub use journal::{Ledger, Trade};

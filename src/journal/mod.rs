//! Journal - trade records, the in-memory ledger and aggregation
//!
//! - [`trades`] - Trade record and field enums
//! - [`ledger`] - Per-user append-only store with id allocation
//! - [`stats`] - Net R and count aggregation for `/week` and `/stats`

pub mod ledger;
pub mod stats;
pub mod trades;

// Re-export commonly used types
pub use ledger::{CloseOutcome, Ledger};
pub use stats::{net_r, stats_report, week_report, JournalSummary};
pub use trades::{Direction, NewTrade, Session, Trade, UserId};

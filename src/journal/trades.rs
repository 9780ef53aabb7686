//! Trade types for the journal

use chrono::{DateTime, Utc};

/// Opaque chat user identity (Telegram user id)
pub type UserId = i64;

/// One logged position
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// Per-user sequential id, starting at 1
    pub id: u64,
    /// Uppercased instrument symbol
    pub pair: String,
    pub direction: Direction,
    pub session: Session,
    /// R risked
    pub risk: f64,
    /// R targeted
    pub target: f64,
    /// R realized; `None` while the trade is open
    pub result: Option<f64>,
    /// Capitalized outcome label; `None` while the trade is open
    pub fate: Option<String>,
    pub opened: DateTime<Utc>,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.result.is_none()
    }
}

/// Fields collected by the entry dialogue, before an id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub pair: String,
    pub direction: Direction,
    pub session: Session,
    pub risk: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Case-insensitive lookup: buy -> Buy, sell -> Sell
    pub fn normalize(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "Buy"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// Trading session the position was taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    London,
    NY,
    Asia,
}

impl Session {
    /// Canonical forms: london -> London, ny -> NY, asia -> Asia
    pub fn normalize(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "london" => Some(Self::London),
            "ny" => Some(Self::NY),
            "asia" => Some(Self::Asia),
            _ => None,
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::London => write!(f, "London"),
            Self::NY => write!(f, "NY"),
            Self::Asia => write!(f, "Asia"),
        }
    }
}

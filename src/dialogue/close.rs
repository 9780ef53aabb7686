//! Trade-close dialogue
//!
//! SelectId -> AwaitResult -> AwaitFate -> commit. The selected id is not
//! checked against the ledger until commit.

use super::input::{capitalize, parse_r, parse_trade_id};
use super::Transition;
use crate::journal::Trade;

pub const NO_ACTIVE_TRADES: &str = "No active trades.";
pub const PROMPT_RESULT: &str = "Result in R? (e.g. +2, -1, 0)";
pub const PROMPT_FATE: &str = "Fate? (Target Hit / Early Close / BE / Stop Loss)";
pub const CLOSED: &str = "✅ Trade closed & journaled";

#[derive(Debug, Clone, PartialEq)]
pub enum CloseState {
    SelectId,
    AwaitResult { id: u64 },
    AwaitFate { id: u64, result: f64 },
}

/// Ledger mutation produced by the final step
#[derive(Debug, Clone, PartialEq)]
pub struct CloseTrade {
    pub id: u64,
    pub result: f64,
    pub fate: String,
}

impl std::fmt::Display for CloseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectId => write!(f, "SELECT_ID"),
            Self::AwaitResult { .. } => write!(f, "AWAIT_RESULT"),
            Self::AwaitFate { .. } => write!(f, "AWAIT_FATE"),
        }
    }
}

impl CloseState {
    /// Open the dialogue over the user's open trades.
    ///
    /// Returns `Err` with the final reply when there is nothing to close;
    /// no state is created in that case.
    pub fn start(open: &[Trade]) -> Result<(Self, String), &'static str> {
        if open.is_empty() {
            return Err(NO_ACTIVE_TRADES);
        }

        let mut msg = String::from("Active trades:\n");
        for t in open {
            msg.push_str(&format!("{} → {} {}\n", t.id, t.pair, t.direction));
        }
        msg.push_str("\nEnter trade ID:");
        Ok((Self::SelectId, msg))
    }

    pub fn step(self, text: &str) -> Transition<Self, CloseTrade> {
        match self {
            Self::SelectId => match parse_trade_id(text) {
                Ok(id) => Transition::advance(Self::AwaitResult { id }, PROMPT_RESULT),
                Err(e) => Transition::retry(Self::SelectId, e, "Invalid ID"),
            },
            Self::AwaitResult { id } => match parse_r(text) {
                Ok(result) => Transition::advance(Self::AwaitFate { id, result }, PROMPT_FATE),
                Err(e) => Transition::retry(Self::AwaitResult { id }, e, "Enter a number"),
            },
            Self::AwaitFate { id, result } => Transition::Commit(CloseTrade {
                id,
                result,
                fate: capitalize(text),
            }),
        }
    }
}

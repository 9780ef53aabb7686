//! Trade-entry dialogue
//!
//! Linear flow, one field per message:
//! 1. AwaitPair - instrument symbol, uppercased
//! 2. AwaitDirection - Buy / Sell
//! 3. AwaitSession - London / NY / Asia
//! 4. AwaitRisk - R risked
//! 5. AwaitTarget - R targeted, then commit
//!
//! Each state carries only what has been collected so far. Invalid input
//! keeps the state unchanged with no retry limit.

use super::input::{parse_direction, parse_pair, parse_r, parse_risk, parse_session, InputError};
use super::Transition;
use crate::journal::{Direction, NewTrade, Session, Trade};
use crate::messages::fmt_r;

pub const PROMPT_PAIR: &str = "Pair? (e.g. EURUSD, XAUUSD)";
pub const PROMPT_DIRECTION: &str = "Direction? (Buy / Sell)";
pub const PROMPT_SESSION: &str = "Session? (London / NY / Asia)";
pub const PROMPT_RISK: &str = "Risk in R? (e.g. 1)";
pub const PROMPT_TARGET: &str = "Target in R? (e.g. 3)";

#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    AwaitPair,
    AwaitDirection {
        pair: String,
    },
    AwaitSession {
        pair: String,
        direction: Direction,
    },
    AwaitRisk {
        pair: String,
        direction: Direction,
        session: Session,
    },
    AwaitTarget {
        pair: String,
        direction: Direction,
        session: Session,
        risk: f64,
    },
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitPair => write!(f, "AWAIT_PAIR"),
            Self::AwaitDirection { .. } => write!(f, "AWAIT_DIRECTION"),
            Self::AwaitSession { .. } => write!(f, "AWAIT_SESSION"),
            Self::AwaitRisk { .. } => write!(f, "AWAIT_RISK"),
            Self::AwaitTarget { .. } => write!(f, "AWAIT_TARGET"),
        }
    }
}

impl EntryState {
    /// Initial state and the prompt that opens the dialogue
    pub fn start() -> (Self, &'static str) {
        (Self::AwaitPair, PROMPT_PAIR)
    }

    /// Feed one message into the dialogue
    pub fn step(self, text: &str) -> Transition<Self, NewTrade> {
        match self {
            Self::AwaitPair => match parse_pair(text) {
                Ok(pair) => Transition::advance(Self::AwaitDirection { pair }, PROMPT_DIRECTION),
                Err(e) => Transition::retry(Self::AwaitPair, e, PROMPT_PAIR),
            },

            Self::AwaitDirection { pair } => match parse_direction(text) {
                Ok(direction) => {
                    Transition::advance(Self::AwaitSession { pair, direction }, PROMPT_SESSION)
                }
                Err(e) => Transition::retry(Self::AwaitDirection { pair }, e, "Type Buy or Sell"),
            },

            Self::AwaitSession { pair, direction } => match parse_session(text) {
                Ok(session) => Transition::advance(
                    Self::AwaitRisk { pair, direction, session },
                    PROMPT_RISK,
                ),
                Err(e) => Transition::retry(
                    Self::AwaitSession { pair, direction },
                    e,
                    "London, NY or Asia only",
                ),
            },

            Self::AwaitRisk { pair, direction, session } => match parse_risk(text) {
                Ok(risk) => Transition::advance(
                    Self::AwaitTarget { pair, direction, session, risk },
                    PROMPT_TARGET,
                ),
                Err(e) => {
                    let reply = match e {
                        InputError::NonPositiveRisk(_) => "Risk must be above 0",
                        _ => "Enter a number",
                    };
                    Transition::retry(Self::AwaitRisk { pair, direction, session }, e, reply)
                }
            },

            Self::AwaitTarget { pair, direction, session, risk } => match parse_r(text) {
                Ok(target) => Transition::Commit(NewTrade {
                    pair,
                    direction,
                    session,
                    risk,
                    target,
                }),
                Err(e) => Transition::retry(
                    Self::AwaitTarget { pair, direction, session, risk },
                    e,
                    "Enter a valid number",
                ),
            },
        }
    }
}

/// Reply sent once the trade is in the ledger
pub fn confirmation(trade: &Trade) -> String {
    format!(
        "✅ Trade logged\nID: {}\n{} {} | {}\nRisk {}R → Target {}R",
        trade.id,
        trade.pair,
        trade.direction,
        trade.session,
        fmt_r(trade.risk),
        fmt_r(trade.target)
    )
}

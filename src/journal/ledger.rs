//! In-memory trade ledger
//!
//! Holds every user's trades in insertion order together with the last id
//! handed out to that user. Entries are only ever appended or closed in
//! place; nothing is deleted and ids are never reused.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::trades::{NewTrade, Trade, UserId};

/// Per-user book: trades plus id counter
#[derive(Debug, Default)]
struct UserBook {
    trades: Vec<Trade>,
    last_id: u64,
}

/// What happened when a close was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The trade was open and is now closed
    Closed,
    /// No trade with that id exists for the user
    NotFound,
    /// The trade exists but already carries a result
    AlreadyClosed,
}

/// Process-wide trade store, shared by handle
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    books: Arc<RwLock<HashMap<UserId, UserBook>>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id for `user` and append the trade as open
    pub fn open_trade(&self, user: UserId, new: NewTrade, opened: DateTime<Utc>) -> Trade {
        let mut books = self.books.write();
        let book = books.entry(user).or_default();
        book.last_id += 1;

        let trade = Trade {
            id: book.last_id,
            pair: new.pair,
            direction: new.direction,
            session: new.session,
            risk: new.risk,
            target: new.target,
            result: None,
            fate: None,
            opened,
        };
        book.trades.push(trade.clone());

        debug!(user, id = trade.id, pair = %trade.pair, "Trade opened");
        trade
    }

    /// Set result and fate on the first trade of `user` with `id`.
    ///
    /// Unknown ids and already-closed trades leave the ledger untouched.
    pub fn close_trade(&self, user: UserId, id: u64, result: f64, fate: String) -> CloseOutcome {
        let mut books = self.books.write();
        let Some(trade) = books
            .get_mut(&user)
            .and_then(|book| book.trades.iter_mut().find(|t| t.id == id))
        else {
            warn!(user, id, "Close requested for unknown trade id, nothing changed");
            return CloseOutcome::NotFound;
        };

        if !trade.is_open() {
            warn!(user, id, "Close requested for already closed trade, nothing changed");
            return CloseOutcome::AlreadyClosed;
        }

        trade.result = Some(result);
        trade.fate = Some(fate);
        debug!(user, id, result, "Trade closed");
        CloseOutcome::Closed
    }

    /// Snapshot of all trades for `user`, oldest first
    pub fn trades(&self, user: UserId) -> Vec<Trade> {
        self.books
            .read()
            .get(&user)
            .map(|book| book.trades.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the trades of `user` that have no result yet
    pub fn open_trades(&self, user: UserId) -> Vec<Trade> {
        self.books
            .read()
            .get(&user)
            .map(|book| book.trades.iter().filter(|t| t.is_open()).cloned().collect())
            .unwrap_or_default()
    }

    /// Last id handed out to `user` (0 if none)
    pub fn last_id(&self, user: UserId) -> u64 {
        self.books.read().get(&user).map_or(0, |book| book.last_id)
    }
}

//! Dialogue engine
//!
//! Routes each inbound message either to a command or to the user's active
//! conversation, keeps the per-user conversation table and applies the
//! ledger effects of finished dialogues. Transport-agnostic: callers pass the
//! user id, the raw text and the current time, and send back the reply.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::close::{self, CloseState};
use super::entry::{self, EntryState};
use super::Transition;
use crate::config::BotConfig;
use crate::journal::{stats_report, week_report, CloseOutcome, Ledger, UserId};
use crate::messages::{PLAN_TEXT, START_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueKind {
    Entry,
    Close,
}

impl std::fmt::Display for DialogueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "trade"),
            Self::Close => write!(f, "close"),
        }
    }
}

#[derive(Debug, Clone)]
enum Dialogue {
    Entry(EntryState),
    Close(CloseState),
}

#[derive(Debug, Clone)]
struct Conversation {
    dialogue: Dialogue,
    last_activity: DateTime<Utc>,
}

/// Bot commands understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Trade,
    Close,
    Week,
    Stats,
    Plan,
}

impl Command {
    /// Parse "/name" or "/name@botname", ignoring trailing arguments
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word);
        match name.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "trade" => Some(Self::Trade),
            "close" => Some(Self::Close),
            "week" => Some(Self::Week),
            "stats" => Some(Self::Stats),
            "plan" => Some(Self::Plan),
            _ => None,
        }
    }
}

pub struct DialogueEngine {
    ledger: Ledger,
    config: BotConfig,
    conversations: Mutex<HashMap<(UserId, DialogueKind), Conversation>>,
}

impl DialogueEngine {
    pub fn new(ledger: Ledger, config: BotConfig) -> Self {
        Self {
            ledger,
            config,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Handle one inbound message. `None` means nothing to send back.
    pub fn handle(&self, user: UserId, text: &str, now: DateTime<Utc>) -> Option<String> {
        let text = text.trim();
        if text.starts_with('/') {
            return match Command::parse(text) {
                Some(cmd) => Some(self.run_command(user, cmd, now)),
                None => {
                    debug!(user, text, "Ignoring unknown command");
                    None
                }
            };
        }

        // Entry dialogue takes precedence when both are active
        let mut conversations = self.conversations.lock();
        for kind in [DialogueKind::Entry, DialogueKind::Close] {
            let Some(conversation) = conversations.remove(&(user, kind)) else {
                continue;
            };
            if self.is_idle(&conversation, now) {
                info!(user, %kind, "Dropping idle conversation");
                continue;
            }
            let reply = self.advance(&mut conversations, user, kind, conversation.dialogue, text, now);
            return Some(reply);
        }

        debug!(user, "No active conversation, ignoring message");
        None
    }

    fn run_command(&self, user: UserId, cmd: Command, now: DateTime<Utc>) -> String {
        debug!(user, ?cmd, "Command");
        match cmd {
            Command::Start => START_TEXT.to_string(),
            Command::Plan => PLAN_TEXT.to_string(),
            Command::Week => {
                week_report(&self.ledger.trades(user), self.config.is_premium(user))
            }
            Command::Stats => stats_report(&self.ledger.trades(user)),
            Command::Trade => {
                let (state, prompt) = EntryState::start();
                self.begin(user, DialogueKind::Entry, Dialogue::Entry(state), now);
                prompt.to_string()
            }
            Command::Close => match CloseState::start(&self.ledger.open_trades(user)) {
                Ok((state, prompt)) => {
                    self.begin(user, DialogueKind::Close, Dialogue::Close(state), now);
                    prompt
                }
                Err(reply) => {
                    self.conversations.lock().remove(&(user, DialogueKind::Close));
                    reply.to_string()
                }
            },
        }
    }

    fn begin(&self, user: UserId, kind: DialogueKind, dialogue: Dialogue, now: DateTime<Utc>) {
        let previous = self.conversations.lock().insert(
            (user, kind),
            Conversation {
                dialogue,
                last_activity: now,
            },
        );
        if previous.is_some() {
            info!(user, %kind, "Restarting dialogue");
        }
    }

    fn advance(
        &self,
        conversations: &mut HashMap<(UserId, DialogueKind), Conversation>,
        user: UserId,
        kind: DialogueKind,
        dialogue: Dialogue,
        text: &str,
        now: DateTime<Utc>,
    ) -> String {
        let mut keep = |dialogue: Dialogue| {
            conversations.insert((user, kind), Conversation { dialogue, last_activity: now });
        };

        match dialogue {
            Dialogue::Entry(state) => match state.step(text) {
                Transition::Retry { state, error, reply } => {
                    debug!(user, %state, %error, "Entry input rejected");
                    keep(Dialogue::Entry(state));
                    reply.to_string()
                }
                Transition::Advance { state, reply } => {
                    keep(Dialogue::Entry(state));
                    reply.to_string()
                }
                Transition::Commit(new) => {
                    let trade = self.ledger.open_trade(user, new, now);
                    info!(user, id = trade.id, pair = %trade.pair, "Trade logged");
                    entry::confirmation(&trade)
                }
            },

            Dialogue::Close(state) => match state.step(text) {
                Transition::Retry { state, error, reply } => {
                    debug!(user, %state, %error, "Close input rejected");
                    keep(Dialogue::Close(state));
                    reply.to_string()
                }
                Transition::Advance { state, reply } => {
                    keep(Dialogue::Close(state));
                    reply.to_string()
                }
                Transition::Commit(effect) => {
                    let id = effect.id;
                    match self.ledger.close_trade(user, id, effect.result, effect.fate) {
                        CloseOutcome::Closed => info!(user, id, "Trade closed"),
                        outcome => {
                            warn!(user, id, ?outcome, "Close dialogue finished without a ledger change")
                        }
                    }
                    close::CLOSED.to_string()
                }
            },
        }
    }

    /// A non-positive timeout disables eviction
    fn is_idle(&self, conversation: &Conversation, now: DateTime<Utc>) -> bool {
        let timeout = self.config.dialogue_idle_timeout;
        timeout > chrono::Duration::zero() && now - conversation.last_activity > timeout
    }

    /// Drop every conversation idle past the timeout; returns how many went
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut conversations = self.conversations.lock();
        let before = conversations.len();
        conversations.retain(|_, c| !self.is_idle(c, now));
        let evicted = before - conversations.len();
        if evicted > 0 {
            info!(evicted, "Evicted idle conversations");
        }
        evicted
    }

    pub fn has_conversation(&self, user: UserId, kind: DialogueKind) -> bool {
        self.conversations.lock().contains_key(&(user, kind))
    }

    pub fn active_conversations(&self) -> usize {
        self.conversations.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALICE: UserId = 1001;
    const BOB: UserId = 2002;

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Ledger::new(), BotConfig::default())
    }

    fn send(engine: &DialogueEngine, user: UserId, inputs: &[&str]) -> Vec<Option<String>> {
        let now = Utc::now();
        inputs.iter().map(|text| engine.handle(user, text, now)).collect()
    }

    fn log_trade(engine: &DialogueEngine, user: UserId) -> String {
        send(engine, user, &["/trade", "eurusd", "buy", "london", "1", "3"])
            .pop()
            .flatten()
            .unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/trade"), Some(Command::Trade));
        assert_eq!(Command::parse("/Close@TradeBuddyBot"), Some(Command::Close));
        assert_eq!(Command::parse("/week now"), Some(Command::Week));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("trade"), None);
    }

    #[test]
    fn test_entry_scenario() {
        let engine = engine();
        let reply = log_trade(&engine, ALICE);

        assert!(reply.contains("ID: 1"));
        assert!(reply.contains("EURUSD Buy"));
        assert!(reply.contains("London"));
        assert!(reply.contains("Risk 1.0R"));
        assert!(reply.contains("Target 3.0R"));
        assert!(!engine.has_conversation(ALICE, DialogueKind::Entry));

        let trades = engine.ledger().trades(ALICE);
        assert_eq!(trades.len(), 1);
        assert!(trades[0].result.is_none());
        assert!(trades[0].fate.is_none());
    }

    #[test]
    fn test_ids_follow_commit_count() {
        let engine = engine();
        for expected in 1..=3u64 {
            let reply = log_trade(&engine, ALICE);
            assert!(reply.contains(&format!("ID: {}", expected)));
        }
        assert!(log_trade(&engine, BOB).contains("ID: 1"));
    }

    #[test]
    fn test_invalid_direction_does_not_advance() {
        let engine = engine();
        let replies = send(&engine, ALICE, &["/trade", "eurusd", "maybe"]);
        assert_eq!(replies[2].as_deref(), Some("Type Buy or Sell"));
        assert!(engine.ledger().trades(ALICE).is_empty());

        // Still waiting for a direction
        let replies = send(&engine, ALICE, &["sell"]);
        assert_eq!(replies[0].as_deref(), Some(entry::PROMPT_SESSION));
    }

    #[test]
    fn test_close_scenario() {
        let engine = engine();
        log_trade(&engine, ALICE);

        let replies = send(&engine, ALICE, &["/close", "1", "+2", "target hit"]);
        assert_eq!(
            replies[0].as_deref(),
            Some("Active trades:\n1 → EURUSD Buy\n\nEnter trade ID:")
        );
        assert_eq!(replies[3].as_deref(), Some(close::CLOSED));

        let trade = &engine.ledger().trades(ALICE)[0];
        assert_eq!(trade.result, Some(2.0));
        assert_eq!(trade.fate.as_deref(), Some("Target hit"));

        let replies = send(&engine, ALICE, &["/close"]);
        assert_eq!(replies[0].as_deref(), Some("No active trades."));
        assert!(!engine.has_conversation(ALICE, DialogueKind::Close));
    }

    #[test]
    fn test_close_without_trades_creates_no_state() {
        let engine = engine();
        assert_eq!(
            engine.handle(ALICE, "/close", Utc::now()).as_deref(),
            Some("No active trades.")
        );
        assert_eq!(engine.active_conversations(), 0);
    }

    #[test]
    fn test_close_unknown_id_reports_success() {
        let engine = engine();
        log_trade(&engine, ALICE);

        let replies = send(&engine, ALICE, &["/close", "5", "-1", "stop loss"]);
        assert_eq!(replies[3].as_deref(), Some(close::CLOSED));
        assert!(engine.ledger().trades(ALICE)[0].is_open());
    }

    #[test]
    fn test_close_leaves_other_users_untouched() {
        let engine = engine();
        log_trade(&engine, ALICE);
        log_trade(&engine, BOB);

        send(&engine, ALICE, &["/close", "1", "-1", "stop loss"]);
        assert_eq!(engine.ledger().trades(ALICE)[0].result, Some(-1.0));
        assert!(engine.ledger().trades(BOB)[0].is_open());
    }

    #[test]
    fn test_commands_mid_dialogue_keep_state() {
        let engine = engine();
        let replies = send(&engine, ALICE, &["/trade", "gbpusd", "/stats", "sell"]);
        assert_eq!(replies[2].as_deref(), Some("📈 Stats\nOpen: 0\nTotal: 0\nNet R: 0.0"));
        assert_eq!(replies[3].as_deref(), Some(entry::PROMPT_SESSION));
    }

    #[test]
    fn test_text_without_dialogue_is_ignored() {
        let engine = engine();
        assert_eq!(engine.handle(ALICE, "hello", Utc::now()), None);
        assert_eq!(engine.handle(ALICE, "/nope", Utc::now()), None);
    }

    #[test]
    fn test_retrade_restarts_dialogue() {
        let engine = engine();
        let replies = send(&engine, ALICE, &["/trade", "eurusd", "/trade", "xauusd"]);
        assert_eq!(replies[2].as_deref(), Some(entry::PROMPT_PAIR));
        assert_eq!(replies[3].as_deref(), Some(entry::PROMPT_DIRECTION));
    }

    #[test]
    fn test_week_tiers_and_stats_parity() {
        let mut config = BotConfig::default();
        config.premium_users.insert(ALICE);
        let engine = DialogueEngine::new(Ledger::new(), config);

        assert_eq!(engine.handle(ALICE, "/week", Utc::now()).as_deref(), Some("No trades yet."));

        log_trade(&engine, ALICE);
        log_trade(&engine, BOB);
        send(&engine, ALICE, &["/close", "1", "2", "target hit"]);
        send(&engine, BOB, &["/close", "1", "2", "target hit"]);

        let pro = engine.handle(ALICE, "/week", Utc::now()).unwrap();
        let free = engine.handle(BOB, "/week", Utc::now()).unwrap();
        assert!(pro.contains("1 | EURUSD Buy | London | Result: 2.0R | Fate: Target hit"));
        assert!(!free.contains("EURUSD"));
        assert!(free.contains("Net R: 2.0"));

        assert_eq!(
            engine.handle(ALICE, "/stats", Utc::now()),
            engine.handle(BOB, "/stats", Utc::now())
        );
    }

    #[test]
    fn test_idle_conversation_is_dropped() {
        let engine = engine();
        let start = Utc::now();
        engine.handle(ALICE, "/trade", start);
        engine.handle(BOB, "/trade", start);

        let later = start + Duration::minutes(31);
        assert_eq!(engine.handle(ALICE, "eurusd", later), None);
        assert!(!engine.has_conversation(ALICE, DialogueKind::Entry));

        assert_eq!(engine.evict_idle(later), 1);
        assert_eq!(engine.active_conversations(), 0);
    }

    #[test]
    fn test_activity_refreshes_idle_timer() {
        let engine = engine();
        let start = Utc::now();
        engine.handle(ALICE, "/trade", start);
        engine.handle(ALICE, "eurusd", start + Duration::minutes(20));

        assert_eq!(engine.evict_idle(start + Duration::minutes(40)), 0);
        assert_eq!(
            engine.handle(ALICE, "buy", start + Duration::minutes(45)).as_deref(),
            Some(entry::PROMPT_SESSION)
        );
    }

    #[test]
    fn test_non_positive_timeout_never_evicts() {
        for timeout in [Duration::zero(), Duration::seconds(-1)] {
            let config = BotConfig {
                dialogue_idle_timeout: timeout,
                ..Default::default()
            };
            let engine = DialogueEngine::new(Ledger::new(), config);
            let now = Utc::now();

            engine.handle(ALICE, "/trade", now);
            assert_eq!(
                engine.handle(ALICE, "eurusd", now).as_deref(),
                Some(entry::PROMPT_DIRECTION)
            );
            assert_eq!(engine.evict_idle(now + Duration::days(1)), 0);
        }
    }
}

//! Configuration for the journal bot

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use chrono::Duration;

use crate::journal::UserId;

/// Runtime settings shared by the dialogue engine and the transport
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Users that get the per-trade `/week` breakdown
    pub premium_users: HashSet<UserId>,

    /// Conversations untouched for this long are dropped
    pub dialogue_idle_timeout: Duration,

    /// Long-poll timeout passed to `getUpdates`, in seconds
    pub poll_timeout_secs: u64,

    /// Port for the liveness endpoint
    pub health_port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            premium_users: HashSet::new(),
            dialogue_idle_timeout: Duration::minutes(30),
            poll_timeout_secs: 30,
            health_port: 8080,
        }
    }
}

impl BotConfig {
    pub fn is_premium(&self, user: UserId) -> bool {
        self.premium_users.contains(&user)
    }
}

/// Idle timeout from a positive number of seconds
pub fn idle_timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        bail!("Dialogue idle timeout must be at least 1 second");
    }
    let secs = i64::try_from(secs).context("Dialogue idle timeout out of range")?;
    Duration::try_seconds(secs).context("Dialogue idle timeout out of range")
}

/// Parse a comma-separated list of user ids ("123, 456"); blanks are skipped
pub fn parse_premium_users(list: &str) -> Result<HashSet<UserId>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<UserId>()
                .with_context(|| format!("Invalid premium user id: {}", s))
        })
        .collect()
}

//! Telegram Bot API Client
//!
//! Thin HTTPS client over `getUpdates` and `sendMessage`.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::models::*;

/// Default Bot API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// `sendMessage` text limit, in UTF-16 code units
pub const MAX_MESSAGE_LEN: usize = 4096;

pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Create a client whose HTTP timeout outlasts the long-poll timeout
    pub fn new(token: String, poll_timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(token, poll_timeout_secs, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(token: String, poll_timeout_secs: u64, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", method))?;

        let status = response.status();
        let parsed: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response (status {})", method, status))?;

        if !parsed.ok {
            return Err(anyhow!(
                "{} failed: {} (code: {})",
                method,
                parsed.description.unwrap_or_default(),
                parsed.error_code.unwrap_or_default()
            ));
        }

        parsed
            .result
            .ok_or_else(|| anyhow!("{} returned ok without a result", method))
    }

    /// Long-poll for message updates starting at `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message".to_string()],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }
        Ok(updates)
    }

    /// Send `text`, split into as many messages as the length limit needs
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let request = SendMessageRequest { chat_id, text: &chunk };
            let _: serde_json::Value = self.call("sendMessage", &request).await?;
        }
        Ok(())
    }
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Split on line boundaries so every chunk fits in `limit` UTF-16 units.
/// A single line longer than `limit` is cut between characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = utf16_len(line);
        if current_len + line_len > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        for c in line.chars() {
            if current_len + c.len_utf16() > limit && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(c);
            current_len += c.len_utf16();
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_message_untouched() {
        assert_eq!(split_message("📈 Stats\nOpen: 0", 4096), vec!["📈 Stats\nOpen: 0"]);
        assert_eq!(split_message("", 4096), vec![""]);
    }

    #[test]
    fn test_split_on_line_boundaries() {
        let row = "12 | EURUSD Buy | London | Result: 2.0R | Fate: Target hit\n";
        let text = row.repeat(200);
        let chunks = split_message(&text, MAX_MESSAGE_LEN);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| utf16_len(c) <= MAX_MESSAGE_LEN));
        assert!(chunks.iter().all(|c| c.ends_with('\n')));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_overlong_line() {
        // Emoji are two UTF-16 units each
        let text = "📊".repeat(5);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks, vec!["📊📊", "📊📊", "📊"]);
    }

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new("123:abc".to_string(), 30).unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }
}

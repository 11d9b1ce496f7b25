use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod store;

pub const DEFAULT_TITLE: &str = "New Chat";
pub const WELCOME_TEXT: &str = "Hello! How can I help you with the HR policies today?";
pub const FALLBACK_TEXT: &str = "Sorry, connection error. Please ensure Ollama is running.";

const TITLE_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// A fresh session holding only the welcome message.
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::bot(WELCOME_TEXT)],
        }
    }

    /// True while nothing but the welcome message has been recorded.
    pub fn is_untouched(&self) -> bool {
        self.messages.len() == 1
    }
}

/// First four words of `text`, single-spaced, with a trailing ellipsis.
pub fn title_from_message(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    format!("{}...", words.join(" "))
}

fn now_millis() -> u128 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis(),
        Err(_) => 0,
    }
}

/// Millisecond timestamp id, bumped past any id already in `existing`.
pub fn next_session_id(existing: &[Session]) -> String {
    let mut candidate = now_millis();
    loop {
        let id = candidate.to_string();
        if !existing.iter().any(|session| session.id == id) {
            return id;
        }
        candidate += 1;
    }
}

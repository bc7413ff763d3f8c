//! Assistant chat transcript types

use serde::{Deserialize, Serialize};

/// Greeting shown before the first instruction
pub const WELCOME_MESSAGE: &str = "Hi! I'm your AI coding assistant. How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: ChatSender,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            content: content.into(),
            sender: ChatSender::User,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            content: content.into(),
            sender: ChatSender::Assistant,
        }
    }

    pub fn welcome() -> Self {
        Self {
            id: "welcome".to_string(),
            content: WELCOME_MESSAGE.to_string(),
            sender: ChatSender::Assistant,
        }
    }
}

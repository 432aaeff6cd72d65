use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::utils::format::{format_wib, DatePattern};
use crate::utils::json::lenient;

pub const DEFAULT_CONVERSATION_TITLE: &str = "Percakapan Baru";
const PREVIEW_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    #[serde(alias = "bot", alias = "ai", alias = "luna")]
    Assistant,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub conversation_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub sender: MessageSender,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self {
            id: String::new(),
            conversation_id: String::new(),
            sender: MessageSender::default(),
            content: String::new(),
            created_at: Utc::now(),
        }
    }
}

impl ChatMessage {
    pub fn is_from_user(&self) -> bool {
        self.sender == MessageSender::User
    }

    /// `HH:mm` in WIB.
    pub fn time_label(&self) -> String {
        format_wib(self.created_at, DatePattern::Time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_message: Option<String>,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub message_count: u32,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Conversation {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            user_id: String::new(),
            title: String::new(),
            last_message: None,
            message_count: 0,
            last_message_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Conversation {
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            DEFAULT_CONVERSATION_TITLE
        } else {
            title
        }
    }

    /// Last message cut to a single preview line.
    pub fn preview(&self) -> String {
        let Some(message) = self.last_message.as_deref() else {
            return String::new();
        };
        let line = message.lines().next().unwrap_or("").trim();
        if line.chars().count() > PREVIEW_MAX_CHARS {
            let cut: String = line.chars().take(PREVIEW_MAX_CHARS).collect();
            format!("{}...", cut.trim_end())
        } else {
            line.to_string()
        }
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message_at.unwrap_or(self.updated_at)
    }
}

/// Most recently active first.
pub fn sort_conversations(conversations: &mut [Conversation]) {
    conversations.sort_by_key(|c| std::cmp::Reverse(c.last_activity()));
}

/// Reply to a posted message: the stored user message and, when the
/// assistant answered synchronously, its reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatExchange {
    #[serde(default, deserialize_with = "lenient::model")]
    pub user_message: ChatMessage,
    #[serde(
        default,
        deserialize_with = "lenient::opt_model",
        skip_serializing_if = "Option::is_none"
    )]
    pub assistant_message: Option<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConversationCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl_from_json!(ChatMessage, Conversation, ChatExchange);

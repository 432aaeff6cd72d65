use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiResponse};
use crate::models::chat::{
    sort_conversations, ChatMessage, Conversation, ConversationCreate, MessageSender,
};
use crate::providers::store::{ProviderState, Store};
use crate::services::ChatService;
use crate::validation::{validate_text, ValidationResult};

pub const MESSAGE_MAX_LEN: usize = 2000;
pub const DISCONNECTED_MESSAGE: &str = "Koneksi chat terputus. Ketuk sambungkan ulang.";

/// Two states only; reconnecting is always user-initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChatState {
    pub connection: ConnectionStatus,
    pub conversations: Vec<Conversation>,
    pub active_conversation_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub is_sending: bool,
}

impl ChatState {
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionStatus::Connected
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        let id = self.active_conversation_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }
}

pub fn validate_message(content: &str) -> ValidationResult {
    validate_text("content", "Pesan", content, MESSAGE_MAX_LEN)
}

#[derive(Clone)]
pub struct ChatProvider {
    api: ApiClient,
    service: ChatService,
    store: Store<ChatState>,
}

impl ChatProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: ChatService::new(api.clone()),
            api,
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<ChatState>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<ChatState> {
        self.store.snapshot()
    }

    /// Probes the API and marks the chat connected when it answers.
    pub async fn connect(&self) -> Result<(), String> {
        self.store.start_loading();
        let probe: ApiResponse<serde_json::Value> = self.api.get("/health", &[]).await;
        let connected = self.store.settle(probe, |state, _| {
            state.connection = ConnectionStatus::Connected;
        });
        match connected {
            Ok(_) => {
                info!("Chat connected");
                Ok(())
            }
            Err(message) => {
                self.mark_disconnected(&message);
                Err(message)
            }
        }
    }

    pub fn disconnect(&self) {
        self.store.update(|state| {
            state.data.connection = ConnectionStatus::Disconnected;
            state.data.is_sending = false;
        });
        info!("Chat disconnected");
    }

    pub async fn reconnect(&self) -> Result<(), String> {
        self.disconnect();
        self.connect().await?;
        self.load_conversations().await
    }

    pub async fn load_conversations(&self) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.conversations().await;
        self.track_connection(&response);
        self.store
            .settle(response, |state, conversations| {
                state.conversations = conversations.clone();
                sort_conversations(&mut state.conversations);
            })
            .map(|_| ())
    }

    pub async fn open_conversation(&self, id: &str) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.messages(id).await;
        self.track_connection(&response);
        self.store
            .settle(response, |state, messages| {
                state.active_conversation_id = Some(id.to_string());
                state.messages = messages.clone();
                state.messages.sort_by_key(|m| m.created_at);
            })
            .map(|_| ())
    }

    pub async fn start_conversation(&self, title: Option<String>) -> Result<Conversation, String> {
        self.store.start_loading();
        let request = ConversationCreate {
            title: title.filter(|t| !t.trim().is_empty()),
        };
        let response = self.service.create_conversation(&request).await;
        self.track_connection(&response);
        self.store.settle(response, |state, created| {
            state.conversations.insert(0, created.clone());
            state.active_conversation_id = Some(created.id.clone());
            state.messages.clear();
        })
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.delete_conversation(id).await;
        self.track_connection(&response);
        self.store.settle(response, |state, _| {
            state.conversations.retain(|c| c.id != id);
            if state.active_conversation_id.as_deref() == Some(id) {
                state.active_conversation_id = None;
                state.messages.clear();
            }
        })
    }

    /// Sends to the active conversation. The user's message is shown
    /// immediately and replaced by the stored copy once the server answers.
    pub async fn send_message(&self, content: &str) -> Result<(), String> {
        let (connected, conversation_id) = self
            .store
            .read(|state| (state.is_connected(), state.active_conversation_id.clone()));
        if !connected {
            self.store.fail(DISCONNECTED_MESSAGE);
            return Err(DISCONNECTED_MESSAGE.to_string());
        }
        let Some(conversation_id) = conversation_id else {
            let message = "Pilih percakapan terlebih dahulu";
            self.store.fail(message);
            return Err(message.to_string());
        };
        validate_message(content).map_err(|e| {
            self.store.fail(e.message.clone());
            e.message
        })?;

        self.store.start_loading();
        let pending_id = format!("pending-{}", uuid::Uuid::new_v4());
        let pending = ChatMessage {
            id: pending_id.clone(),
            conversation_id: conversation_id.clone(),
            sender: MessageSender::User,
            content: content.trim().to_string(),
            created_at: Utc::now(),
        };
        self.store.update(|state| {
            state.data.messages.push(pending);
            state.data.is_sending = true;
            state.error = None;
        });

        let response = self.service.send_message(&conversation_id, content.trim()).await;
        self.track_connection(&response);
        let result = self.store.settle(response, |state, exchange| {
            state.messages.retain(|m| m.id != pending_id);
            state.messages.push(exchange.user_message.clone());
            if let Some(reply) = &exchange.assistant_message {
                state.messages.push(reply.clone());
            }
            if let Some(conversation) = state
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
            {
                let last = exchange
                    .assistant_message
                    .as_ref()
                    .unwrap_or(&exchange.user_message);
                conversation.last_message = Some(last.content.clone());
                conversation.last_message_at = Some(last.created_at);
                conversation.message_count += 1 + u32::from(exchange.assistant_message.is_some());
            }
            sort_conversations(&mut state.conversations);
        });

        self.store.update(|state| {
            state.data.is_sending = false;
            if result.is_err() {
                state.data.messages.retain(|m| m.id != pending_id);
            }
        });
        result.map(|_| ())
    }

    /// Transport failures (no HTTP status) drop the connection.
    fn track_connection<T>(&self, response: &ApiResponse<T>) {
        if !response.success && response.status.is_none() {
            self.mark_disconnected(&response.message);
        }
    }

    fn mark_disconnected(&self, reason: &str) {
        warn!("Chat connection lost: {}", reason);
        self.store.update(|state| {
            state.data.connection = ConnectionStatus::Disconnected;
            state.data.is_sending = false;
        });
    }
}

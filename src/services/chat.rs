use crate::api::{resource_path, ApiClient, ApiResponse};
use crate::models::chat::{
    ChatExchange, ChatMessage, Conversation, ConversationCreate, SendMessageRequest,
};

#[derive(Clone)]
pub struct ChatService {
    api: ApiClient,
}

impl ChatService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn conversations(&self) -> ApiResponse<Vec<Conversation>> {
        self.api.get("/chat/conversations", &[]).await
    }

    pub async fn create_conversation(&self, request: &ConversationCreate) -> ApiResponse<Conversation> {
        self.api.post("/chat/conversations", request).await
    }

    pub async fn delete_conversation(&self, id: &str) -> ApiResponse<()> {
        self.api.delete(&resource_path(&["chat", "conversations", id])).await
    }

    pub async fn messages(&self, conversation_id: &str) -> ApiResponse<Vec<ChatMessage>> {
        let path = resource_path(&["chat", "conversations", conversation_id, "messages"]);
        self.api.get(&path, &[]).await
    }

    pub async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> ApiResponse<ChatExchange> {
        let request = SendMessageRequest {
            content: content.to_string(),
        };
        let path = resource_path(&["chat", "conversations", conversation_id, "messages"]);
        self.api.post(&path, &request).await
    }
}

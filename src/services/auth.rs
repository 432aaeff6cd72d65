use tracing::info;

use crate::api::{ApiClient, ApiResponse};
use crate::models::auth::{
    AuthResponse, AuthTokens, LoginRequest, PasswordChangeRequest, RefreshRequest, RegisterRequest,
};
use crate::models::user::{FinancialSettings, ProfileUpdate, User};

/// `/auth/*`. Successful login, registration and refresh install the new
/// access token on the shared [`ApiClient`].
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResponse<AuthResponse> {
        let response: ApiResponse<AuthResponse> = self.api.post("/auth/login", request).await;
        self.install_tokens(&response).await;
        response
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResponse<AuthResponse> {
        let response: ApiResponse<AuthResponse> = self.api.post("/auth/register", request).await;
        self.install_tokens(&response).await;
        response
    }

    pub async fn refresh(&self, refresh_token: &str) -> ApiResponse<AuthTokens> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response: ApiResponse<AuthTokens> = self.api.post("/auth/refresh", &request).await;
        if let Some(tokens) = response.data.as_ref().filter(|t| t.is_present()) {
            self.api.set_token(Some(tokens.access_token.clone())).await;
        }
        response
    }

    /// The local token is dropped even when the server call fails.
    pub async fn logout(&self) -> ApiResponse<()> {
        let response = self.api.post("/auth/logout", &serde_json::json!({})).await;
        self.api.set_token(None).await;
        info!("Session cleared");
        response
    }

    pub async fn me(&self) -> ApiResponse<User> {
        self.api.get("/auth/me", &[]).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResponse<User> {
        self.api.put("/auth/profile", update).await
    }

    pub async fn update_financial_settings(
        &self,
        settings: &FinancialSettings,
    ) -> ApiResponse<User> {
        self.api.put("/auth/financial-settings", settings).await
    }

    pub async fn change_password(&self, request: &PasswordChangeRequest) -> ApiResponse<()> {
        self.api.post("/auth/change-password", request).await
    }

    async fn install_tokens(&self, response: &ApiResponse<AuthResponse>) {
        if let Some(auth) = response.data.as_ref().filter(|a| a.tokens.is_present()) {
            self.api
                .set_token(Some(auth.tokens.access_token.clone()))
                .await;
            info!(user_id = %auth.user.id, "Authenticated");
        }
    }
}

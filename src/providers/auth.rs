use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::api::ApiClient;
use crate::models::auth::{AuthTokens, LoginRequest, PasswordChangeRequest, RegisterRequest};
use crate::models::user::{FinancialSettings, ProfileUpdate, User};
use crate::providers::store::{ProviderState, Store};
use crate::services::AuthService;
use crate::validation::{
    validate_financial_settings_form, validate_login_form, validate_password_change_form,
    validate_profile_form, validate_registration_form, EmailPolicy,
};

/// Refresh when the access token has less than this left.
const REFRESH_LEEWAY_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Session {
    pub user: Option<User>,
    #[serde(skip_serializing)]
    pub tokens: Option<AuthTokens>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.tokens.as_ref().is_some_and(AuthTokens::is_present)
    }
}

#[derive(Clone)]
pub struct AuthProvider {
    api: ApiClient,
    service: AuthService,
    store: Store<Session>,
    email_policy: EmailPolicy,
}

impl AuthProvider {
    pub fn new(api: ApiClient, email_policy: EmailPolicy) -> Self {
        Self {
            service: AuthService::new(api.clone()),
            api,
            store: Store::default(),
            email_policy,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<Session>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<Session> {
        self.store.snapshot()
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.read(|session| session.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read(Session::is_authenticated)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, String> {
        let request = LoginRequest {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        };
        self.store.check_form(validate_login_form(&request))?;

        self.store.start_loading();
        let response = self.service.login(&request).await;
        let auth = self.store.settle(response, |session, auth| {
            *session = Session {
                user: Some(auth.user.clone()),
                tokens: Some(auth.tokens.clone()),
                issued_at: Some(Utc::now()),
            };
        })?;
        Ok(auth.user)
    }

    pub async fn register(&self, mut request: RegisterRequest) -> Result<User, String> {
        request.email = request.email.trim().to_lowercase();
        self.store
            .check_form(validate_registration_form(&request, self.email_policy))?;

        self.store.start_loading();
        let response = self.service.register(&request).await;
        let auth = self.store.settle(response, |session, auth| {
            *session = Session {
                user: Some(auth.user.clone()),
                tokens: Some(auth.tokens.clone()),
                issued_at: Some(Utc::now()),
            };
        })?;
        Ok(auth.user)
    }

    /// Restores a session from a stored access token.
    pub async fn restore(&self, access_token: &str) -> Result<User, String> {
        self.api.set_token(Some(access_token.to_string())).await;
        self.store.update(|state| {
            state.data.tokens = Some(AuthTokens {
                access_token: access_token.to_string(),
                ..AuthTokens::default()
            });
            state.data.issued_at = Some(Utc::now());
        });
        self.load_current_user().await
    }

    pub async fn load_current_user(&self) -> Result<User, String> {
        self.store.start_loading();
        let response = self.service.me().await;
        if response.is_unauthorized() {
            self.clear_session().await;
            self.store.fail(response.message.clone());
            return Err(response.message);
        }
        self.store
            .settle(response, |session, user| session.user = Some(user.clone()))
    }

    /// Refreshes the access token when it is about to expire. Returns whether
    /// a refresh happened.
    pub async fn refresh_if_needed(&self, now: DateTime<Utc>) -> Result<bool, String> {
        let (tokens, issued_at) =
            self.store
                .read(|session| match (&session.tokens, session.issued_at) {
                    (Some(tokens), Some(issued_at)) => Some((tokens.clone(), issued_at)),
                    _ => None,
                })
                .ok_or_else(|| "Sesi tidak ditemukan. Silakan masuk kembali.".to_string())?;

        if !tokens.expires_within(issued_at, now, Duration::seconds(REFRESH_LEEWAY_SECS)) {
            return Ok(false);
        }
        if tokens.refresh_token.is_empty() {
            return Err("Sesi Anda telah berakhir. Silakan masuk kembali.".to_string());
        }

        self.store.start_loading();
        let response = self.service.refresh(&tokens.refresh_token).await;
        if response.is_unauthorized() {
            self.clear_session().await;
        }
        self.store.settle(response, |session, fresh| {
            let mut merged = fresh.clone();
            if merged.refresh_token.is_empty() {
                merged.refresh_token = tokens.refresh_token.clone();
            }
            session.tokens = Some(merged);
            session.issued_at = Some(now);
        })?;
        info!("Access token refreshed");
        Ok(true)
    }

    pub async fn logout(&self) {
        if self.is_authenticated() {
            let _ = self.service.logout().await;
        }
        self.clear_session().await;
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User, String> {
        self.store.check_form(validate_profile_form(&update))?;
        self.store.start_loading();
        let response = self.service.update_profile(&update).await;
        self.store
            .settle(response, |session, user| session.user = Some(user.clone()))
    }

    pub async fn update_financial_settings(
        &self,
        settings: FinancialSettings,
    ) -> Result<User, String> {
        self.store
            .check_form(validate_financial_settings_form(&settings))?;
        self.store.start_loading();
        let response = self.service.update_financial_settings(&settings).await;
        self.store
            .settle(response, |session, user| session.user = Some(user.clone()))
    }

    pub async fn change_password(&self, request: PasswordChangeRequest) -> Result<(), String> {
        self.store
            .check_form(validate_password_change_form(&request))?;
        self.store.start_loading();
        let response = self.service.change_password(&request).await;
        self.store.settle(response, |_, _| {})
    }

    async fn clear_session(&self) {
        self.api.set_token(None).await;
        self.store.reset();
    }
}

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_from_json;
use crate::models::user::User;
use crate::utils::json::{lenient, safe_int, FromJson};

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    #[serde(default, deserialize_with = "lenient::string")]
    pub access_token: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub refresh_token: String,
    #[serde(default = "default_token_type", deserialize_with = "lenient::string")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default, deserialize_with = "lenient::i64")]
    pub expires_in: i64,
}

impl Default for AuthTokens {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_token: String::new(),
            token_type: default_token_type(),
            expires_in: 0,
        }
    }
}

impl AuthTokens {
    pub fn is_present(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Reads the `exp` claim of the access token without verifying it.
    pub fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
        jwt_expiry(&self.access_token)
    }

    /// Expiry from the JWT claim, else `issued_at + expires_in`. A lifetime
    /// past chrono's range counts as no expiry.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.access_token_expiry().or_else(|| {
            if self.expires_in <= 0 {
                return None;
            }
            Duration::try_seconds(self.expires_in)
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        })
    }

    /// True when the token expires within `leeway` of `now`. Tokens without
    /// any expiry information never count as expired.
    pub fn expires_within(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>, leeway: Duration) -> bool {
        match self.expires_at(issued_at) {
            Some(expiry) => expiry
                .checked_sub_signed(leeway)
                .map_or(true, |refresh_at| refresh_at <= now),
            None => false,
        }
    }
}

/// Extracts `exp` from a JWT payload. Signature is not checked; the server
/// remains the authority.
pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    let exp = safe_int(&claims["exp"], -1);
    if exp < 0 {
        return None;
    }
    Utc.timestamp_opt(exp, 0).single()
}

/// Accepts both `{user, tokens: {...}}` and the flat
/// `{user, access_token, refresh_token, ...}` shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: AuthTokens,
}

impl FromJson for AuthResponse {
    fn from_json(value: &Value) -> Self {
        let tokens = match value.get("tokens") {
            Some(nested) if nested.is_object() => AuthTokens::from_json(nested),
            _ => AuthTokens::from_json(value),
        };
        AuthResponse {
            user: User::from_json(&value["user"]),
            tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl_from_json!(AuthTokens);

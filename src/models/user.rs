use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_from_json;
use crate::utils::json::{lenient, safe_map, FromJson};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

impl UserRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Student => "Mahasiswa",
            UserRole::Admin => "Administrator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub nim: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub university_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub university_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub faculty_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub faculty_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub major_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub major_name: Option<String>,
    /// Zero when unknown.
    #[serde(default, deserialize_with = "lenient::u32")]
    pub semester: u32,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
}

fn default_language() -> String {
    "id".to_string()
}

fn default_currency() -> String {
    "IDR".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default = "default_language", deserialize_with = "lenient::string")]
    pub language: String,
    #[serde(default = "default_currency", deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(default = "default_true", deserialize_with = "lenient::bool")]
    pub notifications_enabled: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub dark_mode: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: default_language(),
            currency: default_currency(),
            notifications_enabled: true,
            dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialSettings {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_income: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub monthly_budget: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub savings_target: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub current_savings: f64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub primary_bank: Option<String>,
}

impl FinancialSettings {
    pub fn is_configured(&self) -> bool {
        self.monthly_income > 0.0 || self.monthly_budget > 0.0
    }

    /// Progress towards the savings target in percent, capped at 100.
    pub fn savings_progress(&self) -> f64 {
        if self.savings_target <= 0.0 {
            return 0.0;
        }
        (self.current_savings / self.savings_target * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub role: UserRole,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "lenient::model")]
    pub profile: UserProfile,
    #[serde(default, deserialize_with = "lenient::model")]
    pub preferences: UserPreferences,
    #[serde(default, deserialize_with = "lenient::model")]
    pub financial_settings: FinancialSettings,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Full name, or the email's local part when the name is missing.
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if !name.is_empty() {
            return name;
        }
        self.email.split('@').next().unwrap_or("")
    }

    /// Up to two uppercase initials: `Budi Santoso` -> `BS`.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Students must pick university, faculty and major before using the app.
    pub fn has_completed_profile(&self) -> bool {
        if self.is_admin() {
            return true;
        }
        self.profile.university_id.is_some()
            && self.profile.faculty_id.is_some()
            && self.profile.major_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl_from_json!(UserProfile, UserPreferences, FinancialSettings);

impl FromJson for User {
    fn from_json(value: &Value) -> Self {
        let mut source = safe_map(value);
        // Older backends send the name as `nama_lengkap`.
        if !source.contains_key("full_name") {
            if let Some(legacy) = source.remove("nama_lengkap") {
                source.insert("full_name".to_string(), legacy);
            }
        }
        serde_json::from_value(Value::Object(source)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "u1",
            "email": "budi@ui.ac.id",
            "full_name": "budi santoso",
            "role": "student",
            "is_active": true,
            "is_verified": true,
            "profile": {
                "phone_number": "081234567890",
                "university_id": "univ-1",
                "university_name": "Universitas Indonesia",
                "faculty_id": "fak-1",
                "major_id": "maj-1",
                "semester": "5"
            },
            "preferences": {"language": "id", "notifications_enabled": false},
            "financial_settings": {
                "monthly_income": 3000000,
                "monthly_budget": "2500000",
                "savings_target": 10000000,
                "current_savings": 2500000
            },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "last_login": null
        })
    }

    #[test]
    fn test_parse_nested_user() {
        let user = User::from_json(&sample());
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.profile.semester, 5);
        assert!(!user.preferences.notifications_enabled);
        assert_eq!(user.preferences.currency, "IDR");
        assert_eq!(user.financial_settings.monthly_budget, 2_500_000.0);
        assert_eq!(user.financial_settings.savings_progress(), 25.0);
        assert!(user.has_completed_profile());
        assert_eq!(user.initials(), "BS");
        assert_eq!(user.last_login, None);
    }

    #[test]
    fn test_partial_user_defaults() {
        let user = User::from_json(&json!({
            "email": "admin@lunance.id",
            "role": "superuser",
            "profile": "none",
            "preferences": null
        }));
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.display_name(), "admin");
        assert_eq!(user.profile, UserProfile::default());
        assert!(user.preferences.notifications_enabled);
        assert!(!user.has_completed_profile());
    }

    #[test]
    fn test_admin_profile_is_always_complete() {
        let user = User::from_json(&json!({"role": "admin", "full_name": "Admin"}));
        assert!(user.is_admin());
        assert!(user.has_completed_profile());
        assert_eq!(user.role.display_name(), "Administrator");
    }

    #[test]
    fn test_legacy_name_key() {
        let user = User::from_json(&json!({"nama_lengkap": "Siti Aminah"}));
        assert_eq!(user.full_name, "Siti Aminah");

        let both = User::from_json(&json!({"full_name": "A", "nama_lengkap": "B"}));
        assert_eq!(both.full_name, "A");
    }

    #[test]
    fn test_round_trip() {
        let user = User::from_json(&sample());
        let again = User::from_json(&serde_json::to_value(&user).unwrap());
        assert_eq!(again, user);
    }

    #[test]
    fn test_profile_update_skips_unset() {
        let update = ProfileUpdate {
            semester: Some(3),
            ..ProfileUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"semester": 3}));
    }
}

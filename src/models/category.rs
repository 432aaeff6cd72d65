use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_from_json;
use crate::utils::json::lenient;

pub const DEFAULT_CATEGORY_COLOR: &str = "#9E9E9E";

/// Global categories are shared by every user and have no owner; personal
/// categories always carry the owner's id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub icon: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub is_global: bool,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub user_id: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", deserialize_with = "lenient::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn has_consistent_owner(&self) -> bool {
        if self.is_global {
            self.user_id.is_none()
        } else {
            self.user_id.is_some()
        }
    }

    /// Personal categories can be edited by their owner; global ones only by
    /// an administrator.
    pub fn is_editable_by(&self, user_id: &str, is_admin: bool) -> bool {
        if self.is_global {
            is_admin
        } else {
            self.user_id.as_deref() == Some(user_id)
        }
    }

    pub fn scope_label(&self) -> &'static str {
        if self.is_global {
            "Global"
        } else {
            "Pribadi"
        }
    }

    /// Parses `#RRGGBB`, falling back to the neutral default color.
    pub fn color_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.color)
            .or_else(|| parse_hex_color(DEFAULT_CATEGORY_COLOR))
            .unwrap_or((0x9E, 0x9E, 0x9E))
    }
}

pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Splits a mixed list into (global, personal), keeping order.
pub fn partition_by_scope(categories: &[Category]) -> (Vec<Category>, Vec<Category>) {
    categories.iter().cloned().partition(|c| c.is_global)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCreate {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl_from_json!(Category);

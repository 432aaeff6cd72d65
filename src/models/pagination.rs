use serde::Serialize;
use serde_json::Value;

use crate::utils::json::{safe_bool, safe_int, FromJson};

pub const DEFAULT_PER_PAGE: u32 = 20;

/// `{items, total, page, per_page, total_pages, has_next, has_prev}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total_pages: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

impl<T> Paginated<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_page(&self) -> Option<u32> {
        self.page.checked_add(1).filter(|_| self.has_next)
    }

    pub fn prev_page(&self) -> Option<u32> {
        (self.has_prev && self.page > 1).then(|| self.page - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl<T: FromJson> FromJson for Paginated<T> {
    fn from_json(value: &Value) -> Self {
        // A bare array is a single, complete page.
        if let Value::Array(_) = value {
            let items = Vec::<T>::from_json(value);
            let count = items.len() as u32;
            return Paginated {
                total: u64::from(count),
                per_page: count.max(1),
                total_pages: u32::from(count > 0),
                items,
                ..Paginated::default()
            };
        }

        let page = to_u32(safe_int(&value["page"], 1)).max(1);
        let per_page = to_u32(safe_int(&value["per_page"], i64::from(DEFAULT_PER_PAGE))).max(1);
        let total = safe_int(&value["total"], 0).max(0) as u64;
        let computed_pages = total.div_ceil(u64::from(per_page));
        let total_pages = to_u32(safe_int(&value["total_pages"], computed_pages as i64));

        Paginated {
            items: Vec::<T>::from_json(&value["items"]),
            total,
            page,
            per_page,
            total_pages,
            has_next: safe_bool(&value["has_next"], page < total_pages),
            has_prev: safe_bool(&value["has_prev"], page > 1),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::db::models::{ListQuery, SortField, SortOrder};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Listing parameters exactly as they arrive on the query string
///
/// Everything is kept as text so a bad value is coerced, never rejected.
#[derive(Debug, Default, Deserialize)]
pub struct RawListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Normalized listing request plus the page number it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedList {
    pub page: i64,
    pub query: ListQuery,
}

/// Echo of the effective listing parameters
#[derive(Debug, Serialize, PartialEq)]
pub struct ListMeta {
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "sortBy")]
    pub sort_by: &'static str,
    pub order: &'static str,
    pub search: String,
}

impl NormalizedList {
    pub fn meta(&self) -> ListMeta {
        ListMeta {
            page: self.page,
            limit: self.query.limit,
            sort_by: self.query.sort_by.column(),
            order: self.query.order.keyword(),
            search: self.query.search.clone(),
        }
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

pub fn normalize_sort_field(raw: Option<&str>) -> SortField {
    raw.and_then(SortField::from_column).unwrap_or_default()
}

pub fn normalize_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some(o) if o.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    }
}

/// Coerce untrusted listing input into safe values
pub fn normalize(raw: &RawListParams) -> NormalizedList {
    let page = parse_or(raw.page.as_deref(), DEFAULT_PAGE).max(1);
    let limit = parse_or(raw.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = (page - 1).saturating_mul(limit).max(0);

    NormalizedList {
        page,
        query: ListQuery {
            search: raw.search.clone().unwrap_or_default(),
            sort_by: normalize_sort_field(raw.sort_by.as_deref()),
            order: normalize_order(raw.order.as_deref()),
            limit,
            offset,
        },
    }
}

//! Response envelope shapes shared by every endpoint

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, FieldError, Result};

/// Key under which list endpoints report paging state
pub const PAGINATION_KEY: &str = "pagination";

/// `{success, message, data}` wrapper returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    /// Whether the backend considers the call successful
    #[serde(default)]
    pub success: bool,

    /// Optional human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Payload
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Validation problems, present on some 400 answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    /// A successful envelope around `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    /// Take the payload, failing when the envelope carried none
    pub fn into_data(self) -> Result<T> {
        let message = self.message;
        self.data.ok_or_else(|| {
            Error::envelope(message.unwrap_or_else(|| "response has no data".to_string()))
        })
    }
}

/// Paging state attached to list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            has_next_page: false,
            has_prev_page: false,
            limit: 10,
        }
    }
}

impl Pagination {
    /// Derive paging state for `total_items` split into pages of `limit`
    pub fn compute(current_page: u32, limit: u32, total_items: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = (total_items.div_ceil(u64::from(limit))).max(1) as u32;
        let current_page = current_page.clamp(1, total_pages);
        Self {
            current_page,
            total_pages,
            total_items,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
            limit,
        }
    }
}

/// A list page pulled out of a `data` object
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    /// Name of the key the list was found under, e.g. `vehicles`
    pub resource_key: String,
    pub items: Vec<Value>,
    pub pagination: Pagination,
}

/// Pull the record list and paging state out of a list response's `data`.
///
/// The list lives under the first key that is not `pagination`, whatever its
/// name. A `data` object with no such key is rejected; when several exist the
/// first one in document order is used.
pub fn extract_list(data: &Value) -> Result<ListPage> {
    let object = data
        .as_object()
        .ok_or_else(|| Error::envelope("list response data is not an object"))?;

    let mut candidates = object.iter().filter(|(key, _)| key.as_str() != PAGINATION_KEY);
    let (resource_key, list) = candidates
        .next()
        .ok_or_else(|| Error::envelope("list response data has no resource key"))?;

    let extra: Vec<&str> = candidates.map(|(key, _)| key.as_str()).collect();
    if !extra.is_empty() {
        warn!(
            "list response carries several resource keys, using '{}' and ignoring {:?}",
            resource_key, extra
        );
    }

    let items = match list {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => {
            return Err(Error::envelope(format!(
                "'{}' is not a list (found {})",
                resource_key,
                json_kind(other)
            )))
        }
    };

    let pagination = match object.get(PAGINATION_KEY) {
        Some(Value::Null) | None => Pagination::default(),
        Some(value) => serde_json::from_value(value.clone())?,
    };

    Ok(ListPage {
        resource_key: resource_key.clone(),
        items,
        pagination,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_under_any_resource_key() {
        for key in ["vehicles", "drivers", "fuelLogs"] {
            let data = json!({
                key: [{"id": "1"}, {"id": "2"}],
                "pagination": {"currentPage": 1, "totalPages": 3, "totalItems": 25,
                               "hasNextPage": true, "hasPrevPage": false, "limit": 10}
            });
            let page = extract_list(&data).unwrap();
            assert_eq!(page.resource_key, key);
            assert_eq!(page.items.len(), 2);
            assert_eq!(page.pagination.total_pages, 3);
            assert!(page.pagination.has_next_page);
        }
    }

    #[test]
    fn pagination_key_may_come_first() {
        let data = json!({
            "pagination": {"currentPage": 2},
            "trips": [{"id": "t1"}]
        });
        let page = extract_list(&data).unwrap();
        assert_eq!(page.resource_key, "trips");
        assert_eq!(page.pagination.current_page, 2);
    }

    #[test]
    fn first_key_wins_when_ambiguous() {
        let data = json!({"alerts": [{"id": "a"}], "summary": []});
        let page = extract_list(&data).unwrap();
        assert_eq!(page.resource_key, "alerts");
    }

    #[test]
    fn no_resource_key_is_an_error() {
        let data = json!({"pagination": {}});
        assert!(matches!(extract_list(&data), Err(Error::Envelope(_))));
    }

    #[test]
    fn compute_pagination_bounds() {
        let p = Pagination::compute(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page && p.has_prev_page);

        let empty = Pagination::compute(5, 10, 0);
        assert_eq!(empty.current_page, 1);
        assert!(!empty.has_next_page);
    }
}

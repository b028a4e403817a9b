//! Wire shapes that only exist on the HTTP boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use smartfood_inventory::StoredItem;

use crate::error::ApiError;

/// `GET /list_items` answers with a bare array or an object wrapping `items`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Bare(Vec<StoredItem>),
    Wrapped { items: Vec<StoredItem> },
}

/// Normalize a list response body to the fetched sequence, keeping order.
pub fn normalize_list(body: Value) -> Result<Vec<StoredItem>, ApiError> {
    match serde_json::from_value::<ListResponse>(body) {
        Ok(ListResponse::Bare(items)) | Ok(ListResponse::Wrapped { items }) => Ok(items),
        Err(e) => Err(ApiError::Malformed(format!("unexpected list_items body: {e}"))),
    }
}

/// Body of `POST /consume_item/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumeRequest {
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn rows() -> Value {
        json!([
            {"id": 1, "name": "milk", "days_left": 2},
            {"id": 2, "name": "rice", "days_left": null},
            {"id": 3, "name": "beef", "days_left": "Expired"},
        ])
    }

    #[test]
    fn bare_and_wrapped_bodies_normalize_identically() {
        let bare = normalize_list(rows()).unwrap();
        let wrapped = normalize_list(json!({"items": rows(), "count": 3})).unwrap();
        assert_eq!(bare, wrapped);
        let names: Vec<&str> = bare.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "rice", "beef"]);
    }

    #[test]
    fn other_shapes_are_malformed() {
        for body in [json!({"rows": []}), json!("nope"), Value::Null, json!([{"name": "no id"}])] {
            assert!(matches!(normalize_list(body), Err(ApiError::Malformed(_))));
        }
    }

    proptest! {
        /// Property: wrapping never changes the normalized contents.
        #[test]
        fn wrapper_is_transparent(names in prop::collection::vec("[a-z]{1,10}", 0..20)) {
            let items: Vec<Value> = names
                .iter()
                .enumerate()
                .map(|(i, n)| json!({"id": i, "name": n}))
                .collect();
            let bare = normalize_list(Value::Array(items.clone())).unwrap();
            let wrapped = normalize_list(json!({"items": items})).unwrap();
            prop_assert_eq!(bare, wrapped);
        }
    }
}

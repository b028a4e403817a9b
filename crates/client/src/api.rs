//! The service seam: everything the assistant asks of the backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use smartfood_core::ItemId;
use smartfood_inventory::{ItemRecord, Prediction, PredictionRequest, StoredItem};

use crate::error::ApiResult;

/// Calls against the prediction/storage service.
///
/// Every method is a single round-trip with no retry; failures come back as
/// [`crate::ApiError`] for the caller to surface.
#[async_trait]
pub trait PantryApi: Send + Sync {
    /// `POST /predict`
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<Prediction>;

    /// `POST /add_item`
    async fn add_item(&self, record: &ItemRecord) -> ApiResult<SavedItem>;

    /// `GET /list_items`, normalized to the fetch order.
    async fn list_items(&self) -> ApiResult<Vec<StoredItem>>;

    /// `DELETE /delete_item/{id}`
    async fn delete_item(&self, id: &ItemId) -> ApiResult<()>;

    /// `POST /consume_item/{id}`
    async fn consume_item(&self, id: &ItemId, amount: f64) -> ApiResult<()>;

    /// `PUT /update_item/{id}` with the full record.
    async fn update_item(&self, id: &ItemId, record: &ItemRecord) -> ApiResult<()>;
}

#[async_trait]
impl<T: PantryApi + ?Sized> PantryApi for Arc<T> {
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<Prediction> {
        (**self).predict(request).await
    }

    async fn add_item(&self, record: &ItemRecord) -> ApiResult<SavedItem> {
        (**self).add_item(record).await
    }

    async fn list_items(&self) -> ApiResult<Vec<StoredItem>> {
        (**self).list_items().await
    }

    async fn delete_item(&self, id: &ItemId) -> ApiResult<()> {
        (**self).delete_item(id).await
    }

    async fn consume_item(&self, id: &ItemId, amount: f64) -> ApiResult<()> {
        (**self).consume_item(id, amount).await
    }

    async fn update_item(&self, id: &ItemId, record: &ItemRecord) -> ApiResult<()> {
        (**self).update_item(id, record).await
    }
}

/// What `add_item` acknowledged.
///
/// The service may echo the created record or just acknowledge; the id is
/// picked up when present under `id` or `item_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedItem {
    pub id: Option<ItemId>,
    pub body: Value,
}

impl SavedItem {
    pub fn from_body(body: Value) -> Self {
        let id = ["id", "item_id"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(|v| serde_json::from_value::<ItemId>(v.clone()).ok());
        Self { id, body }
    }
}

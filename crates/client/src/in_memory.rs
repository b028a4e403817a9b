//! In-memory pantry backend for tests/dev.
//!
//! Mirrors the storage service closely enough to drive the assistant end to
//! end without a network: sequential integer ids, consume clamps at zero,
//! `days_left` derived from `expiry_on` on every list.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use smartfood_core::ItemId;
use smartfood_inventory::{DaysLeft, ItemRecord, Prediction, PredictionRequest, StoredItem};

use crate::api::{PantryApi, SavedItem};
use crate::error::{ApiError, ApiResult};

/// One call received by the in-memory backend, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Predict(PredictionRequest),
    AddItem(ItemRecord),
    ListItems,
    DeleteItem(ItemId),
    ConsumeItem(ItemId, f64),
    UpdateItem(ItemId, ItemRecord),
}

#[derive(Debug)]
struct State {
    items: Vec<(i64, ItemRecord)>,
    next_id: i64,
    calls: Vec<RecordedCall>,
    prediction_days: f64,
    failure: Option<ApiError>,
    today: NaiveDate,
}

#[derive(Debug)]
pub struct InMemoryPantry {
    state: Mutex<State>,
}

impl InMemoryPantry {
    /// An empty pantry whose `days_left` values are computed against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(State {
                items: Vec::new(),
                next_id: 1,
                calls: Vec::new(),
                prediction_days: 7.0,
                failure: None,
                today,
            }),
        }
    }

    /// Shelf life answered by `predict`.
    pub fn with_prediction_days(self, days: f64) -> Self {
        self.lock().prediction_days = days;
        self
    }

    /// Store a record directly, bypassing the call log.
    pub fn seed(&self, record: ItemRecord) -> ItemId {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.items.push((id, record));
        ItemId::Numeric(id)
    }

    /// Make every subsequent call fail with `err` (calls are still recorded).
    pub fn fail_with(&self, err: ApiError) {
        self.lock().failure = Some(err);
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn records(&self) -> Vec<ItemRecord> {
        self.lock().items.iter().map(|(_, r)| r.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the log from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call, then apply the configured failure if any.
    fn begin(&self, call: RecordedCall) -> ApiResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(err) = state.failure.clone() {
            return Err(err);
        }
        Ok(state)
    }
}

fn not_found(id: &ItemId) -> ApiError {
    ApiError::Status {
        status: 404,
        body: json!({"detail": format!("item {id} not found")}).to_string(),
    }
}

fn position(state: &State, id: &ItemId) -> Option<usize> {
    match id {
        ItemId::Numeric(n) => state.items.iter().position(|(row, _)| row == n),
        ItemId::Text(_) => None,
    }
}

#[async_trait]
impl PantryApi for InMemoryPantry {
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<Prediction> {
        let state = self.begin(RecordedCall::Predict(request.clone()))?;
        Ok(Prediction::new(state.prediction_days)?)
    }

    async fn add_item(&self, record: &ItemRecord) -> ApiResult<SavedItem> {
        let mut state = self.begin(RecordedCall::AddItem(record.clone()))?;
        let id = state.next_id;
        state.next_id += 1;
        state.items.push((id, record.clone()));
        Ok(SavedItem::from_body(json!({"id": id, "status": "ok"})))
    }

    async fn list_items(&self) -> ApiResult<Vec<StoredItem>> {
        let state = self.begin(RecordedCall::ListItems)?;
        Ok(state
            .items
            .iter()
            .map(|(id, r)| StoredItem {
                id: ItemId::Numeric(*id),
                name: r.name.clone(),
                category: r.category.clone(),
                location: Some(r.location.clone()),
                qty: r.qty,
                unit: Some(r.unit.clone()),
                purchased_on: r.purchased_on,
                expiry_on: r.expiry_on,
                source: r.source.clone(),
                notes: r.notes.clone(),
                days_left: DaysLeft::until(r.expiry_on, state.today),
            })
            .collect())
    }

    async fn delete_item(&self, id: &ItemId) -> ApiResult<()> {
        let mut state = self.begin(RecordedCall::DeleteItem(id.clone()))?;
        let idx = position(&state, id).ok_or_else(|| not_found(id))?;
        state.items.remove(idx);
        Ok(())
    }

    async fn consume_item(&self, id: &ItemId, amount: f64) -> ApiResult<()> {
        let mut state = self.begin(RecordedCall::ConsumeItem(id.clone(), amount))?;
        let idx = position(&state, id).ok_or_else(|| not_found(id))?;
        let record = &mut state.items[idx].1;
        record.qty = (record.qty - amount).max(0.0);
        Ok(())
    }

    async fn update_item(&self, id: &ItemId, record: &ItemRecord) -> ApiResult<()> {
        let mut state = self.begin(RecordedCall::UpdateItem(id.clone(), record.clone()))?;
        let idx = position(&state, id).ok_or_else(|| not_found(id))?;
        state.items[idx].1 = record.clone();
        Ok(())
    }
}

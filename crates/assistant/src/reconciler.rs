//! Inventory view kept consistent with the server.
//!
//! The view never edits its list locally: every successful mutation is
//! followed by a full re-fetch, and the fetched list replaces the old one.
//! Urgency ordering is a derived copy; the fetched order is kept.

use smartfood_client::{ApiError, PantryApi};
use smartfood_core::{DomainError, ItemId};
use smartfood_inventory::{ItemRecord, StoredItem, sort_by_urgency};

use crate::dialog::Dialogs;
use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Loaded,
}

/// Outcome of a mutation that asks the user first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// The user declined or cancelled; nothing was sent.
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(#[from] DomainError),
    #[error("item {0} is not in the current list")]
    UnknownItem(ItemId),
    #[error("no item is being edited")]
    NotEditing,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Text fields of the inline edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub name: String,
    pub qty: String,
}

/// An item being edited, with the values it had when editing began.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    original: StoredItem,
    pub form: EditForm,
}

impl EditSession {
    fn new(original: StoredItem) -> Self {
        let form = EditForm {
            name: original.name.clone(),
            qty: original.qty.to_string(),
        };
        Self { original, form }
    }

    pub fn item(&self) -> &StoredItem {
        &self.original
    }

    pub fn id(&self) -> &ItemId {
        &self.original.id
    }

    /// Full replacement record: edited name and qty, everything else carried over.
    pub fn to_record(&self) -> Result<ItemRecord, InventoryError> {
        let name = self.form.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name must not be empty").into());
        }
        let qty = parse_quantity(&self.form.qty)?;

        let mut record = self.original.to_record();
        record.name = name.to_string();
        record.qty = qty;
        Ok(record)
    }
}

fn parse_quantity(text: &str) -> Result<f64, InventoryError> {
    match text.trim().parse::<f64>() {
        Ok(qty) if qty.is_finite() && qty >= 0.0 => Ok(qty),
        _ => Err(DomainError::validation(format!(
            "quantity must be a non-negative number (got {:?})",
            text.trim()
        ))
        .into()),
    }
}

/// Parse a consume answer. `Ok(None)` means abort without a request.
fn parse_amount(answer: Option<&str>) -> Result<Option<f64>, InventoryError> {
    let Some(text) = answer.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(amount) if amount == 0.0 || amount.is_nan() => Ok(None),
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(Some(amount)),
        _ => Err(DomainError::validation(format!(
            "amount must be a positive number (got {text:?})"
        ))
        .into()),
    }
}

/// The inventory list as last fetched from the server.
pub struct InventoryView<A> {
    api: A,
    items: Vec<StoredItem>,
    loading: bool,
    sort_by_urgency: bool,
    editing: Option<EditSession>,
    notice: Option<Notice>,
}

impl<A: PantryApi> InventoryView<A> {
    /// An empty view. Nothing is fetched until [`InventoryView::refresh`].
    pub fn new(api: A) -> Self {
        Self {
            api,
            items: Vec::new(),
            loading: false,
            sort_by_urgency: false,
            editing: None,
            notice: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Items in fetch order.
    pub fn items(&self) -> &[StoredItem] {
        &self.items
    }

    pub fn item(&self, id: &ItemId) -> Option<&StoredItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items as displayed: fetch order, or soonest-expiring first when
    /// sorting by urgency is on.
    pub fn visible_items(&self) -> Vec<&StoredItem> {
        if self.sort_by_urgency {
            sort_by_urgency(&self.items, |item| &item.days_left)
        } else {
            self.items.iter().collect()
        }
    }

    pub fn phase(&self) -> ListPhase {
        if self.loading {
            ListPhase::Loading
        } else {
            ListPhase::Loaded
        }
    }

    pub fn is_sorted_by_urgency(&self) -> bool {
        self.sort_by_urgency
    }

    pub fn set_sort_by_urgency(&mut self, on: bool) {
        self.sort_by_urgency = on;
    }

    pub fn toggle_sort(&mut self) {
        self.sort_by_urgency = !self.sort_by_urgency;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Fetch the full list and replace the local one.
    ///
    /// On failure the list is emptied and an error notice is left.
    pub async fn refresh(&mut self) -> Result<usize, InventoryError> {
        self.loading = true;
        let outcome = self.api.list_items().await;
        self.loading = false;

        match outcome {
            Ok(items) => {
                tracing::debug!(count = items.len(), "inventory fetched");
                self.items = items;
                Ok(self.items.len())
            }
            Err(err) => {
                tracing::warn!(error = %err, "fetching inventory failed");
                self.items.clear();
                self.notice = Some(Notice::from_api("loading the inventory", &err));
                Err(err.into())
            }
        }
    }

    /// Delete after a confirmation naming the item.
    pub async fn delete<D>(&mut self, id: &ItemId, dialogs: &D) -> Result<Mutation, InventoryError>
    where
        D: Dialogs + ?Sized,
    {
        let name = self.known_name(id)?;
        if !dialogs.confirm(&format!("Delete {name}?")).await {
            return Ok(Mutation::Cancelled);
        }

        self.loading = true;
        let outcome = self.api.delete_item(id).await;
        self.settle(outcome, "deleting the item", id).await
    }

    /// Consume after prompting for the amount used.
    ///
    /// A blank, cancelled or zero answer aborts without a request; anything
    /// else that is not a positive number is a validation error.
    pub async fn consume<D>(&mut self, id: &ItemId, dialogs: &D) -> Result<Mutation, InventoryError>
    where
        D: Dialogs + ?Sized,
    {
        let name = self.known_name(id)?;
        let answer = dialogs.prompt(&format!("How much {name} did you use?")).await;
        match parse_amount(answer.as_deref())? {
            Some(amount) => self.consume_amount(id, amount).await.map(|()| Mutation::Applied),
            None => Ok(Mutation::Cancelled),
        }
    }

    /// Consume a known amount without prompting.
    pub async fn consume_amount(&mut self, id: &ItemId, amount: f64) -> Result<(), InventoryError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation(format!(
                "amount must be a positive number (got {amount})"
            ))
            .into());
        }
        self.known_name(id)?;

        self.loading = true;
        let outcome = self.api.consume_item(id, amount).await;
        self.settle(outcome, "consuming the item", id).await.map(|_| ())
    }

    /// Start editing an item. Any edit already open is discarded.
    pub fn begin_edit(&mut self, id: &ItemId) -> Result<&mut EditSession, InventoryError> {
        let item = self
            .item(id)
            .cloned()
            .ok_or_else(|| InventoryError::UnknownItem(id.clone()))?;
        Ok(self.editing.insert(EditSession::new(item)))
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.editing.as_mut().map(|session| &mut session.form)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the full updated record and re-fetch.
    ///
    /// Invalid form values fail before any request. On a server failure the
    /// edit stays open.
    pub async fn save_edit(&mut self) -> Result<(), InventoryError> {
        let session = self.editing.as_ref().ok_or(InventoryError::NotEditing)?;
        let record = session.to_record()?;
        let id = session.id().clone();

        self.loading = true;
        let outcome = self.api.update_item(&id, &record).await;
        if outcome.is_ok() {
            self.editing = None;
        }
        self.settle(outcome, "saving the edit", &id).await.map(|_| ())
    }

    fn known_name(&self, id: &ItemId) -> Result<String, InventoryError> {
        self.item(id)
            .map(|item| item.name.clone())
            .ok_or_else(|| InventoryError::UnknownItem(id.clone()))
    }

    /// Re-fetch after a successful mutation; surface a failed one.
    async fn settle(
        &mut self,
        outcome: Result<(), ApiError>,
        action: &str,
        id: &ItemId,
    ) -> Result<Mutation, InventoryError> {
        match outcome {
            Ok(()) => {
                tracing::info!(%id, action, "mutation applied");
                self.refresh().await?;
                Ok(Mutation::Applied)
            }
            Err(err) => {
                self.loading = false;
                tracing::warn!(%id, action, error = %err, "mutation failed");
                self.notice = Some(Notice::from_api(action, &err));
                Err(err.into())
            }
        }
    }
}

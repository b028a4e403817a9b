//! End-to-end flows against a stateful HTTP backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

use smartfood_assistant::{
    ExpiryChoice, InventoryView, IntakeWizard, Mutation, ScriptedDialogs, StepKind,
};
use smartfood_client::{ClientConfig, HttpPantryApi};
use smartfood_core::ItemId;
use smartfood_inventory::{DaysLeft, FoodState, Packaging, StorageLocation};

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    body: Value,
}

struct Backend {
    items: Vec<(i64, Value)>,
    next_id: i64,
    seen: Vec<Seen>,
    prediction: Value,
    today: NaiveDate,
}

type Shared = Arc<Mutex<Backend>>;

fn record(state: &Shared, method: Method, path: String, body: Value) {
    state.lock().unwrap().seen.push(Seen { method, path, body });
}

fn days_left(item: &Value, today: NaiveDate) -> Value {
    let expiry = item
        .get("expiry_on")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    match expiry {
        None => Value::Null,
        Some(date) if date < today => json!("Expired"),
        Some(date) => json!((date - today).num_days()),
    }
}

async fn predict(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, Method::POST, "/predict".into(), body);
    Json(state.lock().unwrap().prediction.clone())
}

async fn add_item(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, Method::POST, "/add_item".into(), body.clone());
    let mut backend = state.lock().unwrap();
    let id = backend.next_id;
    backend.next_id += 1;
    backend.items.push((id, body));
    Json(json!({"status": "ok", "id": id}))
}

async fn list_items(State(state): State<Shared>) -> Json<Value> {
    record(&state, Method::GET, "/list_items".into(), Value::Null);
    let backend = state.lock().unwrap();
    let items: Vec<Value> = backend
        .items
        .iter()
        .map(|(id, item)| {
            let mut row = item.clone();
            row["id"] = json!(id);
            row["days_left"] = days_left(item, backend.today);
            row
        })
        .collect();
    Json(json!({ "items": items }))
}

fn missing(id: i64) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": format!("item {id} not found")}))).into_response()
}

async fn delete_item(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    record(&state, Method::DELETE, format!("/delete_item/{id}"), Value::Null);
    let mut backend = state.lock().unwrap();
    let before = backend.items.len();
    backend.items.retain(|(row, _)| *row != id);
    if backend.items.len() == before {
        return missing(id);
    }
    Json(json!({"status": "deleted"})).into_response()
}

async fn consume_item(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::POST, format!("/consume_item/{id}"), body.clone());
    let amount = body["amount"].as_f64().unwrap_or_default();
    let mut backend = state.lock().unwrap();
    let Some((_, item)) = backend.items.iter_mut().find(|(row, _)| *row == id) else {
        return missing(id);
    };
    let qty = item["qty"].as_f64().unwrap_or_default();
    item["qty"] = json!((qty - amount).max(0.0));
    Json(json!({"status": "ok"})).into_response()
}

async fn update_item(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::PUT, format!("/update_item/{id}"), body.clone());
    let mut backend = state.lock().unwrap();
    let Some((_, item)) = backend.items.iter_mut().find(|(row, _)| *row == id) else {
        return missing(id);
    };
    *item = body;
    Json(json!({"status": "updated"})).into_response()
}

struct TestServer {
    state: Shared,
    api: HttpPantryApi,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(today: NaiveDate, prediction: Value) -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend {
            items: Vec::new(),
            next_id: 1,
            seen: Vec::new(),
            prediction,
            today,
        }));
        let app = Router::new()
            .route("/predict", post(predict))
            .route("/add_item", post(add_item))
            .route("/list_items", get(list_items))
            .route("/delete_item/:id", delete(delete_item))
            .route("/consume_item/:id", post(consume_item))
            .route("/update_item/:id", put(update_item))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = HttpPantryApi::new(ClientConfig::new(format!("http://{addr}")).unwrap()).unwrap();
        Self { state, api, handle }
    }

    fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    fn clear_seen(&self) {
        self.state.lock().unwrap().seen.clear();
    }

    fn seed(&self, item: Value) -> ItemId {
        let mut backend = self.state.lock().unwrap();
        let id = backend.next_id;
        backend.next_id += 1;
        backend.items.push((id, item));
        ItemId::Numeric(id)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn now() -> NaiveDateTime {
    today().and_hms_opt(18, 45, 0).unwrap()
}

fn milk() -> Value {
    json!({
        "name": "milk",
        "category": "dairy",
        "qty": 2.0,
        "unit": "l",
        "location": "Fridge",
        "purchased_on": "2025-03-08",
        "expiry_on": "2025-03-12",
        "source": "manual",
        "notes": null
    })
}

async fn wizard_through_state(server: &TestServer, name: &str) -> IntakeWizard {
    let mut wizard = IntakeWizard::new();
    wizard.submit_name(name).unwrap();
    wizard.confirm_category(true).unwrap();
    wizard.choose_location(StorageLocation::Fridge).unwrap();
    wizard.choose_packaging(Packaging::Sealed).unwrap();
    let _ = wizard.choose_state(FoodState::Raw, &server.api, now()).await;
    wizard
}

#[tokio::test]
async fn chicken_breast_is_predicted_saved_and_listed() {
    let server = TestServer::spawn(today(), json!({"predicted_shelf_life_days": 5})).await;

    let mut wizard = wizard_through_state(&server, "chicken breast").await;
    assert_eq!(wizard.step_kind(), StepKind::Done);

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/predict");
    assert_eq!(
        seen[0].body,
        json!({
            "category": "meat",
            "location": "Fridge",
            "packaging": "sealed",
            "state": "raw",
            "temperature": 4.0
        })
    );

    let expected_expiry = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    assert_eq!(wizard.summary().unwrap().predicted_expiry, expected_expiry);

    let saved = wizard
        .commit(ExpiryChoice::Predicted, &server.api, today())
        .await
        .unwrap();
    assert_eq!(saved.id, Some(ItemId::Numeric(1)));

    let add = &server.seen()[1];
    assert_eq!(add.method, Method::POST);
    assert_eq!(add.path, "/add_item");
    assert_eq!(add.body["name"], "chicken breast");
    assert_eq!(add.body["category"], "meat");
    assert_eq!(add.body["qty"], 1.0);
    assert_eq!(add.body["unit"], "pcs");
    assert_eq!(add.body["location"], "Fridge");
    assert_eq!(add.body["purchased_on"], "2025-03-10");
    assert_eq!(add.body["expiry_on"], "2025-03-15");
    assert_eq!(add.body["source"], "wizard");
    assert!(add.body["notes"].as_str().unwrap().contains('5'));

    // Round-trip: the saved item comes back on the next fetch.
    let mut view = InventoryView::new(server.api.clone());
    view.refresh().await.unwrap();
    let item = &view.items()[0];
    assert_eq!(item.name, "chicken breast");
    assert_eq!(item.expiry_on, Some(expected_expiry));
    assert_eq!(item.days_left, DaysLeft::Remaining(5.0));
}

#[tokio::test]
async fn predictor_error_returns_to_state_without_saving() {
    let server = TestServer::spawn(today(), json!({"error": "model not loaded"})).await;

    let wizard = wizard_through_state(&server, "milk").await;

    assert_eq!(wizard.step_kind(), StepKind::State);
    assert!(!wizard.is_busy());
    assert!(wizard.notice().is_some_and(|n| n.is_error()));
    let paths: Vec<_> = server.seen().into_iter().map(|s| s.path).collect();
    assert_eq!(paths, ["/predict"]);
}

#[tokio::test]
async fn cancelled_consume_issues_no_request() {
    let server = TestServer::spawn(today(), Value::Null).await;
    let id = server.seed(milk());
    let mut view = InventoryView::new(server.api.clone());
    view.refresh().await.unwrap();
    server.clear_seen();

    let dialogs = ScriptedDialogs::new().answering(None);
    assert_eq!(view.consume(&id, &dialogs).await.unwrap(), Mutation::Cancelled);
    assert!(server.seen().is_empty());
}

#[tokio::test]
async fn consume_posts_amount_then_refetches() {
    let server = TestServer::spawn(today(), Value::Null).await;
    let id = server.seed(milk());
    let mut view = InventoryView::new(server.api.clone());
    view.refresh().await.unwrap();
    server.clear_seen();

    let dialogs = ScriptedDialogs::new().answering(Some("0.5"));
    assert_eq!(view.consume(&id, &dialogs).await.unwrap(), Mutation::Applied);

    let seen = server.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].path, "/consume_item/1");
    assert_eq!(seen[0].body, json!({"amount": 0.5}));
    assert_eq!(seen[1].path, "/list_items");
    assert_eq!(view.item(&id).map(|i| i.qty), Some(1.5));
    assert_eq!(view.item(&id).map(|i| i.days_left), Some(DaysLeft::Remaining(2.0)));
}

#[tokio::test]
async fn edit_puts_the_full_record() {
    let server = TestServer::spawn(today(), Value::Null).await;
    let id = server.seed(milk());
    let mut view = InventoryView::new(server.api.clone());
    view.refresh().await.unwrap();
    server.clear_seen();

    let session = view.begin_edit(&id).unwrap();
    session.form.name = "whole milk".into();
    session.form.qty = "1".into();
    view.save_edit().await.unwrap();

    let seen = server.seen();
    assert_eq!(seen[0].method, Method::PUT);
    assert_eq!(seen[0].path, "/update_item/1");
    assert_eq!(
        seen[0].body,
        json!({
            "name": "whole milk",
            "category": "dairy",
            "qty": 1.0,
            "unit": "l",
            "location": "Fridge",
            "purchased_on": "2025-03-08",
            "expiry_on": "2025-03-12",
            "source": "manual",
            "notes": null
        })
    );
    assert_eq!(view.item(&id).map(|i| i.name.as_str()), Some("whole milk"));
}

#[tokio::test]
async fn confirmed_delete_removes_the_item_after_refetch() {
    let server = TestServer::spawn(today(), Value::Null).await;
    let id = server.seed(milk());
    let mut view = InventoryView::new(server.api.clone());
    view.refresh().await.unwrap();

    let dialogs = ScriptedDialogs::new().confirming(true);
    assert_eq!(view.delete(&id, &dialogs).await.unwrap(), Mutation::Applied);
    assert!(view.items().is_empty());

    // A second delete of the same id is refused locally: it is no longer listed.
    server.clear_seen();
    assert!(view.delete(&id, &dialogs).await.is_err());
    assert!(server.seen().is_empty());
}

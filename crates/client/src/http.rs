//! reqwest-backed implementation of [`PantryApi`].

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use smartfood_core::ItemId;
use smartfood_inventory::{ItemRecord, Prediction, PredictionRequest, StoredItem};

use crate::api::{PantryApi, SavedItem};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::wire::{ConsumeRequest, normalize_list};

/// HTTP client for the prediction/storage service.
///
/// Holds one connection pool for its lifetime. Every request carries the
/// configured timeout, so a hung backend surfaces as [`ApiError::Timeout`]
/// instead of an endless loading state.
#[derive(Debug, Clone)]
pub struct HttpPantryApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpPantryApi {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self
            .config
            .endpoint(path)
            .map_err(|e| ApiError::Network(format!("invalid request URL for {path}: {e}")))?;
        let mut req = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.config.token() {
            req = req.bearer_auth(token);
        }

        Ok(req)
    }

    /// Send and reject non-2xx answers.
    async fn send(&self, req: RequestBuilder) -> ApiResult<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.config.timeout()))?;

        let status = resp.status();
        tracing::debug!(url = %resp.url(), status = status.as_u16(), "backend responded");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        Ok(resp)
    }

    /// Read a JSON body; an empty body reads as `null`.
    async fn json_body(&self, resp: Response) -> ApiResult<Value> {
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.config.timeout()))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Malformed(format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl PantryApi for HttpPantryApi {
    async fn predict(&self, request: &PredictionRequest) -> ApiResult<Prediction> {
        let resp = self.send(self.request(Method::POST, "/predict")?.json(request)).await?;
        let body = self.json_body(resp).await?;
        Ok(Prediction::from_json(&body)?)
    }

    async fn add_item(&self, record: &ItemRecord) -> ApiResult<SavedItem> {
        let resp = self.send(self.request(Method::POST, "/add_item")?.json(record)).await?;
        let body = self.json_body(resp).await?;
        Ok(SavedItem::from_body(body))
    }

    async fn list_items(&self) -> ApiResult<Vec<StoredItem>> {
        let resp = self.send(self.request(Method::GET, "/list_items")?).await?;
        let body = self.json_body(resp).await?;
        normalize_list(body)
    }

    async fn delete_item(&self, id: &ItemId) -> ApiResult<()> {
        let path = format!("/delete_item/{}", id.as_path_segment());
        self.send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    async fn consume_item(&self, id: &ItemId, amount: f64) -> ApiResult<()> {
        let path = format!("/consume_item/{}", id.as_path_segment());
        let body = ConsumeRequest { amount };
        self.send(self.request(Method::POST, &path)?.json(&body)).await?;
        Ok(())
    }

    async fn update_item(&self, id: &ItemId, record: &ItemRecord) -> ApiResult<()> {
        let path = format!("/update_item/{}", id.as_path_segment());
        self.send(self.request(Method::PUT, &path)?.json(record)).await?;
        Ok(())
    }
}

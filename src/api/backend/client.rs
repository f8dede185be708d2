use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::ApiError;
use super::Backend;
use crate::models::{
    BalanceSnapshot, Coin, CoinListResponse, CreateCoinRequest, Cursor, OhlcvResponse, OhlcvRow,
    Page, Transaction,
};
use crate::utils::extract_clean_error;

/// HTTP client for the trading backend's `/api/v1` routes
pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    const API_PREFIX: &'static str = "/api/v1";

    /// Create a client for the backend at `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .default_headers(Self::create_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: format!("{}{}", base_url.trim_end_matches('/'), Self::API_PREFIX),
        })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query string for a paged request. The cursor is omitted on the first page.
    fn page_query(cursor: Option<&Cursor>, limit: u32) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(2);
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        query.push(("limit", limit.to_string()));
        query
    }

    /// Map a reqwest transport error
    fn transport_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else {
            ApiError::RequestError(format!("Request failed: {}", e))
        }
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let message = extract_clean_error(&body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            422 => ApiError::Unprocessable(message),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    /// Send a request and check the status, discarding the body
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(Self::transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(response)
    }

    /// Send a request and decode the JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    /// GET /my/coins
    async fn list_tracked_coins(&self) -> Result<Vec<Coin>, ApiError> {
        let response: CoinListResponse = self
            .send_json(self.http_client.get(self.url("/my/coins")))
            .await?;
        Ok(response.items)
    }

    /// POST /my/coins
    async fn add_tracked_coin(&self, name: &str) -> Result<(), ApiError> {
        let body = CreateCoinRequest {
            name: name.to_string(),
        };
        self.send(self.http_client.post(self.url("/my/coins")).json(&body))
            .await?;
        Ok(())
    }

    /// DELETE /my/coins/{coin_id}
    async fn remove_tracked_coin(&self, coin_id: i64) -> Result<(), ApiError> {
        self.send(
            self.http_client
                .delete(self.url(&format!("/my/coins/{}", coin_id))),
        )
        .await?;
        Ok(())
    }

    /// GET /coins/{coin_name}
    async fn get_price_series(&self, coin_name: &str) -> Result<Vec<OhlcvRow>, ApiError> {
        debug!("Fetching price series for {}", coin_name);
        let response: OhlcvResponse = self
            .send_json(self.http_client.get(self.url(&format!("/coins/{}", coin_name))))
            .await?;
        Ok(response.items)
    }

    /// POST /trade
    async fn execute_trade_cycle(&self) -> Result<(), ApiError> {
        self.send(self.http_client.post(self.url("/trade"))).await?;
        Ok(())
    }

    /// GET /trade/transactions?cursor=&limit=
    async fn get_transactions(
        &self,
        cursor: Option<&Cursor>,
        limit: u32,
    ) -> Result<Page<Transaction>, ApiError> {
        self.send_json(
            self.http_client
                .get(self.url("/trade/transactions"))
                .query(&Self::page_query(cursor, limit)),
        )
        .await
    }

    /// GET /balance/history?cursor=&limit=
    async fn get_balance_history(
        &self,
        cursor: Option<&Cursor>,
        limit: u32,
    ) -> Result<Page<BalanceSnapshot>, ApiError> {
        self.send_json(
            self.http_client
                .get(self.url("/balance/history"))
                .query(&Self::page_query(cursor, limit)),
        )
        .await
    }
}

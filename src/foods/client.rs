//! HTTP client for the USDA FoodData Central API.
//!
//! One request per call: no retry, caching or rate limiting. Every endpoint
//! takes the API key as the `api_key` parameter.

use async_trait::async_trait;
use tracing::{debug, error};

use super::dto::{Food, FoodsByIdRequest, SearchResult};
use crate::config::FoodDataConfig;
use crate::error::RequestError;

const SEARCH_DATA_TYPES: &str = "Foundation,SR Legacy,Survey (FNDDS),Branded";

/// Food catalog lookups. `AppState` holds this behind an `Arc<dyn _>` so
/// tests can swap in a canned catalog.
#[async_trait]
pub trait FoodLookup: Send + Sync {
    /// `page` is 1-indexed.
    async fn search(&self, query: &str, page: u32, page_size: u32)
        -> Result<SearchResult, RequestError>;
    async fn get_food(&self, fdc_id: u64) -> Result<Food, RequestError>;
    async fn get_foods(&self, fdc_ids: &[u64]) -> Result<Vec<Food>, RequestError>;
}

#[derive(Clone)]
pub struct FoodDataClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FoodDataClient {
    pub fn new(config: &FoodDataConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &FoodDataConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RequestError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, endpoint, "food lookup transport failure");
            RequestError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            error!(status = status.as_u16(), endpoint, "food lookup rejected");
            return Err(RequestError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl FoodLookup for FoodDataClient {
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResult, RequestError> {
        let page_size = page_size.to_string();
        let page_number = page.max(1).to_string();
        let request = self
            .client
            .get(format!("{}/foods/search", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("pageNumber", page_number.as_str()),
                ("dataType", SEARCH_DATA_TYPES),
            ]);
        let result: SearchResult = self.send("foods/search", request).await?;
        debug!(query, hits = result.total_hits, page = result.current_page, "food search");
        Ok(result)
    }

    async fn get_food(&self, fdc_id: u64) -> Result<Food, RequestError> {
        let request = self
            .client
            .get(format!("{}/food/{}", self.base_url, fdc_id))
            .query(&[("api_key", self.api_key.as_str())]);
        self.send("food", request).await
    }

    async fn get_foods(&self, fdc_ids: &[u64]) -> Result<Vec<Food>, RequestError> {
        let request = self
            .client
            .post(format!("{}/foods", self.base_url))
            .json(&FoodsByIdRequest {
                fdc_ids,
                api_key: &self.api_key,
            });
        self.send("foods", request).await
    }
}

use crate::clients::errors::valorant_client_errors::ValorantClientError;
use crate::config::ValorantApiConfig;
use crate::models::profile::MmrResponse;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ValorantApi: Send + Sync {
    /// Looks up the MMR document of `name#tag` and returns its `data` object.
    async fn fetch_mmr(&self, name: &str, tag: &str) -> Result<Value, ValorantClientError>;
}

/// Client for the HenrikDev Valorant API. The API key stays server side and is
/// sent as the raw `Authorization` header value.
pub struct HenrikDevClient {
    http: reqwest::Client,
    base_url: String,
    region: String,
    api_key: Option<String>,
}

impl HenrikDevClient {
    pub fn new(base_url: String, region: String, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        HenrikDevClient {
            http,
            base_url,
            region,
            api_key,
        }
    }

    pub fn from_config(config: &ValorantApiConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.region.clone(),
            config.api_key.clone(),
        )
    }

    fn mmr_url(&self, name: &str, tag: &str) -> Result<Url, ValorantClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|_| ValorantClientError::InvalidBaseUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ValorantClientError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["valorant", "v2", "mmr", self.region.as_str(), name, tag]);
        Ok(url)
    }
}

#[async_trait]
impl ValorantApi for HenrikDevClient {
    async fn fetch_mmr(&self, name: &str, tag: &str) -> Result<Value, ValorantClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ValorantClientError::MissingApiKey)?;
        let url = self.mmr_url(name, tag)?;
        debug!("Fetching MMR for {}#{}", name, tag);

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .send()
            .await
            .map_err(|e| ValorantClientError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(ValorantClientError::PlayerNotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(ValorantClientError::RateLimited),
            status => {
                warn!("Valorant API returned {} for {}#{}", status, name, tag);
                return Err(ValorantClientError::Upstream(status.as_u16()));
            }
        }

        let body: MmrResponse = response
            .json()
            .await
            .map_err(|e| ValorantClientError::InvalidResponse(e.to_string()))?;
        body.data
            .filter(Value::is_object)
            .ok_or_else(|| ValorantClientError::InvalidResponse("missing data".to_string()))
    }
}

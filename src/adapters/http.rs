use crate::domain::ports::{CatalogSource, ConfigProvider};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_USER_AGENT: &str = concat!("creature-catalog/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 以 reqwest 實作的 PokeAPI 來源
#[derive(Debug, Clone)]
pub struct PokeApiSource {
    client: Client,
    base_url: Url,
}

impl PokeApiSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        validate_url("source.base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| CatalogError::ConfigError {
            message: format!("Invalid base URL {}: {}", base_url, e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(CatalogError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", base_url),
            });
        }

        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()?;
        Self::with_client(config.base_url(), client)
    }

    /// 在 base URL 後面接上路徑片段（會自動跳脫）
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `not_found` 有值時，404 會轉成 `CatalogError::NotFound`
    async fn get_json(&self, url: Url, not_found: Option<&str>) -> Result<Value> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        match (status, not_found) {
            (StatusCode::NOT_FOUND, Some(id)) => {
                return Err(CatalogError::NotFound { id: id.to_string() })
            }
            (status, _) if !status.is_success() => {
                return Err(CatalogError::UpstreamStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            CatalogError::validation(vec![format!("payload: not valid JSON ({})", e)])
        })
    }
}

#[async_trait]
impl CatalogSource for PokeApiSource {
    async fn fetch_listing(&self, limit: usize, offset: usize) -> Result<Value> {
        let mut url = self.endpoint(&["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.get_json(url, None).await
    }

    async fn fetch_detail(&self, id_or_name: &str) -> Result<Value> {
        let url = self.endpoint(&["pokemon", id_or_name])?;
        self.get_json(url, Some(id_or_name)).await
    }

    async fn fetch_reference(&self, reference: &Url) -> Result<Value> {
        self.get_json(reference.clone(), None).await
    }

    async fn fetch_species(&self, name: &str) -> Result<Value> {
        let url = self.endpoint(&["pokemon-species", name])?;
        self.get_json(url, None).await
    }
}

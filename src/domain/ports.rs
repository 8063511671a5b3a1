use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// 上游目錄服務；回傳尚未驗證的 JSON
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_listing(&self, limit: usize, offset: usize) -> Result<Value>;
    /// 只有這個查詢會把 404 回報成 `CatalogError::NotFound`
    async fn fetch_detail(&self, id_or_name: &str) -> Result<Value>;
    async fn fetch_reference(&self, reference: &Url) -> Result<Value>;
    async fn fetch_species(&self, name: &str) -> Result<Value>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 失敗處理策略：單筆 detail 失敗時整體中止或略過該筆
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn limit(&self) -> usize;
    fn offset(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn failure_policy(&self) -> FailurePolicy;
    fn enrich_species(&self) -> bool;
}

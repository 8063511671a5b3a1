use crate::core::mapper::map_detail;
use crate::core::schema::{validate_detail, validate_listing};
use crate::core::species::{evolution_chain_url, species_traits};
use crate::domain::model::{Catalog, CatalogEntry, CatalogRecord, SkippedEntry, SpeciesTraits};
use crate::domain::ports::{CatalogSource, ConfigProvider, FailurePolicy};
use crate::utils::error::{CatalogError, Result};
use futures::stream::{self, StreamExt};
use serde_json::Value;

pub const DEFAULT_LIMIT: usize = 500;
pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// 同時進行中的 detail 請求上限
    pub concurrent_requests: usize,
    pub failure_policy: FailurePolicy,
    pub enrich_species: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            failure_policy: FailurePolicy::Abort,
            enrich_species: false,
        }
    }
}

impl FetchOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            concurrent_requests: config.concurrent_requests(),
            failure_policy: config.failure_policy(),
            enrich_species: config.enrich_species(),
        }
    }
}

/// 取得清單並逐筆解析 detail，組成完整目錄
pub struct CatalogFetcher<S: CatalogSource> {
    source: S,
    options: FetchOptions,
}

impl<S: CatalogSource> CatalogFetcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, FetchOptions::default())
    }

    pub fn with_options(source: S, options: FetchOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch_default_catalog(&self) -> Result<Catalog> {
        self.fetch_catalog(DEFAULT_LIMIT, DEFAULT_OFFSET).await
    }

    /// 清單請求失敗時不會發出任何 detail 請求。
    ///
    /// `FailurePolicy::Abort` 下第一個失敗的 detail 會直接回傳，其餘進行中的
    /// 請求隨 stream 一起被丟棄；`FailurePolicy::Skip` 則記錄在
    /// `Catalog::skipped` 後繼續。結果依 id 排序。
    pub async fn fetch_catalog(&self, limit: usize, offset: usize) -> Result<Catalog> {
        tracing::debug!("📡 Requesting listing (limit={}, offset={})", limit, offset);
        let payload = self.source.fetch_listing(limit, offset).await?;
        let listing = validate_listing(&payload)?;

        tracing::info!(
            "📋 Listing returned {} entries ({} available upstream)",
            listing.results.len(),
            listing.count
        );

        let mut records = Vec::with_capacity(listing.results.len());
        let mut skipped = Vec::new();

        let mut resolutions = stream::iter(listing.results)
            .map(|entry| async move {
                let outcome = self.resolve_entry(&entry).await;
                (entry, outcome)
            })
            .buffer_unordered(self.options.concurrent_requests.max(1));

        while let Some((entry, outcome)) = resolutions.next().await {
            match (outcome, self.options.failure_policy) {
                (Ok(record), _) => records.push(record),
                (Err(err), FailurePolicy::Abort) => {
                    tracing::debug!("❌ Detail for '{}' failed, aborting catalog fetch", entry.name);
                    return Err(err);
                }
                (Err(err), FailurePolicy::Skip) => {
                    tracing::warn!("⚠️ Skipping '{}': {}", entry.name, err);
                    skipped.push(SkippedEntry {
                        name: entry.name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "✅ Resolved {} records ({} skipped)",
            records.len(),
            skipped.len()
        );
        Ok(Catalog::new(records, listing.count, skipped))
    }

    /// 依 id 或名稱取得單筆紀錄；上游回 404 時為 `CatalogError::NotFound`
    pub async fn fetch_one(&self, id: &str) -> Result<CatalogRecord> {
        let id = id.trim().to_lowercase();
        if id.is_empty() || id.contains('/') {
            return Err(CatalogError::NotFound { id });
        }

        tracing::debug!("📡 Requesting detail for '{}'", id);
        let payload = self.source.fetch_detail(&id).await?;
        self.build_record(&payload).await
    }

    async fn resolve_entry(&self, entry: &CatalogEntry) -> Result<CatalogRecord> {
        tracing::debug!("📡 Resolving '{}' from {}", entry.name, entry.reference);
        let payload = self.source.fetch_reference(&entry.reference).await?;
        self.build_record(&payload).await
    }

    async fn build_record(&self, payload: &Value) -> Result<CatalogRecord> {
        validate_detail(payload)?;
        let record = map_detail(payload)?;

        if !self.options.enrich_species {
            return Ok(record);
        }

        let traits = self.fetch_traits(&record.species).await?;
        Ok(record.with_traits(traits))
    }

    async fn fetch_traits(&self, species_name: &str) -> Result<SpeciesTraits> {
        let species = self.source.fetch_species(species_name).await?;

        let chain = self
            .source
            .fetch_reference(&evolution_chain_url(&species)?)
            .await?;
        species_traits(&species, &chain, species_name)
    }
}

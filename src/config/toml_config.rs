use crate::adapters::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use crate::core::export::OutputFormat;
use crate::core::fetcher::{DEFAULT_CONCURRENT_REQUESTS, DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::domain::ports::{ConfigProvider, FailurePolicy};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 沒有指定 --config 時會嘗試讀取的檔名
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

/// 單次 listing 的上限
pub const MAX_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub limit: usize,
    pub offset: usize,
    pub concurrent_requests: usize,
    pub on_detail_failure: FailurePolicy,
    pub enrich_species: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            on_detail_failure: FailurePolicy::Abort,
            enrich_species: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 指定路徑就讀取該檔案；否則有 catalog.toml 才讀，沒有就用預設值
    pub fn discover(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_BASE_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_positive_number("source.timeout_seconds", self.source.timeout_seconds as usize, 1)?;
        validation::validate_range("fetch.limit", self.fetch.limit, 1, MAX_LIMIT)?;
        validation::validate_positive_number(
            "fetch.concurrent_requests",
            self.fetch.concurrent_requests,
            1,
        )?;

        if let Some(path) = &self.output.output_path {
            validation::validate_path("output.output_path", path)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.source.user_agent
    }

    fn limit(&self) -> usize {
        self.fetch.limit
    }

    fn offset(&self) -> usize {
        self.fetch.offset
    }

    fn concurrent_requests(&self) -> usize {
        self.fetch.concurrent_requests
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.fetch.on_detail_failure
    }

    fn enrich_species(&self) -> bool {
        self.fetch.enrich_species
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

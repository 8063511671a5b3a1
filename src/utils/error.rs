use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("Mapping error: missing or malformed field `{path}`")]
    Mapping { path: String },

    #[error("No record found for identifier `{id}`")]
    NotFound { id: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for `{field}` ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

/// 錯誤分類，供 CLI 決定退出碼與提示訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Validation,
    Mapping,
    NotFound,
    Configuration,
    System,
}

impl CatalogError {
    pub fn validation(violations: Vec<String>) -> Self {
        CatalogError::Validation { violations }
    }

    pub fn mapping(path: impl Into<String>) -> Self {
        CatalogError::Mapping { path: path.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::Transport(_) | CatalogError::UpstreamStatus { .. } => {
                ErrorCategory::Transport
            }
            CatalogError::Validation { .. } => ErrorCategory::Validation,
            CatalogError::Mapping { .. } => ErrorCategory::Mapping,
            CatalogError::NotFound { .. } => ErrorCategory::NotFound,
            CatalogError::ConfigError { .. } | CatalogError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            CatalogError::IoError(_)
            | CatalogError::SerializationError(_)
            | CatalogError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::Transport(_) | CatalogError::UpstreamStatus { .. } => {
                format!("Could not reach the catalog service: {}", self)
            }
            CatalogError::Validation { violations } => format!(
                "The catalog service returned unexpected data ({} problem(s)): {}",
                violations.len(),
                violations.join("; ")
            ),
            CatalogError::Mapping { path } => {
                format!("A record is missing the required field `{}`", path)
            }
            CatalogError::NotFound { id } => format!("No creature exists with id `{}`", id),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => "Check your network connection and the configured base_url",
            ErrorCategory::Validation | ErrorCategory::Mapping => {
                "The upstream payload format may have changed; retry later or use --skip-failed"
            }
            ErrorCategory::NotFound => "Check the identifier; ids are positive integers or lowercase names",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Validation => 1,
            ErrorCategory::Transport => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Mapping | ErrorCategory::System => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Unable to resolve identifier '{identifier}': {reason}")]
    Resolution { identifier: String, reason: String },

    #[error("Unable to fetch properties for CID {cid}: {reason}")]
    PropertyFetch { cid: u64, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ProxyError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 是否為傳輸層錯誤（連線失敗、逾時），而非上游回應的錯誤
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::UpstreamUnavailable { .. } => true,
            _ => false,
        }
    }

    /// 給呼叫端看的訊息，不帶內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => message.clone(),
            Self::UpstreamStatus { status: 404, .. } => "Compound not found upstream".to_string(),
            Self::Http(_)
            | Self::UpstreamStatus { .. }
            | Self::UpstreamUnavailable { .. }
            | Self::Resolution { .. }
            | Self::PropertyFetch { .. }
            | Self::SerializationError(_) => "Upstream service unavailable".to_string(),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Service configuration is invalid".to_string()
            }
            Self::IoError(_) => "Internal server error".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the catalog client, loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the remote product-listing service.
    pub listing_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Products per listing page (`limit` parameter).
    pub page_size: u32,
    /// Quiet period between the last keystroke and the issued search request.
    pub search_debounce_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

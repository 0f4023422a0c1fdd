use std::path::PathBuf;

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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Optional YAML file overriding the scoring and health constants.
    pub tuning_path: Option<PathBuf>,
    /// Text Embeddings Inference base URL. `None` runs matching rule-only.
    pub tei_url: Option<String>,
    pub embed_timeout_ms: u64,
    pub embed_max_retries: u32,
    pub embed_backoff_base_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub match_min_score: u8,
    pub match_max_matches: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("tuning_path", &self.tuning_path)
            .field("tei_url", &self.tei_url)
            .field("embed_timeout_ms", &self.embed_timeout_ms)
            .field("embed_max_retries", &self.embed_max_retries)
            .field("embed_backoff_base_ms", &self.embed_backoff_base_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("match_min_score", &self.match_min_score)
            .field("match_max_matches", &self.match_max_matches)
            .finish()
    }
}

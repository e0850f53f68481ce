use std::path::PathBuf;

/// How comparison groups are assembled from a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// Group accepted match pairs by the bucket of their first item.
    #[default]
    Pairs,
    /// Group every normalized item by bucket, keeping the cheapest per retailer.
    Buckets,
}

impl std::fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingMode::Pairs => write!(f, "pairs"),
            GroupingMode::Buckets => write!(f, "buckets"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// `None` disables assisted matching and intent filtering entirely.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_backoff_base_ms: u64,
    pub grouping: GroupingMode,
    pub synonyms_path: Option<PathBuf>,
    pub max_concurrent_queries: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field(
                "llm_retry_backoff_base_ms",
                &self.llm_retry_backoff_base_ms,
            )
            .field("grouping", &self.grouping)
            .field("synonyms_path", &self.synonyms_path)
            .field("max_concurrent_queries", &self.max_concurrent_queries)
            .finish()
    }
}

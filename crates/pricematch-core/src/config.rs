use crate::app_config::{AppConfig, GroupingMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional. Decoupled from the real environment so it can
/// be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("PRICEMATCH_LOG_LEVEL", "info");

    // An empty key is treated the same as an absent one.
    let llm_api_key = lookup("PRICEMATCH_LLM_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let llm_base_url = or_default("PRICEMATCH_LLM_BASE_URL", "https://api.groq.com/openai/v1");
    let llm_model = or_default("PRICEMATCH_LLM_MODEL", "llama-3.3-70b-versatile");

    let llm_timeout_secs = parse_u64("PRICEMATCH_LLM_TIMEOUT_SECS", "20")?;
    if llm_timeout_secs == 0 {
        return Err(invalid(
            "PRICEMATCH_LLM_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let llm_max_retries = parse_u32("PRICEMATCH_LLM_MAX_RETRIES", "1")?;
    let llm_retry_backoff_base_ms = parse_u64("PRICEMATCH_LLM_RETRY_BACKOFF_BASE_MS", "500")?;

    let grouping = parse_grouping(&or_default("PRICEMATCH_GROUPING", "pairs"))
        .map_err(|reason| invalid("PRICEMATCH_GROUPING", reason))?;

    let synonyms_path = lookup("PRICEMATCH_SYNONYMS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let max_concurrent_queries = parse_usize("PRICEMATCH_MAX_CONCURRENT_QUERIES", "4")?;

    Ok(AppConfig {
        log_level,
        llm_api_key,
        llm_base_url,
        llm_model,
        llm_timeout_secs,
        llm_max_retries,
        llm_retry_backoff_base_ms,
        grouping,
        synonyms_path,
        max_concurrent_queries,
    })
}

fn parse_grouping(s: &str) -> Result<GroupingMode, String> {
    match s.trim().to_lowercase().as_str() {
        "pairs" => Ok(GroupingMode::Pairs),
        "buckets" => Ok(GroupingMode::Buckets),
        other => Err(format!("unknown grouping mode \"{other}\"; expected pairs or buckets")),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub mod app_config;
pub mod capability;
pub mod config;
pub mod listings;
pub mod report;
pub mod synonyms;

pub use app_config::{AppConfig, GroupingMode};
pub use capability::{CapabilityError, IntentFilter, MatchSuggester, SuggestedPair, Unassisted};
pub use config::{load_app_config, load_app_config_from_env};
pub use listings::{NormalizedItem, ParsedQuantity, RawListing, RetailerId, Unit};
pub use report::{
    MatchPair, ReconcileStatus, ReconciliationGroup, ReconciliationReport, Side,
    SingleSourceGroup, Winner,
};
pub use synonyms::{load_synonyms, SynonymDictionary};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("listing \"{name}\" has invalid price {price}; must be finite and > 0")]
    InvalidPrice { name: String, price: f64 },

    #[error("listing from {source_id} has an empty product name")]
    EmptyName { source_id: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read synonyms file {path}: {source}")]
    SynonymsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse synonyms file: {0}")]
    SynonymsFileParse(#[from] serde_yaml::Error),

    #[error("synonyms validation failed: {0}")]
    Validation(String),
}

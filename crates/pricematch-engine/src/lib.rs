pub mod bucket;
pub mod dedup;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod quantity;
pub mod query;
pub mod report;
pub mod similarity;

pub use bucket::classify_bucket;
pub use dedup::dedupe_listings;
pub use matcher::{check_candidate, match_items, within_tolerance, CandidateVerdict, MatchOutcome};
pub use normalize::{normalize_listing, normalize_quantity};
pub use pipeline::{EngineConfig, Reconciler};
pub use quantity::parse_quantity;
pub use query::{autocorrect_query, keyword_filter};
pub use similarity::name_similarity;

pub mod client;
pub mod error;
pub mod prompt;
mod retry;
pub mod suggest;
pub mod types;

pub use client::LlmClient;
pub use error::LlmError;

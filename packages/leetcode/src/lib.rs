pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod limiter;
pub mod models;

pub use client::{ContestDataProvider, LeetCodeClient};
pub use config::LeetCodeConfig;
pub use error::ProviderError;
pub use limiter::RateLimiter;
pub use models::{ContestResult, StatsSnapshot};

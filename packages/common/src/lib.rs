pub mod config;
pub mod job;
pub mod rating;
pub mod retry;
pub mod schedule;

pub use config::{JobScheduleConfig, JobsConfig};
pub use job::{JobKind, JobState, JobTrigger};
pub use rating::{RatingBreakdown, compute_rating};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use schedule::WeeklyAnchor;

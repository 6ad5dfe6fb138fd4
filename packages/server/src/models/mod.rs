pub mod contest;
pub mod job;
pub mod rating;
pub mod shared;
pub mod student;
pub mod weekly_stats;

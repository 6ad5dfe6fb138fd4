pub mod contest_history;
pub mod rating;
pub mod student;
pub mod weekly_stats;

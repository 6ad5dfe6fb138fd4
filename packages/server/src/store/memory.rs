//! In-memory fakes with failure injection for service and job tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leetcode::{ContestDataProvider, ContestResult, ProviderError, StatsSnapshot};
use sea_orm::DbErr;

use super::{
    HistoryStore, NewContestEntry, NewRating, NewWeeklyStats, StoreError, StudentDirectory,
    StudentRef,
};

pub fn student(id: i32, username: &str) -> StudentRef {
    StudentRef {
        id,
        name: format!("Student {id}"),
        leetcode_id: (!username.is_empty()).then(|| username.to_string()),
    }
}

pub fn contest(title: &str, rating: f64) -> NewContestEntry {
    NewContestEntry {
        contest_title: title.to_string(),
        rating,
        ranking: 100,
        problems_solved: 3,
        finish_time_seconds: 3600,
        contest_date: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    students: Mutex<Vec<StudentRef>>,
    ratings: Mutex<Vec<NewRating>>,
    contests: Mutex<HashMap<i32, Vec<NewContestEntry>>>,
    weekly: Mutex<Vec<NewWeeklyStats>>,
    list_calls: AtomicUsize,
    fail_insert: AtomicBool,
    fail_list: AtomicBool,
}

impl MemoryStore {
    pub fn with_students(students: Vec<StudentRef>) -> Self {
        Self {
            students: Mutex::new(students),
            ..Default::default()
        }
    }

    pub fn seed_contests(&self, student_id: i32, entries: Vec<NewContestEntry>) {
        self.contests.lock().unwrap().insert(student_id, entries);
    }

    pub fn contests(&self, student_id: i32) -> Vec<NewContestEntry> {
        self.contests
            .lock()
            .unwrap()
            .get(&student_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn ratings(&self) -> Vec<NewRating> {
        self.ratings.lock().unwrap().clone()
    }

    pub fn weekly(&self) -> Vec<NewWeeklyStats> {
        self.weekly.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Make the insert half of the next replacements fail after the delete.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StudentDirectory for MemoryStore {
    async fn list(&self, page: u64, page_size: u64) -> Result<Vec<StudentRef>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("directory unavailable".into()).into());
        }
        let students = self.students.lock().unwrap();
        let skip = (page.saturating_sub(1) * page_size) as usize;
        Ok(students
            .iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<StudentRef>, StoreError> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append_rating(&self, rating: NewRating) -> Result<i32, StoreError> {
        let mut ratings = self.ratings.lock().unwrap();
        ratings.push(rating);
        Ok(ratings.len() as i32)
    }

    async fn replace_contest_history(
        &self,
        student_id: i32,
        entries: Vec<NewContestEntry>,
    ) -> Result<usize, StoreError> {
        let mut contests = self.contests.lock().unwrap();

        // Work on a copy so a failed insert leaves the committed state alone.
        let mut staged = contests.clone();
        staged.remove(&student_id);
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Insert(DbErr::Custom("injected fault".into())));
        }

        let written = entries.len();
        staged.insert(student_id, entries);
        *contests = staged;
        Ok(written)
    }

    async fn insert_weekly_stats(&self, stats: NewWeeklyStats) -> Result<bool, StoreError> {
        let mut weekly = self.weekly.lock().unwrap();
        if weekly
            .iter()
            .any(|w| w.student_id == stats.student_id && w.week_start == stats.week_start)
        {
            return Ok(false);
        }
        weekly.push(stats);
        Ok(true)
    }
}

/// Scripted provider: fixed snapshots per username, optional failures.
#[derive(Default)]
pub struct FakeProvider {
    snapshots: Mutex<HashMap<String, StatsSnapshot>>,
    /// Usernames that always fail with the given error.
    failures: Mutex<HashMap<String, ProviderError>>,
    /// Usernames whose next `n` calls fail before succeeding.
    flaky: Mutex<HashMap<String, (u32, ProviderError)>>,
    calls: AtomicU32,
    called_for: Mutex<HashSet<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, snapshot: StatsSnapshot) -> Self {
        self.snapshots
            .lock()
            .unwrap()
            .insert(username.to_string(), snapshot);
        self
    }

    pub fn failing(self, username: &str, err: ProviderError) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(username.to_string(), err);
        self
    }

    pub fn flaky(self, username: &str, failures: u32, err: ProviderError) -> Self {
        self.flaky
            .lock()
            .unwrap()
            .insert(username.to_string(), (failures, err));
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_called_for(&self, username: &str) -> bool {
        self.called_for.lock().unwrap().contains(username)
    }

    fn lookup(&self, username: &str) -> Result<StatsSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called_for
            .lock()
            .unwrap()
            .insert(username.to_string());

        if let Some(err) = self.failures.lock().unwrap().get(username) {
            return Err(err.clone());
        }
        if let Some((remaining, err)) = self.flaky.lock().unwrap().get_mut(username)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(err.clone());
        }
        self.snapshots
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl ContestDataProvider for FakeProvider {
    async fn fetch_user_stats(&self, username: &str) -> Result<StatsSnapshot, ProviderError> {
        self.lookup(username)
    }

    async fn fetch_contest_history(
        &self,
        username: &str,
    ) -> Result<Vec<ContestResult>, ProviderError> {
        self.lookup(username).map(|s| s.contest_history)
    }
}

pub fn snapshot(easy: i32, medium: i32, hard: i32, contest_rating: f64) -> StatsSnapshot {
    StatsSnapshot {
        total_solved: easy + medium + hard,
        easy_solved: easy,
        medium_solved: medium,
        hard_solved: hard,
        contest_rating,
        contest_global_ranking: 1000,
        attended_contests: 1,
        contest_history: vec![ContestResult {
            title: "Weekly Contest 400".into(),
            rating: contest_rating,
            ranking: 321,
            problems_solved: 3,
            finish_time_seconds: 3600,
            start_time: DateTime::from_timestamp(1_717_900_200, 0),
        }],
    }
}

use std::sync::Arc;

use leetcode::ContestDataProvider;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::jobs::{JobRegistry, PassConfig, StudentTask};
use crate::services::{RatingService, Reconciler, StudentLocks, WeeklyStatsService};
use crate::store::SeaOrmStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub ratings: Arc<RatingService>,
    pub reconciler: Arc<Reconciler>,
    pub jobs: Arc<JobRegistry>,
    pub locks: Arc<StudentLocks>,
}

impl AppState {
    /// Wire every service around one shared provider and lock map, so the
    /// interactive and batch paths share the same rate limiter.
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        provider: Arc<dyn ContestDataProvider>,
    ) -> Self {
        let store = Arc::new(SeaOrmStore::new(db.clone()));
        let locks = Arc::new(StudentLocks::new());

        let ratings = Arc::new(RatingService::new(
            store.clone(),
            store.clone(),
            provider.clone(),
            locks.clone(),
            config.jobs.retry,
        ));
        let reconciler = Arc::new(Reconciler::new(
            store.clone(),
            store.clone(),
            provider.clone(),
            locks.clone(),
        ));
        let weekly = Arc::new(WeeklyStatsService::new(
            store.clone(),
            provider,
            locks.clone(),
            config.jobs.anchor(),
        ));

        let tasks: Vec<Arc<dyn StudentTask>> = vec![
            ratings.clone() as Arc<dyn StudentTask>,
            reconciler.clone() as Arc<dyn StudentTask>,
            weekly as Arc<dyn StudentTask>,
        ];
        let jobs = Arc::new(JobRegistry::new(
            store,
            tasks,
            PassConfig::from(&config.jobs),
        ));

        Self {
            config: Arc::new(config),
            db,
            ratings,
            reconciler,
            jobs,
            locks,
        }
    }
}

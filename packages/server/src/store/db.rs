use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::{
    HistoryStore, NewContestEntry, NewRating, NewWeeklyStats, StoreError, StudentDirectory,
    StudentRef,
};
use crate::entity::{contest_history, rating, student, weekly_stats};

/// [`StudentDirectory`] and [`HistoryStore`] backed by the relational store.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentDirectory for SeaOrmStore {
    async fn list(&self, page: u64, page_size: u64) -> Result<Vec<StudentRef>, StoreError> {
        let students = student::Entity::find()
            .order_by_asc(student::Column::Id)
            .paginate(&self.db, page_size.max(1))
            .fetch_page(page.saturating_sub(1))
            .await?;
        Ok(students.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<StudentRef>, StoreError> {
        let student = student::Entity::find_by_id(id).one(&self.db).await?;
        Ok(student.map(Into::into))
    }
}

#[async_trait]
impl HistoryStore for SeaOrmStore {
    async fn append_rating(&self, new: NewRating) -> Result<i32, StoreError> {
        let model = rating::ActiveModel {
            student_id: Set(new.student_id),
            rating: Set(new.rating),
            problems_count: Set(new.problems_count),
            easy_count: Set(new.easy_count),
            medium_count: Set(new.medium_count),
            hard_count: Set(new.hard_count),
            contest_rating: Set(new.contest_rating),
            global_rank: Set(new.global_rank),
            recorded_at: Set(new.recorded_at),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.id)
    }

    async fn replace_contest_history(
        &self,
        student_id: i32,
        entries: Vec<NewContestEntry>,
    ) -> Result<usize, StoreError> {
        let txn = self.db.begin().await?;

        let deleted = contest_history::Entity::delete_many()
            .filter(contest_history::Column::StudentId.eq(student_id))
            .exec(&txn)
            .await
            .map_err(StoreError::Delete)?;

        let written = entries.len();
        if !entries.is_empty() {
            let now = Utc::now();
            let models = entries.into_iter().map(|e| contest_history::ActiveModel {
                student_id: Set(student_id),
                contest_title: Set(e.contest_title),
                rating: Set(e.rating),
                ranking: Set(e.ranking),
                problems_solved: Set(e.problems_solved),
                finish_time_seconds: Set(e.finish_time_seconds),
                contest_date: Set(e.contest_date),
                created_at: Set(now),
                ..Default::default()
            });
            // Dropping `txn` on error rolls the delete back.
            contest_history::Entity::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(StoreError::Insert)?;
        }

        txn.commit().await?;
        debug!(
            student_id,
            deleted = deleted.rows_affected,
            written,
            "Replaced contest history"
        );
        Ok(written)
    }

    async fn insert_weekly_stats(&self, new: NewWeeklyStats) -> Result<bool, StoreError> {
        let model = weekly_stats::ActiveModel {
            student_id: Set(new.student_id),
            week_start: Set(new.week_start),
            week_end: Set(new.week_end),
            total_solved: Set(new.total_solved),
            easy_solved: Set(new.easy_solved),
            medium_solved: Set(new.medium_solved),
            hard_solved: Set(new.hard_solved),
            contest_rating: Set(new.contest_rating),
            global_rank: Set(new.global_rank),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let result = weekly_stats::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    weekly_stats::Column::StudentId,
                    weekly_stats::Column::WeekStart,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionSession, TransactionTrait,
};

use crate::entity::{contest_history, rating, student, weekly_stats};

/// Validated input for a new student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub leetcode_id: Option<String>,
    pub passing_year: Option<i32>,
    pub batch: String,
    pub department: String,
}

/// Aggregates behind the stats endpoint.
#[derive(Debug, Clone)]
pub struct StudentStats {
    pub student_id: i32,
    /// Row with the latest `recorded_at`.
    pub current: Option<rating::Model>,
    pub highest_rating: Option<i32>,
    pub contests_participated: u64,
    pub average_contest_rating: Option<f64>,
    pub best_ranking: Option<i32>,
    pub total_contest_problems_solved: i64,
    pub latest_contest_rating: Option<f64>,
}

/// Optional narrowing of the leaderboard.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardFilter {
    pub department: Option<String>,
    pub batch: Option<String>,
}

/// A ranked student with its current rating row.
#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub student: student::Model,
    pub current: rating::Model,
}

pub struct StudentService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> StudentService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, new: NewStudent) -> Result<student::Model, DbErr> {
        let now = Utc::now();
        let model = student::ActiveModel {
            student_id: Set(new.student_id),
            name: Set(new.name),
            email: Set(new.email),
            leetcode_id: Set(new.leetcode_id),
            passing_year: Set(new.passing_year),
            batch: Set(new.batch),
            department: Set(new.department),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model.insert(self.conn).await
    }

    /// Returns the page and the total number of students.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<student::Model>, u64), DbErr> {
        let paginator = student::Entity::find()
            .order_by_asc(student::Column::Id)
            .paginate(self.conn, per_page);
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((data, total))
    }

    pub async fn get(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(id).one(self.conn).await
    }

    /// Newest first.
    pub async fn ratings(&self, student_id: i32) -> Result<Vec<rating::Model>, DbErr> {
        rating::Entity::find()
            .filter(rating::Column::StudentId.eq(student_id))
            .order_by_desc(rating::Column::RecordedAt)
            .all(self.conn)
            .await
    }

    /// Most recent contest first.
    pub async fn contest_history(
        &self,
        student_id: i32,
    ) -> Result<Vec<contest_history::Model>, DbErr> {
        contest_history::Entity::find()
            .filter(contest_history::Column::StudentId.eq(student_id))
            .order_by_desc(contest_history::Column::ContestDate)
            .order_by_asc(contest_history::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn stats(&self, student_id: i32) -> Result<StudentStats, DbErr> {
        let ratings = self.ratings(student_id).await?;
        let contests = self.contest_history(student_id).await?;
        Ok(aggregate(student_id, ratings, contests))
    }

    /// Newest week first.
    pub async fn weekly_stats(
        &self,
        student_id: i32,
    ) -> Result<Vec<weekly_stats::Model>, DbErr> {
        weekly_stats::Entity::find()
            .filter(weekly_stats::Column::StudentId.eq(student_id))
            .order_by_desc(weekly_stats::Column::WeekStart)
            .all(self.conn)
            .await
    }

    /// The row of the week beginning at `week_start`, if the job recorded one.
    pub async fn week(
        &self,
        student_id: i32,
        week_start: DateTime<Utc>,
    ) -> Result<Option<weekly_stats::Model>, DbErr> {
        weekly_stats::Entity::find()
            .filter(weekly_stats::Column::StudentId.eq(student_id))
            .filter(weekly_stats::Column::WeekStart.gte(week_start))
            .filter(weekly_stats::Column::WeekStart.lt(week_start + Duration::days(7)))
            .one(self.conn)
            .await
    }

    /// Students with at least one rating, highest current rating first.
    ///
    /// The current rating is the row with the latest `recorded_at`. Ties keep
    /// internal id order.
    pub async fn leaderboard(
        &self,
        filter: &LeaderboardFilter,
    ) -> Result<Vec<LeaderboardEntry>, DbErr> {
        let mut query = student::Entity::find().order_by_asc(student::Column::Id);
        if let Some(department) = &filter.department {
            query = query.filter(student::Column::Department.eq(department.as_str()));
        }
        if let Some(batch) = &filter.batch {
            query = query.filter(student::Column::Batch.eq(batch.as_str()));
        }
        let students = query.all(self.conn).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = students.iter().map(|s| s.id).collect();
        let ratings = rating::Entity::find()
            .filter(rating::Column::StudentId.is_in(ids))
            .order_by_desc(rating::Column::RecordedAt)
            .all(self.conn)
            .await?;
        let mut current: HashMap<i32, rating::Model> = HashMap::new();
        for r in ratings {
            current.entry(r.student_id).or_insert(r);
        }

        let mut entries: Vec<LeaderboardEntry> = students
            .into_iter()
            .filter_map(|student| {
                let current = current.remove(&student.id)?;
                Some(LeaderboardEntry { student, current })
            })
            .collect();
        // Stable sort keeps id order among equal ratings.
        entries.sort_by(|a, b| b.current.rating.cmp(&a.current.rating));
        Ok(entries)
    }
}

impl<C: ConnectionTrait + TransactionTrait> StudentService<'_, C> {
    /// Delete a student and everything recorded for it in one transaction.
    /// Returns `false` when no such student exists.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.conn.begin().await?;

        rating::Entity::delete_many()
            .filter(rating::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        contest_history::Entity::delete_many()
            .filter(contest_history::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        weekly_stats::Entity::delete_many()
            .filter(weekly_stats::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        let result = student::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }
}

/// `ratings` newest first, `contests` most recent first.
fn aggregate(
    student_id: i32,
    ratings: Vec<rating::Model>,
    contests: Vec<contest_history::Model>,
) -> StudentStats {
    let highest_rating = ratings.iter().map(|r| r.rating).max();
    let current = ratings.into_iter().next();

    let contests_participated = contests.len() as u64;
    let average_contest_rating = (!contests.is_empty())
        .then(|| contests.iter().map(|c| c.rating).sum::<f64>() / contests.len() as f64);
    let best_ranking = contests
        .iter()
        .map(|c| c.ranking)
        .filter(|&r| r > 0)
        .min();
    let total_contest_problems_solved = contests.iter().map(|c| c.problems_solved as i64).sum();
    let latest_contest_rating = contests.first().map(|c| c.rating);

    StudentStats {
        student_id,
        current,
        highest_rating,
        contests_participated,
        average_contest_rating,
        best_ranking,
        total_contest_problems_solved,
        latest_contest_rating,
    }
}

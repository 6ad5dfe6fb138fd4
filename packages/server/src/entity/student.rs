use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Institution-issued identifier.
    #[sea_orm(unique)]
    pub student_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,

    /// LeetCode username. Students without one are skipped by every job.
    #[sea_orm(unique, nullable)]
    pub leetcode_id: Option<String>,

    pub passing_year: Option<i32>,
    pub batch: String,
    pub department: String,

    #[sea_orm(has_many)]
    pub ratings: HasMany<super::rating::Entity>,

    #[sea_orm(has_many)]
    pub contest_histories: HasMany<super::contest_history::Entity>,

    #[sea_orm(has_many)]
    pub weekly_stats: HasMany<super::weekly_stats::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

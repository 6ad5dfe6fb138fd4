use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Solved counts captured once per student and week.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "student_week", indexed)]
    pub student_id: i32,
    #[sea_orm(unique_key = "student_week")]
    pub week_start: DateTimeUtc,
    pub week_end: DateTimeUtc,

    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
    pub contest_rating: f64,
    pub global_rank: i32,

    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

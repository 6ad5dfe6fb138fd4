use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One rating measurement. Rows are appended, never updated.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rating")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "student_recorded_at", indexed)]
    pub student_id: i32,

    pub rating: i32,
    pub problems_count: i32,
    pub easy_count: i32,
    pub medium_count: i32,
    pub hard_count: i32,
    pub contest_rating: f64,
    /// Contest global ranking, 0 when the student never competed.
    pub global_rank: i32,

    #[sea_orm(unique_key = "student_recorded_at")]
    pub recorded_at: DateTimeUtc,

    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

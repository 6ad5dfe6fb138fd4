use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "student_contest", indexed)]
    pub student_id: i32,
    #[sea_orm(unique_key = "student_contest")]
    pub contest_title: String,

    pub rating: f64,
    pub ranking: i32,
    pub problems_solved: i32,
    pub finish_time_seconds: i64,
    pub contest_date: DateTimeUtc,

    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/students", student_routes())
        .nest("/jobs", job_routes())
}

fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::student::list_students,
            handlers::student::create_student
        ))
        .routes(routes!(
            handlers::student::get_student,
            handlers::student::delete_student
        ))
        .routes(routes!(handlers::student::get_leaderboard))
        .routes(routes!(handlers::student::get_student_stats))
        .routes(routes!(handlers::weekly_stats::list_weekly_stats))
        .routes(routes!(handlers::weekly_stats::get_current_week))
        .routes(routes!(handlers::rating::list_ratings))
        .routes(routes!(handlers::rating::update_rating))
        .routes(routes!(
            handlers::contest::list_contest_history,
            handlers::contest::sync_contest_history
        ))
}

fn job_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::job::list_jobs))
        .routes(routes!(handlers::job::trigger_job))
        .routes(routes!(handlers::job::get_job))
}

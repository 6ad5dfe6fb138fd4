use serde::Serialize;

use crate::jobs::JobStatus;

#[derive(Serialize, utoipa::ToSchema)]
pub struct JobListResponse {
    /// Most recent run first.
    pub data: Vec<JobStatus>,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::jobmodel::JobListing;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateJobDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1, message = "Pay must be positive"))]
    pub pay: i64,

    pub link: Option<String>,

    #[validate(length(min = 1, message = "PIN is required"))]
    pub pin: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateJobDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 1, message = "Pay must be positive"))]
    pub pay: i64,

    pub link: Option<String>,
}

/// Owner-initiated completion pays the assigned employee through the
/// external transfer service; the PIN authorizes the payout.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CompleteJobDto {
    pub pin: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobWithApplicants {
    #[serde(flatten)]
    pub job: JobListing,
    pub applicants_count: i64,
    pub you_applied: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyJobsResponse {
    pub status: String,
    pub jobs: Vec<JobWithApplicants>,
}

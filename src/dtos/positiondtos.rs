use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::positionmodel::Position;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePositionDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0, message = "Pay must not be negative"))]
    pub pay: i64,

    /// Comma-separated labels, normalized server side.
    pub tags: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AcceptApplicantDto {
    #[validate(length(min = 1, message = "Applicant id is required"))]
    pub applicant_id: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CompletePositionDto {
    #[validate(length(min = 1, message = "Employee id is required"))]
    pub employee_id: String,

    #[validate(range(min = 1, message = "Pay must be positive"))]
    pub pay: i64,

    #[validate(length(min = 1, message = "PIN is required"))]
    pub pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PositionWithMeta {
    #[serde(flatten)]
    pub position: Position,
    pub applicants_count: i64,
    pub you_applied: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicantFileMeta {
    pub id: i32,
    pub field: String,
    pub original_name: String,
}

/// One applicant row on the position manager page, enriched with uploaded
/// files and the optional portfolio link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicantSummary {
    pub fb_id: String,
    pub name: String,
    pub application_id: i32,
    pub files: Vec<ApplicantFileMeta>,
    pub portfolio_link: Option<String>,
}

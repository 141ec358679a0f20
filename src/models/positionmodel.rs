use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "position_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Available,
    Applied,
    InProgress,
    Completed,
}

/// The many-applicant posting model. Positions reference the company by id
/// and track applicants separately until the owner accepts one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub pay: i64,
    pub employee_id: Option<String>,
    pub status: PositionStatus,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PositionApplication {
    pub id: i32,
    pub position_id: i32,
    pub fb_id: String,
    pub applied_at: Option<DateTime<Utc>>,
}

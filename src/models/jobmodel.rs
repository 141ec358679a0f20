use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Available,
    Taken,
    Completed,
}

/// A single-employee posting. The company is stored by name (legacy
/// denormalized link); at most one employee may hold the job at a time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub pay: i64,
    pub employee_id: Option<String>,
    pub status: JobStatus,
}

/// Listing row: a job joined with its company and the name of the assigned
/// employee, if any.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobListing {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub pay: i64,
    pub employee_id: Option<String>,
    pub status: JobStatus,
    pub company_link: Option<String>,
    pub employee_name: Option<String>,
}

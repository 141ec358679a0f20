use serde::{Deserialize, Serialize};

/// Metadata for an uploaded application file. The binary payload lives in
/// the same row but is only fetched by the file-serving path.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationFile {
    pub id: i32,
    pub application_id: i32,
    pub field: String,
    pub original_name: String,
    pub mime: Option<String>,
}

/// A stored file together with the owner of the company it was submitted
/// to, resolved through either the job or the position join path.
#[derive(Debug, sqlx::FromRow)]
pub struct StoredFile {
    pub original_name: String,
    pub mime: Option<String>,
    pub data: Vec<u8>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicantDetail {
    pub id: i32,
    pub application_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub portfolio_link: Option<String>,
}

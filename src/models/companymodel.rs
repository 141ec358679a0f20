use serde::{Deserialize, Serialize};

/// Company name is unique case-insensitively; jobs reference it by name
/// while positions reference the id. Ownership is fixed at creation.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub link: String,
    pub owner_id: String,
    pub p_color: String,
    pub s_color: String,
    pub bp_color: String,
    pub bs_color: String,
    pub verified: bool,
}

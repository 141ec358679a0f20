use serde::{Deserialize, Serialize};

/// A local user row, created on first login from the external identity
/// provider. `fb_id` is the opaque subject id issued by that provider and is
/// the only key the rest of the system uses.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub fb_id: String,
    pub username: String,
    pub money: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

impl User {
    pub fn pin_matches(&self, candidate: &str) -> bool {
        self.pin.as_deref() == Some(candidate)
    }
}

use serde::{Deserialize, Serialize};

/// Body of the digipogs transfer relay endpoint, forwarded verbatim to the
/// external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRelayDto {
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub reason: Option<String>,
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileQueryDto {
    pub inline: Option<String>,
}

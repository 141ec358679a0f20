use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{userdb::UserExt, DBClient},
    models::usermodel::User,
    service::error::ServiceError,
};

/// A digipogs movement. Both gated creation fees and completion payouts go
/// through this shape regardless of which port executes them.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: i64,
    pub reason: String,
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pool: bool,
    /// Idempotency key, generated per attempt.
    pub reference: Uuid,
}

impl TransferRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: i64, reason: impl Into<String>) -> Self {
        TransferRequest {
            from: from.into(),
            to: to.into(),
            amount,
            reason: reason.into(),
            pin: None,
            pool: false,
            reference: Uuid::new_v4(),
        }
    }

    pub fn with_pin(mut self, pin: Option<String>) -> Self {
        self.pin = pin;
        self
    }

    pub fn to_pool(mut self) -> Self {
        self.pool = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub reference: Uuid,
    /// Upstream response payload, passed back to callers that relay it.
    pub details: Value,
}

/// Payment side of the lifecycle engines. The engines only see this trait;
/// jobs and companies pay through the external service, positions settle
/// against the local ledger.
#[async_trait]
pub trait PaymentPort: Send + Sync {
    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt, ServiceError>;
}

/// Calls the external digipogs transfer endpoint. Phase 1 of the two-phase
/// protocol: once this returns Ok, money has moved and cannot be rolled
/// back locally.
#[derive(Debug, Clone)]
pub struct ExternalTransfer {
    client: reqwest::Client,
    base_url: String,
}

impl ExternalTransfer {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        ExternalTransfer {
            client,
            base_url: config.auth_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn transfer_url(&self) -> String {
        format!("{}/api/digipogs/transfer", self.base_url)
    }

    /// Pass a caller-supplied transfer body through unchanged and hand the
    /// upstream status and payload straight back. No success interpretation
    /// happens here; the caller sees exactly what the service said.
    pub async fn relay<B: Serialize>(&self, body: &B) -> Result<(u16, Value), ServiceError> {
        let response = self
            .client
            .post(self.transfer_url())
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        Ok((status, body))
    }
}

/// A response is a success only when the HTTP status is 2xx AND the payload
/// carries `success: true`.
pub fn interpret_transfer_response(http_ok: bool, body: &Value) -> Result<(), String> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if http_ok && success {
        return Ok(());
    }
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("transfer declined")
        .to_string();
    Err(message)
}

#[async_trait]
impl PaymentPort for ExternalTransfer {
    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt, ServiceError> {
        let reference = request.reference;
        let response = self
            .client
            .post(self.transfer_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // a timeout counts as a declined transfer
                ServiceError::Upstream(e.to_string())
            })?;

        let http_ok = response.status().is_success();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        interpret_transfer_response(http_ok, &body).map_err(ServiceError::Upstream)?;

        Ok(TransferReceipt {
            reference,
            details: body,
        })
    }
}

/// Moves digipogs directly between two local user rows. PIN and funds are
/// checked before anything is written; the debit is conditional so a
/// concurrent spend cannot push the balance below zero.
#[derive(Debug, Clone)]
pub struct LocalLedgerTransfer {
    db: DBClient,
}

impl LocalLedgerTransfer {
    pub fn new(db: DBClient) -> Self {
        LocalLedgerTransfer { db }
    }
}

/// PIN and balance gate evaluated before any balance moves. A mismatched
/// (or absent) PIN refuses first; an exact balance is enough to pay.
pub fn check_ledger_preconditions(
    payer: &User,
    pin: Option<&str>,
    amount: i64,
) -> Result<(), ServiceError> {
    match pin {
        Some(pin) if payer.pin_matches(pin) => {}
        _ => return Err(ServiceError::PinMismatch),
    }

    if payer.money < amount {
        return Err(ServiceError::InsufficientFunds {
            required: amount,
            available: payer.money,
        });
    }

    Ok(())
}

#[async_trait]
impl PaymentPort for LocalLedgerTransfer {
    async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt, ServiceError> {
        let payer = self
            .db
            .get_user(&request.from)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        check_ledger_preconditions(&payer, request.pin.as_deref(), request.amount)?;

        let debited = self.db.debit_user(&request.from, request.amount).await?;
        if !debited {
            return Err(ServiceError::InsufficientFunds {
                required: request.amount,
                available: payer.money,
            });
        }
        self.db.credit_user(&request.to, request.amount).await?;

        Ok(TransferReceipt {
            reference: request.reference,
            details: serde_json::json!({ "success": true }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use axum::http::StatusCode;
    use serde_json::json;

    fn payer(money: i64, pin: Option<&str>) -> User {
        User {
            fb_id: "2".to_string(),
            username: "Payer".to_string(),
            money,
            pin: pin.map(|p| p.to_string()),
        }
    }

    #[test]
    fn ledger_rejects_insufficient_funds_before_anything_moves() {
        let err = check_ledger_preconditions(&payer(50, Some("1234")), Some("1234"), 100)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientFunds { required: 100, available: 50 }
        ));
        assert_eq!(HttpError::from(err).status, StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn ledger_rejects_bad_or_missing_pin() {
        let err = check_ledger_preconditions(&payer(500, Some("1234")), Some("9999"), 100)
            .unwrap_err();
        assert!(matches!(err, ServiceError::PinMismatch));
        assert_eq!(HttpError::from(err).status, StatusCode::UNAUTHORIZED);

        // a user who never set a pin cannot pay
        assert!(matches!(
            check_ledger_preconditions(&payer(500, None), Some("1234"), 100),
            Err(ServiceError::PinMismatch)
        ));
        assert!(matches!(
            check_ledger_preconditions(&payer(500, Some("1234")), None, 100),
            Err(ServiceError::PinMismatch)
        ));
    }

    #[test]
    fn ledger_allows_exact_balance() {
        assert!(check_ledger_preconditions(&payer(100, Some("1234")), Some("1234"), 100).is_ok());
    }

    #[test]
    fn success_requires_both_signals() {
        assert!(interpret_transfer_response(true, &json!({ "success": true })).is_ok());
        assert!(interpret_transfer_response(false, &json!({ "success": true })).is_err());
        assert!(interpret_transfer_response(true, &json!({ "success": false })).is_err());
        assert!(interpret_transfer_response(true, &json!({})).is_err());
        assert!(interpret_transfer_response(true, &Value::Null).is_err());
    }

    #[test]
    fn failure_surfaces_upstream_message() {
        let err = interpret_transfer_response(true, &json!({ "success": false, "message": "bad pin" }))
            .unwrap_err();
        assert_eq!(err, "bad pin");
    }

    #[test]
    fn pool_flag_serializes_only_when_set() {
        let plain = TransferRequest::new("2", "3", 50, "payout");
        let body = serde_json::to_value(&plain).unwrap();
        assert!(body.get("pool").is_none());

        let pooled = TransferRequest::new("2", "pool", 300, "fee").to_pool();
        let body = serde_json::to_value(&pooled).unwrap();
        assert_eq!(body.get("pool"), Some(&Value::Bool(true)));
    }
}

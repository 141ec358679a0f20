use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router};

use crate::{
    dtos::paymentdtos::TransferRelayDto,
    error::HttpError,
    middleware::AuthUser,
    service::payment::ExternalTransfer,
    AppState,
};

pub fn payment_handler() -> Router {
    Router::new().route("/transfer", post(relay_transfer))
}

/// Same-process relay to the external digipogs service. The body is
/// forwarded verbatim and the upstream status and payload come straight
/// back, so clients behind this server see the service's own answers.
pub async fn relay_transfer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<TransferRelayDto>,
) -> Result<impl IntoResponse, HttpError> {
    tracing::info!(
        "relaying transfer of {} from {} on behalf of {}",
        body.amount,
        body.from,
        auth.user.fb_id
    );

    let (status, payload) = ExternalTransfer::new(&app_state.env)
        .relay(&body)
        .await
        .map_err(HttpError::from)?;

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

    Ok((status, Json(payload)))
}

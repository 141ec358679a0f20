use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        userdtos::{FilterUserDto, SetPinDto},
        ApiResponse,
    },
    error::HttpError,
    middleware::AuthUser,
    service::guard,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/pin", put(set_pin))
}

pub async fn get_me(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let user = &auth.user;

    let filtered = FilterUserDto::filter_user(
        user,
        guard::is_super_admin(&user.fb_id),
        guard::is_manager(&user.fb_id, &app_state.env.managers),
    );

    Ok(Json(ApiResponse::success("User fetched", filtered)))
}

pub async fn set_pin(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SetPinDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .set_pin(&auth.user.fb_id, &body.pin)
        .await
        .map_err(|e| {
            tracing::error!("failed to set pin: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    let filtered = FilterUserDto::filter_user(
        &user,
        guard::is_super_admin(&user.fb_id),
        guard::is_manager(&user.fb_id, &app_state.env.managers),
    );

    Ok(Json(ApiResponse::success("PIN updated", filtered)))
}

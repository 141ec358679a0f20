use std::sync::Arc;

use axum::{
    extract::Query,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{LoginQueryDto, UserLoginResponseDto},
    error::{ErrorMessage, HttpError},
    utils::token,
    AppState,
};

/// Login entry point. Without a token the client is bounced to the external
/// identity provider; with one, the signature is verified, the local user
/// row upserted, and a session cookie issued.
pub async fn login(
    Query(query): Query<LoginQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let identity_token = match query.token {
        Some(token) if !token.is_empty() => token,
        _ => {
            let target = format!(
                "{}/oauth?redirectURL={}",
                app_state.env.auth_url.trim_end_matches('/'),
                app_state.env.this_url
            );
            return Ok(Redirect::temporary(&target).into_response());
        }
    };

    let claims =
        token::verify_identity_token(&identity_token, app_state.env.jwt_secret.as_bytes())
            .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let user = app_state
        .db_client
        .upsert_user(&claims.id, &claims.display_name)
        .await
        .map_err(|e| {
            tracing::error!("failed to upsert user on login: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    let session_token = token::create_token(
        &user.fb_id,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", session_token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let body = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token: session_token,
    });

    let mut response = body.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

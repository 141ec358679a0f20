use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};

use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::userdb::UserExt,
    error::{ErrorMessage, HttpError},
    models::usermodel::User,
    utils::token,
    AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Resolve the session subject from an optional token. A request without a
/// session identity (no token, or one that fails verification) is refused
/// with 403.
fn session_identity(token: Option<String>, secret: &[u8]) -> Result<String, HttpError> {
    let token = token
        .ok_or_else(|| HttpError::forbidden(ErrorMessage::TokenNotProvided.to_string()))?;

    token::decode_token(token, secret)
        .map_err(|_| HttpError::forbidden(ErrorMessage::InvalidToken.to_string()))
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let cookies = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    if auth_value.starts_with("Bearer ") {
                        Some(auth_value[7..].to_owned())
                    } else {
                        None
                    }
                })
        });

    let fb_id = session_identity(cookies, app_state.env.jwt_secret.as_bytes())?;

    let user = app_state
        .db_client
        .get_user(&fb_id)
        .await
        .map_err(|_| HttpError::forbidden(ErrorMessage::UserNoLongerExist.to_string()))?;

    let user = user
        .ok_or_else(|| HttpError::forbidden(ErrorMessage::UserNoLongerExist.to_string()))?;

    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn missing_token_is_forbidden() {
        let err = session_identity(None, SECRET).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn garbage_token_is_forbidden() {
        let err = session_identity(Some("not-a-jwt".to_string()), SECRET).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn valid_token_resolves_subject() {
        let token = token::create_token("42", SECRET, 60).unwrap();
        assert_eq!(session_identity(Some(token), SECRET).unwrap(), "42");
    }
}

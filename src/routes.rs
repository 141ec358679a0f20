use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        applications, auth as auth_handler, companies::companies_handler, jobs::jobs_handler,
        payment::payment_handler, positions::positions_handler, users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/users", users_handler())
        .nest("/companies", companies_handler())
        .nest("/jobs", jobs_handler())
        .nest("/positions", positions_handler())
        .nest("/digipogs", payment_handler())
        .layer(middleware::from_fn(auth))
        // uploads carry binary files, so the default body limit is too small
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(auth_handler::login))
        .route(
            "/files/:file_id",
            get(applications::get_file).layer(middleware::from_fn(auth)),
        )
        .nest("/api", api_route)
        .layer(Extension(app_state))
}

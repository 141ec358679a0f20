use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::companydb::CompanyExt,
    dtos::{
        companydtos::{CreateCompanyDto, UpdateCompanyDto},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    service::{
        guard,
        payment::{ExternalTransfer, PaymentPort, TransferRequest},
    },
    AppState,
};

pub fn companies_handler() -> Router {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/:company", put(update_company))
        .route(
            "/:company/jobs",
            get(super::jobs::list_company_jobs).post(super::jobs::create_job),
        )
        .route(
            "/:company/positions",
            get(super::positions::list_company_positions).post(super::positions::create_position),
        )
}

pub async fn list_companies(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let companies = app_state.db_client.list_companies().await.map_err(|e| {
        tracing::error!("failed to list companies: {}", e);
        HttpError::server_error("Internal Server Error")
    })?;

    Ok(Json(ApiResponse::success("Companies fetched", companies)))
}

/// Company creation is manager-only and payment-gated: the flat creation
/// fee moves to the pool account before the row is written. A declined
/// transfer leaves no local trace.
pub async fn create_company(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateCompanyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let subject = &auth.user.fb_id;
    if !guard::is_manager(subject, &app_state.env.managers) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let taken = app_state
        .db_client
        .company_name_taken(&body.name)
        .await
        .map_err(|e| {
            tracing::error!("failed to check company name: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;
    if taken {
        return Err(HttpError::conflict(format!(
            "A company named {} already exists",
            body.name
        )));
    }

    let fee = TransferRequest::new(
        subject.clone(),
        app_state.env.pool_account.clone(),
        app_state.env.company_fee,
        format!("Company creation: {}", body.name),
    )
    .with_pin(Some(body.pin.clone()))
    .to_pool();
    let reference = fee.reference;

    ExternalTransfer::new(&app_state.env).transfer(fee).await?;

    // Money has moved; a failure past this point is an inconsistency that
    // needs manual reconciliation.
    let company = app_state
        .db_client
        .create_company(
            &body.name,
            &body.description,
            &body.link,
            subject,
            &body.p_color,
            &body.s_color,
            &body.bp_color,
            &body.bs_color,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                "INCONSISTENCY: company creation fee transferred (reference {}) but insert failed for {}: {}",
                reference,
                body.name,
                e
            );
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Company created", company)))
}

pub async fn update_company(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(company_id): Path<i32>,
    Json(body): Json<UpdateCompanyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let company = app_state
        .db_client
        .get_company_by_id(company_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch company: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Company not found"))?;

    if !guard::can_manage(&auth.user.fb_id, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    if !body.name.eq_ignore_ascii_case(&company.name) {
        let taken = app_state
            .db_client
            .company_name_taken(&body.name)
            .await
            .map_err(|e| {
                tracing::error!("failed to check company name: {}", e);
                HttpError::server_error("Internal Server Error")
            })?;
        if taken {
            return Err(HttpError::conflict(format!(
                "A company named {} already exists",
                body.name
            )));
        }
    }

    let company = app_state
        .db_client
        .update_company(
            company_id,
            &body.name,
            &body.description,
            &body.link,
            body.p_color.as_deref(),
            body.s_color.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!("failed to update company: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Company updated", company)))
}

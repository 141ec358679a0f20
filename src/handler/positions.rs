use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{
        applicationdb::{ApplicationEntity, ApplicationExt},
        companydb::CompanyExt,
        jobdb::ApplicationRow,
        positiondb::{PositionExt, PositionTagRow},
        userdb::UserExt,
    },
    dtos::{
        positiondtos::{
            AcceptApplicantDto, ApplicantFileMeta, ApplicantSummary, CompletePositionDto,
            CreatePositionDto, PositionWithMeta,
        },
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    models::{
        companymodel::Company,
        positionmodel::{Position, PositionStatus},
    },
    service::{
        guard,
        payment::{LocalLedgerTransfer, PaymentPort, TransferRequest},
    },
    AppState,
};

pub fn positions_handler() -> Router {
    Router::new()
        .route("/:position_id/apply", post(super::applications::submit_position_application))
        .route("/:position_id/applicants", get(list_applicants))
        .route("/:position_id/accept", post(accept_applicant))
        .route("/:position_id/fire", post(fire_employee))
        .route("/:position_id/complete", post(complete_position))
}

fn with_position_meta(
    positions: Vec<Position>,
    applications: &[ApplicationRow],
    tags: &[PositionTagRow],
    viewer: &str,
) -> Vec<PositionWithMeta> {
    positions
        .into_iter()
        .map(|position| {
            let applicants_count = applications
                .iter()
                .filter(|row| row.entity_id == position.id)
                .count() as i64;
            let you_applied = applications
                .iter()
                .any(|row| row.entity_id == position.id && row.fb_id == viewer);
            let tags = tags
                .iter()
                .filter(|t| t.position_id == position.id)
                .map(|t| t.name.clone())
                .collect();
            PositionWithMeta {
                position,
                applicants_count,
                you_applied,
                tags,
            }
        })
        .collect()
}

/// Comma list -> trimmed, deduplicated, lowercased labels.
fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

async fn company_by_name(app_state: &AppState, name: &str) -> Result<Company, HttpError> {
    app_state
        .db_client
        .get_company_by_name(name)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch company: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Company not found"))
}

async fn position_with_company(
    app_state: &AppState,
    position_id: i32,
) -> Result<(Position, Company), HttpError> {
    let position = app_state
        .db_client
        .get_position(position_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch position: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Position not found"))?;

    let company = app_state
        .db_client
        .get_company_by_id(position.company_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch company: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Company not found"))?;

    Ok((position, company))
}

/// Open positions for everyone; the owner additionally sees in-progress and
/// completed rows.
pub async fn list_company_positions(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(company_name): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let company = company_by_name(&app_state, &company_name).await?;

    let viewer = &auth.user.fb_id;
    let positions = if guard::can_manage(viewer, &company.owner_id) {
        app_state.db_client.list_positions(company.id).await
    } else {
        app_state.db_client.list_open_positions(company.id).await
    }
    .map_err(|e| {
        tracing::error!("failed to list positions: {}", e);
        HttpError::server_error("Internal Server Error")
    })?;

    let ids: Vec<i32> = positions.iter().map(|p| p.id).collect();
    let applications = app_state
        .db_client
        .position_application_rows(&ids)
        .await
        .map_err(|e| {
            tracing::error!("failed to load position applications: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;
    let tags = app_state
        .db_client
        .tags_for_positions(&ids)
        .await
        .map_err(|e| {
            tracing::error!("failed to load position tags: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success(
        "Positions fetched",
        with_position_meta(positions, &applications, &tags, viewer),
    )))
}

pub async fn create_position(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(company_name): Path<String>,
    Json(body): Json<CreatePositionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let company = company_by_name(&app_state, &company_name).await?;

    if !guard::can_manage(&auth.user.fb_id, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let position = app_state
        .db_client
        .create_position(company.id, &body.title, &body.description, body.pay)
        .await
        .map_err(|e| {
            tracing::error!("failed to create position: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    if let Some(raw) = &body.tags {
        let tags = normalize_tags(raw);
        if !tags.is_empty() {
            app_state
                .db_client
                .attach_tags(position.id, &tags)
                .await
                .map_err(|e| {
                    tracing::error!("failed to attach tags: {}", e);
                    HttpError::server_error("Internal Server Error")
                })?;
        }
    }

    Ok(Json(ApiResponse::success("Position created", position)))
}

/// Owner view of everyone who applied, enriched with uploaded files and the
/// optional portfolio link.
pub async fn list_applicants(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(position_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let (_, company) = position_with_company(&app_state, position_id).await?;

    if !guard::can_manage(&auth.user.fb_id, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let applications = app_state
        .db_client
        .position_applications(position_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to load applications: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    let mut applicants = Vec::with_capacity(applications.len());
    for application in applications {
        let name = app_state
            .db_client
            .get_user(&application.fb_id)
            .await
            .map_err(|e| {
                tracing::error!("failed to fetch applicant: {}", e);
                HttpError::server_error("Internal Server Error")
            })?
            .map(|u| u.username)
            .unwrap_or_default();

        let files = app_state
            .db_client
            .files_for_application(application.id, ApplicationEntity::Position)
            .await
            .map_err(|e| {
                tracing::error!("failed to load application files: {}", e);
                HttpError::server_error("Internal Server Error")
            })?
            .into_iter()
            .map(|f| ApplicantFileMeta {
                id: f.id,
                field: f.field,
                original_name: f.original_name,
            })
            .collect();

        let portfolio_link = app_state
            .db_client
            .applicant_detail(application.id, ApplicationEntity::Position)
            .await
            .map_err(|e| {
                tracing::error!("failed to load applicant detail: {}", e);
                HttpError::server_error("Internal Server Error")
            })?
            .and_then(|d| d.portfolio_link);

        applicants.push(ApplicantSummary {
            fb_id: application.fb_id,
            name,
            application_id: application.id,
            files,
            portfolio_link,
        });
    }

    Ok(Json(ApiResponse::success("Applicants fetched", applicants)))
}

/// Accepting one applicant purges every application on the position; the
/// others are silently rejected.
pub async fn accept_applicant(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(position_id): Path<i32>,
    Json(body): Json<AcceptApplicantDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (position, company) = position_with_company(&app_state, position_id).await?;

    if !guard::can_manage(&auth.user.fb_id, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    if position.status == PositionStatus::InProgress || position.status == PositionStatus::Completed
    {
        return Err(HttpError::conflict("Position is no longer accepting applicants"));
    }

    app_state
        .db_client
        .get_user(&body.applicant_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch applicant: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Applicant not found"))?;

    let position = app_state
        .db_client
        .accept_applicant(position_id, &body.applicant_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to accept applicant: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Applicant accepted", position)))
}

pub async fn fire_employee(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(position_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let (_, company) = position_with_company(&app_state, position_id).await?;

    if !guard::can_manage(&auth.user.fb_id, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let fired = app_state
        .db_client
        .fire_employee(position_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fire employee: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    if !fired {
        return Err(HttpError::conflict("Position has no employee in progress"));
    }

    Ok(Json(ApiResponse::success("Employee removed", position_id)))
}

/// Position completion settles on the local ledger: owner balance down,
/// employee balance up, both checked before anything moves.
pub async fn complete_position(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(position_id): Path<i32>,
    Json(body): Json<CompletePositionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (position, company) = position_with_company(&app_state, position_id).await?;

    let subject = &auth.user.fb_id;
    if !guard::can_manage(subject, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    if position.status != PositionStatus::InProgress {
        return Err(HttpError::conflict("Position is not in progress"));
    }

    match position.employee_id.as_deref() {
        Some(employee) if employee == body.employee_id => {}
        _ => return Err(HttpError::bad_request("Employee does not hold this position")),
    }

    let payout = TransferRequest::new(
        subject.clone(),
        body.employee_id.clone(),
        body.pay,
        format!("Completed {}", position.title),
    )
    .with_pin(Some(body.pin.clone()));

    LocalLedgerTransfer::new(app_state.db_client.clone())
        .transfer(payout)
        .await?;

    let position = app_state
        .db_client
        .mark_position_completed(position_id)
        .await
        .map_err(|e| {
            tracing::error!(
                "INCONSISTENCY: position payout settled but position {} was not marked completed: {}",
                position_id,
                e
            );
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Position completed", position)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_deduplicated_lowercased() {
        assert_eq!(
            normalize_tags(" Art,  design ,art, , CODE"),
            vec!["art", "design", "code"]
        );
        assert!(normalize_tags("  ,  ,").is_empty());
    }

    #[test]
    fn position_meta_matches_rows() {
        let positions = vec![Position {
            id: 5,
            company_id: 1,
            title: "Editor".to_string(),
            description: "Edit".to_string(),
            pay: 10,
            employee_id: None,
            status: PositionStatus::Available,
        }];
        let applications = vec![
            ApplicationRow { entity_id: 5, fb_id: "7".to_string() },
            ApplicationRow { entity_id: 5, fb_id: "9".to_string() },
        ];
        let tags = vec![PositionTagRow { position_id: 5, name: "art".to_string() }];

        let meta = with_position_meta(positions, &applications, &tags, "9");
        assert_eq!(meta[0].applicants_count, 2);
        assert!(meta[0].you_applied);
        assert_eq!(meta[0].tags, vec!["art"]);
    }
}

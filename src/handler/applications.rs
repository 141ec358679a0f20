use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query},
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    db::{
        applicationdb::{ApplicationEntity, ApplicationExt},
        jobdb::JobExt,
        positiondb::PositionExt,
    },
    dtos::{paymentdtos::FileQueryDto, ApiResponse},
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    service::{
        files::{content_type_for, validate_upload, FileField},
        guard,
    },
    AppState,
};

struct UploadedFile {
    field: FileField,
    original_name: String,
    mime: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct IntakeForm {
    first_name: String,
    last_name: String,
    portfolio_link: Option<String>,
    files: Vec<UploadedFile>,
}

/// Drain the multipart body into memory. Unknown fields are ignored; every
/// file is validated here, before anything touches the database.
async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, HttpError> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "first_name" => {
                form.first_name = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "last_name" => {
                form.last_name = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "portfolio_link" => {
                let link = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                if !link.is_empty() {
                    form.portfolio_link = Some(link);
                }
            }
            _ => {
                let Some(file_field) = FileField::parse(&name) else {
                    continue;
                };
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let mime = field.content_type().map(|m| m.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?
                    .to_vec();

                validate_upload(file_field, &original_name, mime.as_deref())?;

                form.files.push(UploadedFile {
                    field: file_field,
                    original_name,
                    mime,
                    data,
                });
            }
        }
    }

    Ok(form)
}

async fn persist_intake(
    app_state: &AppState,
    application_id: i32,
    entity: ApplicationEntity,
    form: &IntakeForm,
) -> Result<(), HttpError> {
    app_state
        .db_client
        .save_applicant_detail(
            application_id,
            entity,
            &form.first_name,
            &form.last_name,
            form.portfolio_link.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!("failed to save applicant detail: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    for file in &form.files {
        app_state
            .db_client
            .save_application_file(
                application_id,
                entity,
                file.field.as_str(),
                &file.original_name,
                file.mime.as_deref().unwrap_or(""),
                &file.data,
            )
            .await
            .map_err(|e| {
                tracing::error!("failed to save application file: {}", e);
                HttpError::server_error("Internal Server Error")
            })?;
    }

    Ok(())
}

/// Register interest in a job with the applicant's details and uploads.
/// Re-submitting reuses the same application row.
pub async fn submit_job_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_job(job_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch job: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let form = read_intake_form(multipart).await?;

    let application_id = app_state
        .db_client
        .ensure_job_application(job_id, &auth.user.fb_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to register job application: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    persist_intake(&app_state, application_id, ApplicationEntity::Job, &form).await?;

    Ok(Json(ApiResponse::success("Application submitted", application_id)))
}

/// Multipart application to a position. The status only moves
/// available -> applied; later states are never overwritten.
pub async fn submit_position_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(position_id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_position(position_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch position: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Position not found"))?;

    let form = read_intake_form(multipart).await?;

    let application_id = app_state
        .db_client
        .ensure_position_application(position_id, &auth.user.fb_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to register position application: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    persist_intake(&app_state, application_id, ApplicationEntity::Position, &form).await?;

    app_state
        .db_client
        .mark_applied_if_available(position_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to update position status: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Application submitted", application_id)))
}

/// Serve a stored upload to the company owner (or the super admin).
/// `?inline=1` renders in the browser, otherwise a download is forced.
pub async fn get_file(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(file_id): Path<i32>,
    Query(query): Query<FileQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let stored = app_state
        .db_client
        .get_stored_file(file_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch stored file: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("File not found"))?;

    let subject = &auth.user.fb_id;
    let allowed = match &stored.owner_id {
        Some(owner) => guard::can_manage(subject, owner),
        None => guard::is_super_admin(subject),
    };
    if !allowed {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let content_type = content_type_for(&stored.original_name, stored.mime.as_deref());
    let disposition = match query.inline.as_deref() {
        Some(v) if v != "0" => "inline".to_string(),
        _ => format!("attachment; filename=\"{}\"", stored.original_name.replace('"', "")),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        stored.data,
    ))
}

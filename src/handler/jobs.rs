use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{
        companydb::CompanyExt,
        jobdb::{ApplicationRow, JobExt},
    },
    dtos::{
        jobdtos::{CompanyJobsResponse, CompleteJobDto, CreateJobDto, JobWithApplicants, UpdateJobDto},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    models::jobmodel::{JobListing, JobStatus},
    service::{
        guard,
        payment::{ExternalTransfer, PaymentPort, TransferRequest},
    },
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", get(list_all_jobs))
        .route("/:job_id", put(update_job))
        .route("/:job_id/apply", post(apply_for_job))
        .route("/:job_id/interest", post(super::applications::submit_job_application))
        .route("/:job_id/complete", post(complete_job))
}

/// Attach the applicant count and the viewer's own applied marker to each
/// listing row.
fn with_applicant_meta(
    jobs: Vec<JobListing>,
    applications: &[ApplicationRow],
    viewer: &str,
) -> Vec<JobWithApplicants> {
    jobs.into_iter()
        .map(|job| {
            let applicants_count = applications
                .iter()
                .filter(|row| row.entity_id == job.id)
                .count() as i64;
            let you_applied = applications
                .iter()
                .any(|row| row.entity_id == job.id && row.fb_id == viewer);
            JobWithApplicants {
                job,
                applicants_count,
                you_applied,
            }
        })
        .collect()
}

pub async fn list_all_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.db_client.list_all_jobs().await.map_err(|e| {
        tracing::error!("failed to list jobs: {}", e);
        HttpError::server_error("Internal Server Error")
    })?;

    let ids: Vec<i32> = jobs.iter().map(|j| j.id).collect();
    let applications = app_state
        .db_client
        .job_application_rows(&ids)
        .await
        .map_err(|e| {
            tracing::error!("failed to load job applications: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(CompanyJobsResponse {
        status: "success".to_string(),
        jobs: with_applicant_meta(jobs, &applications, &auth.user.fb_id),
    }))
}

pub async fn list_company_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(company_name): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .db_client
        .list_company_jobs(&company_name)
        .await
        .map_err(|e| {
            tracing::error!("failed to list company jobs: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    let ids: Vec<i32> = jobs.iter().map(|j| j.id).collect();
    let applications = app_state
        .db_client
        .job_application_rows(&ids)
        .await
        .map_err(|e| {
            tracing::error!("failed to load job applications: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(CompanyJobsResponse {
        status: "success".to_string(),
        jobs: with_applicant_meta(jobs, &applications, &auth.user.fb_id),
    }))
}

/// Posting a job is owner-only and payment-gated by the flat job fee.
pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(company_name): Path<String>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let company = app_state
        .db_client
        .get_company_by_name(&company_name)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch company: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Company not found"))?;

    let subject = &auth.user.fb_id;
    if !guard::can_manage(subject, &company.owner_id) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let fee = TransferRequest::new(
        subject.clone(),
        app_state.env.pool_account.clone(),
        app_state.env.job_fee,
        format!("Job post: {} @ {}", body.title, company.name),
    )
    .with_pin(Some(body.pin.clone()))
    .to_pool();
    let reference = fee.reference;

    ExternalTransfer::new(&app_state.env).transfer(fee).await?;

    let job = app_state
        .db_client
        .create_job(
            &company.name,
            &body.title,
            &body.description,
            body.link.as_deref(),
            body.pay,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                "INCONSISTENCY: job posting fee transferred (reference {}) but insert failed for {}: {}",
                reference,
                body.title,
                e
            );
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Job created", job)))
}

pub async fn update_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<i32>,
    Json(body): Json<UpdateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .db_client
        .get_job_with_owner(job_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch job: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    let owner = job.owner_id.clone().unwrap_or_default();
    if !guard::can_manage(&auth.user.fb_id, &owner) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let job = app_state
        .db_client
        .update_job(job_id, &body.title, &body.description, body.pay, body.link.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("failed to update job: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Job updated", job)))
}

/// First-come claim. The conditional update in the store guarantees exactly
/// one winner; everyone else gets 409.
pub async fn apply_for_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<i32>,
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

    let claimed = app_state
        .db_client
        .claim_job(job_id, &auth.user.fb_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to claim job: {}", e);
            HttpError::server_error("Internal Server Error")
        })?;

    if !claimed {
        return Err(HttpError::conflict("Job has already been taken"));
    }

    Ok(Json(ApiResponse::success("Job claimed", job_id)))
}

/// Completion has two legal shapes: the assigned employee flips the status
/// themselves, or the owner pays the employee out through the external
/// transfer service and the row is then marked completed.
pub async fn complete_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<i32>,
    Json(body): Json<CompleteJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .db_client
        .get_job_with_owner(job_id)
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch job: {}", e);
            HttpError::server_error("Internal Server Error")
        })?
        .ok_or_else(|| HttpError::not_found("Job not found"))?;

    if job.status == JobStatus::Completed {
        return Err(HttpError::conflict("Job is already completed"));
    }

    let subject = &auth.user.fb_id;

    if job.employee_id.as_deref() == Some(subject.as_str()) {
        let flipped = app_state
            .db_client
            .complete_job_by_employee(job_id, subject)
            .await
            .map_err(|e| {
                tracing::error!("failed to complete job: {}", e);
                HttpError::server_error("Internal Server Error")
            })?;
        if !flipped {
            return Err(HttpError::conflict("Job could not be completed"));
        }
        return Ok(Json(ApiResponse::success("Job completed", job_id)).into_response());
    }

    let owner = job.owner_id.clone().unwrap_or_default();
    if !guard::can_manage(subject, &owner) {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let employee = job
        .employee_id
        .clone()
        .ok_or_else(|| HttpError::bad_request("Job has no assigned employee to pay"))?;

    let reason = body
        .reason
        .clone()
        .unwrap_or_else(|| format!("Completed {}", job.title));

    let payout = TransferRequest::new(subject.clone(), employee, job.pay, reason)
        .with_pin(body.pin.clone());
    let reference = payout.reference;

    ExternalTransfer::new(&app_state.env).transfer(payout).await?;

    let job = app_state
        .db_client
        .mark_job_completed(job_id)
        .await
        .map_err(|e| {
            tracing::error!(
                "INCONSISTENCY: payout transferred (reference {}) but job {} was not marked completed: {}",
                reference,
                job_id,
                e
            );
            HttpError::server_error("Internal Server Error")
        })?;

    Ok(Json(ApiResponse::success("Job completed", job)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: i32) -> JobListing {
        JobListing {
            id,
            company: "Acme".to_string(),
            title: "Courier".to_string(),
            description: "Deliver things".to_string(),
            link: None,
            pay: 50,
            employee_id: None,
            status: JobStatus::Available,
            company_link: None,
            employee_name: None,
        }
    }

    #[test]
    fn applicant_meta_counts_per_job() {
        let rows = vec![
            ApplicationRow { entity_id: 1, fb_id: "7".to_string() },
            ApplicationRow { entity_id: 1, fb_id: "8".to_string() },
            ApplicationRow { entity_id: 2, fb_id: "7".to_string() },
        ];

        let enriched = with_applicant_meta(vec![listing(1), listing(2), listing(3)], &rows, "7");

        assert_eq!(enriched[0].applicants_count, 2);
        assert!(enriched[0].you_applied);
        assert_eq!(enriched[1].applicants_count, 1);
        assert!(enriched[1].you_applied);
        assert_eq!(enriched[2].applicants_count, 0);
        assert!(!enriched[2].you_applied);
    }

    #[test]
    fn applicant_meta_viewer_not_applied() {
        let rows = vec![ApplicationRow { entity_id: 1, fb_id: "8".to_string() }];
        let enriched = with_applicant_meta(vec![listing(1)], &rows, "7");
        assert!(!enriched[0].you_applied);
        assert_eq!(enriched[0].applicants_count, 1);
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::Error;

use super::db::DBClient;
use crate::models::jobmodel::{Job, JobListing};

const JOB_COLUMNS: &str = "id, company, title, description, link, pay, employee_id, status";

/// A job joined with the owning company's owner id, used by the
/// authorization guard when only a job id is known.
#[derive(Debug, sqlx::FromRow)]
pub struct JobWithOwner {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub pay: i64,
    pub employee_id: Option<String>,
    pub status: crate::models::jobmodel::JobStatus,
    pub owner_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApplicationRow {
    pub entity_id: i32,
    pub fb_id: String,
}

#[async_trait]
pub trait JobExt {
    async fn list_all_jobs(&self) -> Result<Vec<JobListing>, Error>;

    async fn list_company_jobs(&self, company_name: &str) -> Result<Vec<JobListing>, Error>;

    async fn get_job(&self, job_id: i32) -> Result<Option<Job>, Error>;

    async fn get_job_with_owner(&self, job_id: i32) -> Result<Option<JobWithOwner>, Error>;

    async fn create_job(
        &self,
        company_name: &str,
        title: &str,
        description: &str,
        link: Option<&str>,
        pay: i64,
    ) -> Result<Job, Error>;

    async fn update_job(
        &self,
        job_id: i32,
        title: &str,
        description: &str,
        pay: i64,
        link: Option<&str>,
    ) -> Result<Job, Error>;

    /// First-come claim: a single conditional UPDATE so concurrent applies
    /// have exactly one winner. Returns false when the slot was taken.
    async fn claim_job(&self, job_id: i32, fb_id: &str) -> Result<bool, Error>;

    async fn job_application_rows(&self, job_ids: &[i32]) -> Result<Vec<ApplicationRow>, Error>;

    /// Employee-initiated completion: trusted status flip, valid only for
    /// the assigned employee.
    async fn complete_job_by_employee(&self, job_id: i32, fb_id: &str) -> Result<bool, Error>;

    /// Owner-initiated completion after a successful payout. Marks the row
    /// completed rather than deleting it so history survives.
    async fn mark_job_completed(&self, job_id: i32) -> Result<Job, Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn list_all_jobs(&self) -> Result<Vec<JobListing>, Error> {
        sqlx::query_as::<_, JobListing>(
            r#"
            SELECT j.id, j.company, j.title, j.description, j.link, j.pay,
                   j.employee_id, j.status,
                   c.link AS company_link,
                   u.username AS employee_name
            FROM jobs j
            LEFT JOIN companies c ON LOWER(j.company) = LOWER(c.name)
            LEFT JOIN users u ON j.employee_id = u.fb_id
            ORDER BY j.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn list_company_jobs(&self, company_name: &str) -> Result<Vec<JobListing>, Error> {
        sqlx::query_as::<_, JobListing>(
            r#"
            SELECT j.id, j.company, j.title, j.description, j.link, j.pay,
                   j.employee_id, j.status,
                   c.link AS company_link,
                   u.username AS employee_name
            FROM jobs j
            LEFT JOIN companies c ON LOWER(j.company) = LOWER(c.name)
            LEFT JOIN users u ON j.employee_id = u.fb_id
            WHERE LOWER(j.company) = LOWER($1)
            ORDER BY j.id DESC
            "#,
        )
        .bind(company_name)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_job(&self, job_id: i32) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_job_with_owner(&self, job_id: i32) -> Result<Option<JobWithOwner>, Error> {
        sqlx::query_as::<_, JobWithOwner>(
            r#"
            SELECT j.id, j.company, j.title, j.description, j.link, j.pay,
                   j.employee_id, j.status, c.owner_id
            FROM jobs j
            LEFT JOIN companies c ON LOWER(j.company) = LOWER(c.name)
            WHERE j.id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_job(
        &self,
        company_name: &str,
        title: &str,
        description: &str,
        link: Option<&str>,
        pay: i64,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (company, title, description, link, pay)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(company_name)
        .bind(title)
        .bind(description)
        .bind(link)
        .bind(pay)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_job(
        &self,
        job_id: i32,
        title: &str,
        description: &str,
        pay: i64,
        link: Option<&str>,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, pay = $4, link = COALESCE($5, '')
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(title)
        .bind(description)
        .bind(pay)
        .bind(link)
        .fetch_one(&self.pool)
        .await
    }

    async fn claim_job(&self, job_id: i32, fb_id: &str) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET employee_id = $2, status = 'taken'
            WHERE id = $1 AND employee_id IS NULL
            "#,
        )
        .bind(job_id)
        .bind(fb_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn job_application_rows(&self, job_ids: &[i32]) -> Result<Vec<ApplicationRow>, Error> {
        sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT job_id AS entity_id, fb_id
            FROM job_applications
            WHERE job_id = ANY($1)
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn complete_job_by_employee(&self, job_id: i32, fb_id: &str) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE jobs SET status = 'completed'
            WHERE id = $1 AND employee_id = $2
            "#,
        )
        .bind(job_id)
        .bind(fb_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_job_completed(&self, job_id: i32) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs SET status = 'completed'
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
    }
}

use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::filemodel::{ApplicantDetail, ApplicationFile, StoredFile};

/// Which table an application row belongs to. Details and files for both
/// kinds share storage, disambiguated by this marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationEntity {
    Job,
    Position,
}

impl ApplicationEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationEntity::Job => "job",
            ApplicationEntity::Position => "position",
        }
    }
}

#[async_trait]
pub trait ApplicationExt {
    /// Insert-or-fetch the job application row, returning its id.
    async fn ensure_job_application(&self, job_id: i32, fb_id: &str) -> Result<i32, Error>;

    /// Insert-or-fetch the position application row, returning its id.
    async fn ensure_position_application(&self, position_id: i32, fb_id: &str)
        -> Result<i32, Error>;

    async fn save_applicant_detail(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
        first_name: &str,
        last_name: &str,
        portfolio_link: Option<&str>,
    ) -> Result<(), Error>;

    async fn save_application_file(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
        field: &str,
        original_name: &str,
        mime: &str,
        data: &[u8],
    ) -> Result<i32, Error>;

    async fn files_for_application(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
    ) -> Result<Vec<ApplicationFile>, Error>;

    async fn applicant_detail(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
    ) -> Result<Option<ApplicantDetail>, Error>;

    /// Fetch a stored file with the owning company's owner id resolved
    /// through whichever join path the row's entity marker selects.
    async fn get_stored_file(&self, file_id: i32) -> Result<Option<StoredFile>, Error>;
}

#[async_trait]
impl ApplicationExt for DBClient {
    async fn ensure_job_application(&self, job_id: i32, fb_id: &str) -> Result<i32, Error> {
        sqlx::query(
            r#"
            INSERT INTO job_applications (job_id, fb_id)
            VALUES ($1, $2)
            ON CONFLICT (job_id, fb_id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(fb_id)
        .execute(&self.pool)
        .await?;

        let (id,): (i32,) = sqlx::query_as(
            r#"SELECT id FROM job_applications WHERE job_id = $1 AND fb_id = $2"#,
        )
        .bind(job_id)
        .bind(fb_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn ensure_position_application(
        &self,
        position_id: i32,
        fb_id: &str,
    ) -> Result<i32, Error> {
        sqlx::query(
            r#"
            INSERT INTO position_applications (position_id, fb_id)
            VALUES ($1, $2)
            ON CONFLICT (position_id, fb_id) DO NOTHING
            "#,
        )
        .bind(position_id)
        .bind(fb_id)
        .execute(&self.pool)
        .await?;

        let (id,): (i32,) = sqlx::query_as(
            r#"SELECT id FROM position_applications WHERE position_id = $1 AND fb_id = $2"#,
        )
        .bind(position_id)
        .bind(fb_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn save_applicant_detail(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
        first_name: &str,
        last_name: &str,
        portfolio_link: Option<&str>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO job_applicant_details (application_id, entity, first_name, last_name, portfolio_link)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(application_id)
        .bind(entity.as_str())
        .bind(first_name)
        .bind(last_name)
        .bind(portfolio_link)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_application_file(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
        field: &str,
        original_name: &str,
        mime: &str,
        data: &[u8],
    ) -> Result<i32, Error> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO job_application_files (application_id, entity, field, original_name, mime, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(application_id)
        .bind(entity.as_str())
        .bind(field)
        .bind(original_name)
        .bind(mime)
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn files_for_application(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
    ) -> Result<Vec<ApplicationFile>, Error> {
        sqlx::query_as::<_, ApplicationFile>(
            r#"
            SELECT id, application_id, field, original_name, mime
            FROM job_application_files
            WHERE application_id = $1 AND entity = $2
            ORDER BY id ASC
            "#,
        )
        .bind(application_id)
        .bind(entity.as_str())
        .fetch_all(&self.pool)
        .await
    }

    async fn applicant_detail(
        &self,
        application_id: i32,
        entity: ApplicationEntity,
    ) -> Result<Option<ApplicantDetail>, Error> {
        sqlx::query_as::<_, ApplicantDetail>(
            r#"
            SELECT id, application_id, first_name, last_name, portfolio_link
            FROM job_applicant_details
            WHERE application_id = $1 AND entity = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .bind(entity.as_str())
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_stored_file(&self, file_id: i32) -> Result<Option<StoredFile>, Error> {
        sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT f.original_name, f.mime, f.data,
                   CASE f.entity
                       WHEN 'position' THEN pc.owner_id
                       ELSE jc.owner_id
                   END AS owner_id
            FROM job_application_files f
            LEFT JOIN position_applications pa
                ON f.entity = 'position' AND pa.id = f.application_id
            LEFT JOIN company_positions cp ON cp.id = pa.position_id
            LEFT JOIN companies pc ON pc.id = cp.company_id
            LEFT JOIN job_applications ja
                ON f.entity = 'job' AND ja.id = f.application_id
            LEFT JOIN jobs j ON j.id = ja.job_id
            LEFT JOIN companies jc ON LOWER(jc.name) = LOWER(j.company)
            WHERE f.id = $1
            "#,
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
    }
}

use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use super::jobdb::ApplicationRow;
use crate::models::positionmodel::{Position, PositionApplication};

const POSITION_COLUMNS: &str = "id, company_id, title, description, pay, employee_id, status";

#[derive(Debug, sqlx::FromRow)]
pub struct PositionTagRow {
    pub position_id: i32,
    pub name: String,
}

#[async_trait]
pub trait PositionExt {
    /// Positions still accepting applicants (available or applied).
    async fn list_open_positions(&self, company_id: i32) -> Result<Vec<Position>, Error>;

    /// Every position of a company, for the owner's manager view.
    async fn list_positions(&self, company_id: i32) -> Result<Vec<Position>, Error>;

    async fn get_position(&self, position_id: i32) -> Result<Option<Position>, Error>;

    async fn create_position(
        &self,
        company_id: i32,
        title: &str,
        description: &str,
        pay: i64,
    ) -> Result<Position, Error>;

    /// Upserts each tag and links it; both steps are idempotent.
    async fn attach_tags(&self, position_id: i32, tags: &[String]) -> Result<(), Error>;

    async fn tags_for_positions(&self, position_ids: &[i32]) -> Result<Vec<PositionTagRow>, Error>;

    /// Flip available -> applied; never regresses an in-progress or
    /// completed position.
    async fn mark_applied_if_available(&self, position_id: i32) -> Result<(), Error>;

    async fn position_applications(&self, position_id: i32) -> Result<Vec<PositionApplication>, Error>;

    async fn position_application_rows(
        &self,
        position_ids: &[i32],
    ) -> Result<Vec<ApplicationRow>, Error>;

    /// Assign the applicant and purge every application for the position.
    /// Other applicants are silently rejected by design.
    async fn accept_applicant(&self, position_id: i32, applicant_id: &str) -> Result<Position, Error>;

    /// Only valid from in_progress; returns false otherwise.
    async fn fire_employee(&self, position_id: i32) -> Result<bool, Error>;

    async fn mark_position_completed(&self, position_id: i32) -> Result<Position, Error>;
}

#[async_trait]
impl PositionExt for DBClient {
    async fn list_open_positions(&self, company_id: i32) -> Result<Vec<Position>, Error> {
        sqlx::query_as::<_, Position>(&format!(
            r#"
            SELECT {POSITION_COLUMNS} FROM company_positions
            WHERE company_id = $1 AND status IN ('available', 'applied')
            ORDER BY id DESC
            "#
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_positions(&self, company_id: i32) -> Result<Vec<Position>, Error> {
        sqlx::query_as::<_, Position>(&format!(
            r#"
            SELECT {POSITION_COLUMNS} FROM company_positions
            WHERE company_id = $1
            ORDER BY id DESC
            "#
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_position(&self, position_id: i32) -> Result<Option<Position>, Error> {
        sqlx::query_as::<_, Position>(&format!(
            "SELECT {POSITION_COLUMNS} FROM company_positions WHERE id = $1"
        ))
        .bind(position_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_position(
        &self,
        company_id: i32,
        title: &str,
        description: &str,
        pay: i64,
    ) -> Result<Position, Error> {
        sqlx::query_as::<_, Position>(&format!(
            r#"
            INSERT INTO company_positions (company_id, title, description, pay)
            VALUES ($1, $2, $3, $4)
            RETURNING {POSITION_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(title)
        .bind(description)
        .bind(pay)
        .fetch_one(&self.pool)
        .await
    }

    async fn attach_tags(&self, position_id: i32, tags: &[String]) -> Result<(), Error> {
        for tag in tags {
            sqlx::query(r#"INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING"#)
                .bind(tag)
                .execute(&self.pool)
                .await?;

            let tag_id: Option<(i32,)> = sqlx::query_as(r#"SELECT id FROM tags WHERE name = $1"#)
                .bind(tag)
                .fetch_optional(&self.pool)
                .await?;

            if let Some((tag_id,)) = tag_id {
                sqlx::query(
                    r#"
                    INSERT INTO position_tags (position_id, tag_id)
                    VALUES ($1, $2)
                    ON CONFLICT DO NOTHING
                    "#,
                )
                .bind(position_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await?;
            }
        }

        Ok(())
    }

    async fn tags_for_positions(&self, position_ids: &[i32]) -> Result<Vec<PositionTagRow>, Error> {
        sqlx::query_as::<_, PositionTagRow>(
            r#"
            SELECT pt.position_id, t.name
            FROM position_tags pt
            JOIN tags t ON pt.tag_id = t.id
            WHERE pt.position_id = ANY($1)
            "#,
        )
        .bind(position_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_applied_if_available(&self, position_id: i32) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE company_positions SET status = 'applied'
            WHERE id = $1 AND status = 'available'
            "#,
        )
        .bind(position_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn position_applications(&self, position_id: i32) -> Result<Vec<PositionApplication>, Error> {
        sqlx::query_as::<_, PositionApplication>(
            r#"
            SELECT id, position_id, fb_id, applied_at
            FROM position_applications
            WHERE position_id = $1
            ORDER BY applied_at ASC
            "#,
        )
        .bind(position_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn position_application_rows(
        &self,
        position_ids: &[i32],
    ) -> Result<Vec<ApplicationRow>, Error> {
        sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT position_id AS entity_id, fb_id
            FROM position_applications
            WHERE position_id = ANY($1)
            "#,
        )
        .bind(position_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn accept_applicant(&self, position_id: i32, applicant_id: &str) -> Result<Position, Error> {
        let position = sqlx::query_as::<_, Position>(&format!(
            r#"
            UPDATE company_positions
            SET employee_id = $2, status = 'in_progress'
            WHERE id = $1
            RETURNING {POSITION_COLUMNS}
            "#
        ))
        .bind(position_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query(r#"DELETE FROM position_applications WHERE position_id = $1"#)
            .bind(position_id)
            .execute(&self.pool)
            .await?;

        Ok(position)
    }

    async fn fire_employee(&self, position_id: i32) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE company_positions
            SET employee_id = NULL, status = 'available'
            WHERE id = $1 AND status = 'in_progress'
            "#,
        )
        .bind(position_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_position_completed(&self, position_id: i32) -> Result<Position, Error> {
        sqlx::query_as::<_, Position>(&format!(
            r#"
            UPDATE company_positions SET status = 'completed'
            WHERE id = $1
            RETURNING {POSITION_COLUMNS}
            "#
        ))
        .bind(position_id)
        .fetch_one(&self.pool)
        .await
    }
}

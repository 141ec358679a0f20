use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::companymodel::Company;

const COMPANY_COLUMNS: &str =
    "id, name, description, link, owner_id, p_color, s_color, bp_color, bs_color, verified";

#[async_trait]
pub trait CompanyExt {
    async fn list_companies(&self) -> Result<Vec<Company>, Error>;

    async fn get_company_by_id(&self, id: i32) -> Result<Option<Company>, Error>;

    /// Company names are unique case-insensitively, so lookups by name
    /// always fold case.
    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>, Error>;

    async fn company_name_taken(&self, name: &str) -> Result<bool, Error>;

    async fn create_company(
        &self,
        name: &str,
        description: &str,
        link: &str,
        owner_id: &str,
        p_color: &str,
        s_color: &str,
        bp_color: &str,
        bs_color: &str,
    ) -> Result<Company, Error>;

    async fn update_company(
        &self,
        id: i32,
        name: &str,
        description: &str,
        link: &str,
        p_color: Option<&str>,
        s_color: Option<&str>,
    ) -> Result<Company, Error>;
}

#[async_trait]
impl CompanyExt for DBClient {
    async fn list_companies(&self) -> Result<Vec<Company>, Error> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_company_by_id(&self, id: i32) -> Result<Option<Company>, Error> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>, Error> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE LOWER(name) = LOWER($1)"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn company_name_taken(&self, name: &str) -> Result<bool, Error> {
        let row: Option<(i32,)> =
            sqlx::query_as(r#"SELECT id FROM companies WHERE LOWER(name) = LOWER($1)"#)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    async fn create_company(
        &self,
        name: &str,
        description: &str,
        link: &str,
        owner_id: &str,
        p_color: &str,
        s_color: &str,
        bp_color: &str,
        bs_color: &str,
    ) -> Result<Company, Error> {
        sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (name, description, link, owner_id, p_color, s_color, bp_color, bs_color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(link)
        .bind(owner_id)
        .bind(p_color)
        .bind(s_color)
        .bind(bp_color)
        .bind(bs_color)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_company(
        &self,
        id: i32,
        name: &str,
        description: &str,
        link: &str,
        p_color: Option<&str>,
        s_color: Option<&str>,
    ) -> Result<Company, Error> {
        sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET name = $2,
                description = $3,
                link = $4,
                p_color = COALESCE($5, p_color),
                s_color = COALESCE($6, s_color)
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(link)
        .bind(p_color)
        .bind(s_color)
        .fetch_one(&self.pool)
        .await
    }
}

use async_trait::async_trait;
use sqlx::Error;

use super::db::DBClient;
use crate::models::usermodel::User;

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, fb_id: &str) -> Result<Option<User>, Error>;

    /// Idempotent first-login upsert keyed by subject id. The display name
    /// is refreshed on every login.
    async fn upsert_user(&self, fb_id: &str, username: &str) -> Result<User, Error>;

    async fn set_pin(&self, fb_id: &str, pin: &str) -> Result<User, Error>;

    /// Conditional debit: returns false when the balance would go negative.
    async fn debit_user(&self, fb_id: &str, amount: i64) -> Result<bool, Error>;

    async fn credit_user(&self, fb_id: &str, amount: i64) -> Result<(), Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, fb_id: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT fb_id, username, money, pin FROM users WHERE fb_id = $1"#,
        )
        .bind(fb_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_user(&self, fb_id: &str, username: &str) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (fb_id, username)
            VALUES ($1, $2)
            ON CONFLICT (fb_id) DO UPDATE SET username = EXCLUDED.username
            RETURNING fb_id, username, money, pin
            "#,
        )
        .bind(fb_id)
        .bind(username)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_pin(&self, fb_id: &str, pin: &str) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET pin = $2 WHERE fb_id = $1
            RETURNING fb_id, username, money, pin
            "#,
        )
        .bind(fb_id)
        .bind(pin)
        .fetch_one(&self.pool)
        .await
    }

    async fn debit_user(&self, fb_id: &str, amount: i64) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"UPDATE users SET money = money - $2 WHERE fb_id = $1 AND money >= $2"#,
        )
        .bind(fb_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn credit_user(&self, fb_id: &str, amount: i64) -> Result<(), Error> {
        sqlx::query(r#"UPDATE users SET money = money + $2 WHERE fb_id = $1"#)
            .bind(fb_id)
            .bind(amount)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

use sqlx::{Pool, Postgres};

/// Eager, idempotent schema creation at startup. Every statement tolerates
/// re-execution; optional columns are added with `IF NOT EXISTS` so an
/// older database upgrades in place without a separate migration step.
pub async fn init_schema(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    let statements: &[&str] = &[
        r#"
        DO $$ BEGIN
            CREATE TYPE job_status AS ENUM ('available', 'taken', 'completed');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$
        "#,
        r#"
        DO $$ BEGIN
            CREATE TYPE position_status AS ENUM ('available', 'applied', 'in_progress', 'completed');
        EXCEPTION WHEN duplicate_object THEN NULL;
        END $$
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            fb_id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            money BIGINT NOT NULL DEFAULT 0,
            pin TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            link TEXT NOT NULL,
            owner_id TEXT NOT NULL,
            p_color TEXT NOT NULL DEFAULT '',
            s_color TEXT NOT NULL DEFAULT '',
            bp_color TEXT NOT NULL DEFAULT '',
            bs_color TEXT NOT NULL DEFAULT '',
            verified BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id SERIAL PRIMARY KEY,
            company TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            link TEXT,
            pay BIGINT NOT NULL DEFAULT 0,
            employee_id TEXT,
            status job_status NOT NULL DEFAULT 'available'
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS company_positions (
            id SERIAL PRIMARY KEY,
            company_id INTEGER NOT NULL REFERENCES companies(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            pay BIGINT NOT NULL DEFAULT 0,
            employee_id TEXT,
            status position_status NOT NULL DEFAULT 'available'
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_applications (
            id SERIAL PRIMARY KEY,
            job_id INTEGER NOT NULL,
            fb_id TEXT NOT NULL,
            applied_at TIMESTAMPTZ DEFAULT NOW(),
            UNIQUE (job_id, fb_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS position_applications (
            id SERIAL PRIMARY KEY,
            position_id INTEGER NOT NULL,
            fb_id TEXT NOT NULL,
            applied_at TIMESTAMPTZ DEFAULT NOW(),
            UNIQUE (position_id, fb_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_applicant_details (
            id SERIAL PRIMARY KEY,
            application_id INTEGER NOT NULL,
            entity TEXT NOT NULL DEFAULT 'job',
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            portfolio_link TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS job_application_files (
            id SERIAL PRIMARY KEY,
            application_id INTEGER NOT NULL,
            entity TEXT NOT NULL DEFAULT 'job',
            field TEXT NOT NULL,
            original_name TEXT NOT NULL,
            data BYTEA NOT NULL
        )
        "#,
        // older installs predate the mime column
        r#"ALTER TABLE job_application_files ADD COLUMN IF NOT EXISTS mime TEXT"#,
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS position_tags (
            position_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (position_id, tag_id)
        )
        "#,
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS companies_name_lower_idx
        ON companies (LOWER(name))
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

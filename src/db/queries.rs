use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::application::Application;

fn map_application(row: &PgRow) -> Result<Application, sqlx::Error> {
    Ok(Application {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        resume_content: row.try_get("resume_content")?,
        job_description: row.try_get("job_description")?,
        score: row.try_get("score")?,
        email_status: row.try_get("email_status")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a new application decision record
pub async fn insert_application(
    pool: &PgPool,
    email: &str,
    resume_content: &str,
    job_description: &str,
    score: f64,
    email_status: bool,
) -> Result<Application, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO applications (email, resume_content, job_description, score, email_status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, resume_content, job_description, score, email_status, created_at
        "#,
    )
    .bind(email)
    .bind(resume_content)
    .bind(job_description)
    .bind(score)
    .bind(email_status)
    .fetch_one(pool)
    .await?;

    map_application(&row)
}

/// Look up the stored decision for an exact (email, resume, job description) triple.
///
/// A hit means the submission is a duplicate and must be answered from the
/// stored record without re-scoring or re-notifying.
pub async fn find_exact_match(
    pool: &PgPool,
    email: &str,
    resume_content: &str,
    job_description: &str,
) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, email, resume_content, job_description, score, email_status, created_at
        FROM applications
        WHERE email = $1 AND resume_content = $2 AND job_description = $3
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(email)
    .bind(resume_content)
    .bind(job_description)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_application).transpose()
}

/// Get the earliest application for a contact address
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, email, resume_content, job_description, score, email_status, created_at
        FROM applications
        WHERE email = $1
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_application).transpose()
}

/// Get the earliest application with the given resume text
pub async fn find_by_resume(
    pool: &PgPool,
    resume_content: &str,
) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, email, resume_content, job_description, score, email_status, created_at
        FROM applications
        WHERE resume_content = $1
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(resume_content)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_application).transpose()
}

/// Flip the notification flag on the earliest record for a contact address.
///
/// Returns false when no record exists for that address. Only this operation
/// mutates `email_status` after creation.
pub async fn update_email_status(
    pool: &PgPool,
    email: &str,
    status: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE applications
        SET email_status = $2
        WHERE id = (
            SELECT id FROM applications WHERE email = $1 ORDER BY id ASC LIMIT 1
        )
        "#,
    )
    .bind(email)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a diagnostic entry to the error log
pub async fn insert_error_log(pool: &PgPool, error_message: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO error_logs (error_message)
        VALUES ($1)
        "#,
    )
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete error-log rows older than the retention window.
///
/// Invoked at startup only; the request pipeline treats the log as
/// append-only.
pub async fn purge_error_logs(pool: &PgPool, retention_days: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM error_logs
        WHERE created_at < NOW() - ($1 * INTERVAL '1 day')
        "#,
    )
    .bind(retention_days as f64)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// A persisted application decision.
///
/// The (email, resume_content, job_description) triple is the dedup key: an
/// exact repeat of all three returns this record unchanged instead of being
/// re-scored. Same email with a different resume or job description is a new
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub email: String,
    pub resume_content: String,
    pub job_description: String,
    pub score: f64,
    pub email_status: bool,
    pub created_at: DateTime<Utc>,
}

/// Text fields of the multipart intake request.
#[derive(Debug, Deserialize, Validate)]
pub struct IntakeFields {
    #[garde(length(min = 1, max = 50_000))]
    pub job_description: String,
}

/// Response after processing an application.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub email: String,
    pub score: f64,
    pub email_status: bool,
    pub message: String,

    /// Echoed only on the duplicate path, for dedup transparency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

/// Error body returned for every failure class.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

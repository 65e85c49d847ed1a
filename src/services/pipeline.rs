use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::queries;
use crate::services::ai::Classification;
use crate::services::extract::{self, DocumentFormat};
use crate::services::storage::DocumentStore;
use crate::services::{email_finder, scorer};

/// Minimum match score that triggers an interview invitation.
pub const SCORE_THRESHOLD: f64 = 70.0;

/// One intake submission: the uploaded document plus the job description.
pub struct IntakeRequest {
    pub filename: String,
    pub data: Vec<u8>,
    pub job_description: String,
}

/// The decision produced for one submission.
pub struct IntakeDecision {
    pub email: String,
    pub score: f64,
    pub email_status: bool,
    pub message: String,
    pub duplicate: bool,
}

/// Terminal exit points of the intake pipeline. The HTTP layer maps these to
/// status codes; server-side variants keep their cause out of the display
/// text and carry it separately for the error log.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid file format. Only PDF and DOCX files are supported.")]
    UnsupportedFormat,

    #[error("Failed to save uploaded file")]
    UploadSave(String),

    #[error("Failed to extract text from resume: {0}")]
    Extraction(String),

    #[error("The uploaded document does not appear to be a resume. Please upload a valid resume document.")]
    NotAResume,

    #[error("No email address found in resume")]
    NoEmailFound,

    #[error("Failed to generate job summary: {0}")]
    Summary(String),

    #[error("Failed to calculate score: {0}")]
    Scoring(String),

    #[error("Internal server error")]
    Database(String),

    #[error("Failed to save application to database")]
    Persistence(String),
}

/// Process one application submission end to end.
///
/// The pipeline is a straight-line state machine; every early return is a
/// terminal decision, and every failure path appends to the error log before
/// surfacing.
pub async fn process(
    state: &AppState,
    request: IntakeRequest,
) -> Result<IntakeDecision, IntakeError> {
    // 1. Format gate
    let Some(format) = DocumentFormat::from_filename(&request.filename) else {
        record_failure(
            &state.db,
            &format!(
                "Invalid file format. Only PDF and DOCX files are supported. File name: {}",
                request.filename
            ),
        )
        .await;
        return Err(IntakeError::UnsupportedFormat);
    };

    // 2. Persist the raw upload
    let upload_key = DocumentStore::upload_key(Uuid::new_v4(), &request.filename);
    let content_type = match format {
        DocumentFormat::Pdf => "application/pdf",
        DocumentFormat::Docx => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
    };
    if let Err(e) = state
        .storage
        .upload(&upload_key, &request.data, content_type)
        .await
    {
        record_failure(&state.db, &format!("Failed to save uploaded file: {e}")).await;
        return Err(IntakeError::UploadSave(e.to_string()));
    }

    // 3. Extract text
    let resume_content = match extract::extract_text(format, &request.data) {
        Ok(text) => text,
        Err(e) => {
            record_failure(
                &state.db,
                &format!("Failed to extract text from resume: {e}"),
            )
            .await;
            return Err(IntakeError::Extraction(e.to_string()));
        }
    };

    // 4. Classify; an unavailable classifier rejects the document (fail-closed)
    match state.inference.classify_resume(&resume_content).await {
        Classification::Resume => {}
        Classification::NotResume => {
            record_failure(&state.db, "Uploaded document is not a resume").await;
            return Err(IntakeError::NotAResume);
        }
        Classification::Unavailable => {
            record_failure(
                &state.db,
                "Resume classification capability unavailable; document rejected",
            )
            .await;
            return Err(IntakeError::NotAResume);
        }
    }

    // 5. Contact address
    let Some(email) = email_finder::find_email(&resume_content) else {
        record_failure(&state.db, "No email address found in resume").await;
        return Err(IntakeError::NoEmailFound);
    };

    // 6. Exact-triple dedup lookup: a hit is an idempotent read of the stored
    // decision, never a re-score or re-notification.
    let existing = match queries::find_exact_match(
        &state.db,
        &email,
        &resume_content,
        &request.job_description,
    )
    .await
    {
        Ok(existing) => existing,
        Err(e) => {
            record_failure(
                &state.db,
                &format!("Error occurred during checking the existing application in the database: {e}"),
            )
            .await;
            return Err(IntakeError::Database(e.to_string()));
        }
    };

    if let Some(app) = existing {
        metrics::counter!("intake_duplicates_total").increment(1);
        return Ok(IntakeDecision {
            email,
            score: app.score,
            email_status: app.email_status,
            message: "Retrieved existing application score from database".to_string(),
            duplicate: true,
        });
    }

    // 7. Summarize the job description
    let job_summary = match state.inference.summarize_job(&request.job_description).await {
        Ok(summary) => summary,
        Err(e) => {
            record_failure(&state.db, &format!("Failed to generate job summary: {e}")).await;
            return Err(IntakeError::Summary(e.to_string()));
        }
    };

    // 8. Score
    let score = match scorer::score(&state.inference, &resume_content, &job_summary).await {
        Ok(score) => score,
        Err(e) => {
            record_failure(&state.db, &format!("Failed to calculate score: {e}")).await;
            return Err(IntakeError::Scoring(e.to_string()));
        }
    };

    // 9. Threshold gate and notification dispatch
    let mut email_sent = false;
    let message = if should_notify(score) {
        email_sent = state.mailer.send_interview_invitation(&email, score).await;
        if email_sent {
            metrics::counter!("notifications_sent_total").increment(1);
            // Flag flips only after a confirmed send; best-effort against
            // earlier records for the same contact.
            match queries::update_email_status(&state.db, &email, true).await {
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to update notification flag");
                }
            }
        } else {
            metrics::counter!("notifications_failed_total").increment(1);
            record_failure(&state.db, "Failed to send interview invitation").await;
        }
        eligibility_message(email_sent)
    } else {
        "Candidate did not meet the minimum score requirement".to_string()
    };

    // 10. Persist the decision with the final notification outcome. A failed
    // send still persists, with email_status = false.
    if let Err(e) = queries::insert_application(
        &state.db,
        &email,
        &resume_content,
        &request.job_description,
        score,
        email_sent,
    )
    .await
    {
        record_failure(
            &state.db,
            &format!("Failed to save application to database: {e}"),
        )
        .await;
        return Err(IntakeError::Persistence(e.to_string()));
    }

    Ok(IntakeDecision {
        email,
        score,
        email_status: email_sent,
        message,
        duplicate: false,
    })
}

impl IntakeError {
    /// Underlying cause for variants that carry one; server-side variants
    /// keep it out of their display text.
    pub fn cause(&self) -> Option<&str> {
        match self {
            IntakeError::UploadSave(c)
            | IntakeError::Extraction(c)
            | IntakeError::Summary(c)
            | IntakeError::Scoring(c)
            | IntakeError::Database(c)
            | IntakeError::Persistence(c) => Some(c),
            _ => None,
        }
    }
}

pub fn should_notify(score: f64) -> bool {
    score >= SCORE_THRESHOLD
}

fn eligibility_message(invitation_sent: bool) -> String {
    let base = "Candidate has passed the eligibility for interview";
    if invitation_sent {
        format!("{base} and interview invitation sent successfully")
    } else {
        format!("{base}, but failed to send the email")
    }
}

/// Append to the error log, fire-and-forget: a failed write must never mask
/// the failure being recorded.
pub async fn record_failure(pool: &PgPool, message: &str) {
    if let Err(e) = queries::insert_error_log(pool, message).await {
        tracing::warn!(error = %e, "Failed to write error log entry");
    }
}

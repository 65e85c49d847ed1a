use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::models::application::{ApplicationResponse, ErrorResponse, IntakeFields};
use crate::services::pipeline::{self, IntakeError, IntakeRequest};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(detail: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
}

/// POST /api/v1/applications — process one job application submission.
///
/// Multipart fields: `file` (PDF or DOCX resume) and `job_description` (text).
pub async fn submit_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApplicationResponse>, ApiError> {
    metrics::counter!("intake_requests_total").increment(1);
    let start = std::time::Instant::now();

    let mut filename: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| bad_request("Malformed multipart request"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| bad_request("Failed to read uploaded file"))?;
                file_data = Some(data.to_vec());
            }
            Some("job_description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| bad_request("Failed to read job description field"))?;
                job_description = Some(text);
            }
            _ => {
                // Unknown fields are drained and ignored
                let _ = field.bytes().await;
            }
        }
    }

    let filename = filename.ok_or_else(|| bad_request("Missing resume file"))?;
    let data = file_data.ok_or_else(|| bad_request("Missing resume file"))?;
    let fields = IntakeFields {
        job_description: job_description.ok_or_else(|| bad_request("Missing job description"))?,
    };
    fields
        .validate()
        .map_err(|_| bad_request("Job description must not be empty"))?;

    let request = IntakeRequest {
        filename,
        data,
        job_description: fields.job_description.clone(),
    };

    let result = pipeline::process(&state, request).await;
    metrics::histogram!("intake_processing_seconds").record(start.elapsed().as_secs_f64());

    match result {
        Ok(decision) => {
            let job_description = decision.duplicate.then_some(fields.job_description);
            Ok(Json(ApplicationResponse {
                email: decision.email,
                score: decision.score,
                email_status: decision.email_status,
                message: decision.message,
                job_description,
            }))
        }
        Err(e) => {
            metrics::counter!("intake_failures_total").increment(1);
            if let Some(cause) = e.cause() {
                tracing::error!(error = %e, cause, "Application intake failed");
            } else {
                tracing::info!(error = %e, "Application intake rejected");
            }
            Err((
                status_for(&e),
                Json(ErrorResponse {
                    detail: e.to_string(),
                }),
            ))
        }
    }
}

/// Map each terminal pipeline exit to its status class: client errors 400,
/// downstream-capability failures 422, storage/infrastructure faults 500.
fn status_for(error: &IntakeError) -> StatusCode {
    match error {
        IntakeError::UnsupportedFormat | IntakeError::NotAResume | IntakeError::NoEmailFound => {
            StatusCode::BAD_REQUEST
        }
        IntakeError::Extraction(_) | IntakeError::Summary(_) | IntakeError::Scoring(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IntakeError::UploadSave(_) | IntakeError::Database(_) | IntakeError::Persistence(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(
            status_for(&IntakeError::UnsupportedFormat),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&IntakeError::NotAResume), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&IntakeError::NoEmailFound),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_capability_failures_map_to_422() {
        assert_eq!(
            status_for(&IntakeError::Extraction("corrupt file".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&IntakeError::Summary("model unreachable".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&IntakeError::Scoring("embedding failed".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_infrastructure_faults_map_to_500() {
        assert_eq!(
            status_for(&IntakeError::UploadSave("bucket down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&IntakeError::Persistence("pool exhausted".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&IntakeError::Database("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_display_is_generic() {
        let e = IntakeError::Persistence("password=hunter2 connection refused".into());
        assert_eq!(e.to_string(), "Failed to save application to database");
        assert!(e.cause().unwrap().contains("connection refused"));
    }
}

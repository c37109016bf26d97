use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::screening::pipeline::{ResumeUpload, ScreeningReport};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FIELD: &str = "resumes";

/// POST /api/v1/rankings
///
/// Multipart form: one `job_description` text field and one or more
/// `resumes` file fields.
pub async fn handle_rank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    let mut job_description: Option<String> = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_DESCRIPTION_FIELD => job_description = Some(field.text().await?),
            RESUME_FIELD => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|f| !f.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("Every resume upload needs a filename".to_string())
                    })?;
                let content = field.bytes().await?;
                uploads.push(ResumeUpload { filename, content });
            }
            _ => {}
        }
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    if uploads.is_empty() {
        return Err(AppError::Validation(
            "At least one resume file is required".to_string(),
        ));
    }

    info!("Ranking {} resume(s)", uploads.len());

    let report = state
        .screener
        .screen_batch(uploads, &job_description)
        .await?;
    Ok(Json(report))
}

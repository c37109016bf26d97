use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::{AppError, ExtractionFailure};
use crate::extraction::document::extract_upload;
use crate::extraction::information::InformationExtractor;
use crate::matching::ranking::RankingEngine;
use crate::models::candidate::{Candidate, ScoreSet};
use crate::models::resume::ResumeRecord;

/// One uploaded resume file.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content: Bytes,
}

#[derive(Debug, Serialize)]
pub struct RankedEntry {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub display_name: String,
    pub scores: ScoreSet,
    pub resume: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct CandidateFailure {
    pub display_name: String,
    pub kind: &'static str,
    pub message: String,
}

impl CandidateFailure {
    fn new(display_name: &str, failure: &ExtractionFailure) -> Self {
        Self {
            display_name: display_name.to_string(),
            kind: failure.kind(),
            message: failure.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScreeningReport {
    pub batch_id: Uuid,
    pub ranked: Vec<RankedEntry>,
    pub failures: Vec<CandidateFailure>,
}

/// End-to-end batch: uploads -> records -> ranked report.
pub struct Screener {
    extractor: InformationExtractor,
    engine: Arc<RankingEngine>,
}

impl Screener {
    pub fn new(extractor: InformationExtractor, engine: RankingEngine) -> Self {
        Self {
            extractor,
            engine: Arc::new(engine),
        }
    }

    /// Processes uploads one at a time, in order. A file that cannot be read
    /// or annotated is reported in `failures` and left out of the ranking;
    /// the rest of the batch carries on. With no survivors the ranking step
    /// is skipped.
    pub async fn screen_batch(
        &self,
        uploads: Vec<ResumeUpload>,
        job_description: &str,
    ) -> Result<ScreeningReport, AppError> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("screen_batch", %batch_id, uploads = uploads.len());

        async move {
            let mut candidates = Vec::with_capacity(uploads.len());
            let mut failures = Vec::new();

            for upload in uploads {
                match self.parse_upload(&upload).await? {
                    Ok(resume) => {
                        debug!(
                            "Parsed {}: skills={}, education={}, experience={}",
                            upload.filename,
                            resume.skills.len(),
                            resume.education.len(),
                            resume.experience.len()
                        );
                        candidates.push(Candidate::new(upload.filename, resume));
                    }
                    Err(failure) => {
                        warn!("Skipping {}: {failure}", upload.filename);
                        failures.push(CandidateFailure::new(&upload.filename, &failure));
                    }
                }
            }

            let ranked = if candidates.is_empty() {
                Vec::new()
            } else {
                let engine = Arc::clone(&self.engine);
                let jd = job_description.to_string();
                tokio::task::spawn_blocking(move || engine.rank(candidates, &jd))
                    .await
                    .map_err(|e| anyhow!("ranking worker failed: {e}"))??
            };

            let ranked: Vec<RankedEntry> = ranked
                .into_iter()
                .filter_map(|c| c.scores.map(|scores| (c.display_name, scores, c.resume)))
                .enumerate()
                .map(|(i, (display_name, scores, resume))| RankedEntry {
                    rank: i + 1,
                    display_name,
                    scores,
                    resume,
                })
                .collect();

            info!(
                "Batch complete: ranked={}, failed={}",
                ranked.len(),
                failures.len()
            );

            Ok::<_, AppError>(ScreeningReport {
                batch_id,
                ranked,
                failures,
            })
        }
        .instrument(span)
        .await
    }

    /// Outer error: the blocking worker itself died. Inner error: this one
    /// candidate could not be parsed.
    async fn parse_upload(
        &self,
        upload: &ResumeUpload,
    ) -> Result<Result<ResumeRecord, ExtractionFailure>, AppError> {
        let filename = upload.filename.clone();
        let content = upload.content.clone();
        let text = tokio::task::spawn_blocking(move || extract_upload(&filename, &content))
            .await
            .map_err(|e| anyhow!("extraction worker failed: {e}"))?;

        Ok(match text {
            Ok(text) => self.extractor.extract(&text).await,
            Err(failure) => Err(failure),
        })
    }
}

use tracing::debug;

use crate::matching::embedder::EmbeddingError;
use crate::matching::similarity::SimilarityScorer;
use crate::models::candidate::{Candidate, ScoreSet};
use crate::models::resume::ResumeRecord;

/// Scores resumes section by section against a job description and orders
/// candidates by the weighted overall match.
#[derive(Clone)]
pub struct RankingEngine {
    scorer: SimilarityScorer,
}

impl RankingEngine {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self { scorer }
    }

    /// Scores one resume. Empty sections are still embedded and scored, so
    /// every field of the returned `ScoreSet` is defined.
    #[allow(dead_code)]
    pub fn score_candidate(
        &self,
        resume: &ResumeRecord,
        job_description: &str,
    ) -> Result<ScoreSet, EmbeddingError> {
        let jd_embedding = self.scorer.embed(job_description)?;
        self.score_against(resume, &jd_embedding)
    }

    /// Scores every candidate independently and returns them sorted by
    /// `overall_match`, highest first. The sort is stable: equal scores keep
    /// their input order. Nothing is dropped or truncated.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        job_description: &str,
    ) -> Result<Vec<Candidate>, EmbeddingError> {
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let jd_embedding = self.scorer.embed(job_description)?;

        let mut scored = candidates
            .into_iter()
            .map(|mut candidate| {
                let scores = self.score_against(&candidate.resume, &jd_embedding)?;
                debug!(
                    "Scored {}: overall={:.4} skills={:.4} experience={:.4} education={:.4}",
                    candidate.display_name,
                    scores.overall_match,
                    scores.skills_match,
                    scores.experience_match,
                    scores.education_match
                );
                candidate.scores = Some(scores);
                Ok(candidate)
            })
            .collect::<Result<Vec<_>, EmbeddingError>>()?;

        scored.sort_by(|a, b| b.overall_match().total_cmp(&a.overall_match()));
        Ok(scored)
    }

    fn score_against(
        &self,
        resume: &ResumeRecord,
        jd_embedding: &[f32],
    ) -> Result<ScoreSet, EmbeddingError> {
        let skills_match = self
            .scorer
            .similarity_to(jd_embedding, &resume.skills_text())?;
        let education_match = self
            .scorer
            .similarity_to(jd_embedding, &resume.education_text())?;
        let experience_match = self
            .scorer
            .similarity_to(jd_embedding, &resume.experience_text())?;

        Ok(ScoreSet::from_sections(
            skills_match,
            education_match,
            experience_match,
        ))
    }
}

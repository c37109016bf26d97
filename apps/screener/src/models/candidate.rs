use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;

/// Weights applied to the per-section similarity scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

/// overall = 0.4*skills + 0.4*experience + 0.2*education
pub const SECTION_WEIGHTS: SectionWeights = SectionWeights {
    skills: 0.4,
    experience: 0.4,
    education: 0.2,
};

impl SectionWeights {
    pub fn combine(&self, skills: f64, education: f64, experience: f64) -> f64 {
        self.skills * skills + self.experience * experience + self.education * education
    }
}

/// Similarity of each resume section to the job description, plus the
/// weighted overall score. Section scores are cosine similarities in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub skills_match: f64,
    pub education_match: f64,
    pub experience_match: f64,
    pub overall_match: f64,
}

impl ScoreSet {
    pub fn from_sections(skills_match: f64, education_match: f64, experience_match: f64) -> Self {
        Self {
            skills_match,
            education_match,
            experience_match,
            overall_match: SECTION_WEIGHTS.combine(skills_match, education_match, experience_match),
        }
    }
}

/// One uploaded resume inside a ranking request. `scores` stays `None` until
/// the ranking engine has scored it.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub display_name: String,
    pub resume: ResumeRecord,
    pub scores: Option<ScoreSet>,
}

impl Candidate {
    pub fn new(display_name: impl Into<String>, resume: ResumeRecord) -> Self {
        Self {
            display_name: display_name.into(),
            resume,
            scores: None,
        }
    }

    /// Overall match used as the sort key; unscored candidates sort last.
    pub fn overall_match(&self) -> f64 {
        self.scores
            .map(|s| s.overall_match)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

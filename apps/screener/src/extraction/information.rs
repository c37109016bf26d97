use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::errors::ExtractionFailure;
use crate::extraction::annotator::{AnnotatedDoc, Annotator, Entity};
use crate::models::resume::{Contact, ResumeRecord};

const SKILL_POS_TAGS: &[&str] = &["PROPN", "NOUN"];

/// Tokens must be longer than this (in characters) to count as a skill.
const MIN_SKILL_CHARS: usize = 2;

/// Tokens inspected on each side of an organization entity.
const CONTEXT_WINDOW: usize = 5;

const EDUCATION_TERMS: &[&str] = &["university", "college", "school", "degree"];

/// Turns raw resume text into a `ResumeRecord` using the annotation service.
pub struct InformationExtractor {
    annotator: Arc<dyn Annotator>,
}

impl InformationExtractor {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        Self { annotator }
    }

    /// Blank text fails with `EmptyInput` before the annotator is called.
    pub async fn extract(&self, text: &str) -> Result<ResumeRecord, ExtractionFailure> {
        if text.trim().is_empty() {
            return Err(ExtractionFailure::EmptyInput);
        }
        let doc = self.annotator.annotate(text).await?;
        doc.validate()?;
        Ok(build_record(&doc))
    }
}

/// Applies the extraction rules to an annotated document.
///
/// Skills: PROPN/NOUN tokens longer than two characters, first-seen order.
/// ORG entities: education when an education term occurs within
/// `CONTEXT_WINDOW` tokens of the span, otherwise experience.
/// PERSON / EMAIL entities: first match wins.
pub fn build_record(doc: &AnnotatedDoc) -> ResumeRecord {
    let skills: IndexSet<String> = doc
        .tokens
        .iter()
        .filter(|t| SKILL_POS_TAGS.contains(&t.pos.as_str()))
        .filter(|t| t.text.chars().count() > MIN_SKILL_CHARS)
        .map(|t| t.text.clone())
        .collect();

    let mut education = Vec::new();
    let mut experience = Vec::new();
    let mut contact = Contact::default();

    for entity in &doc.entities {
        match entity.label.as_str() {
            "ORG" => {
                if is_education_context(doc, entity) {
                    education.push(entity.text.clone());
                } else {
                    experience.push(entity.text.clone());
                }
            }
            "PERSON" => set_first(&mut contact.name, entity, "name"),
            "EMAIL" => set_first(&mut contact.email, entity, "email"),
            _ => {}
        }
    }

    ResumeRecord {
        skills,
        education,
        experience,
        contact,
    }
}

fn is_education_context(doc: &AnnotatedDoc, entity: &Entity) -> bool {
    let token_count = doc.tokens.len();
    let start = entity.start.saturating_sub(CONTEXT_WINDOW).min(token_count);
    let end = (entity.end + CONTEXT_WINDOW).min(token_count);

    let window = doc.tokens[start..end]
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    EDUCATION_TERMS.iter().any(|term| window.contains(term))
}

fn set_first(slot: &mut Option<String>, entity: &Entity, field: &str) {
    match slot {
        None => *slot = Some(entity.text.clone()),
        Some(kept) => debug!("Ignoring extra contact {field} '{}' (kept '{kept}')", entity.text),
    }
}

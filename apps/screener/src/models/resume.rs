use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Contact fields pulled from PERSON / EMAIL entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Structured fields extracted from one resume.
///
/// `skills` keeps first-seen order so that the joined skills text, and with it
/// the skills score, is identical across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub skills: IndexSet<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub contact: Contact,
}

impl ResumeRecord {
    pub fn skills_text(&self) -> String {
        self.skills
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn education_text(&self) -> String {
        self.education.join(" ")
    }

    pub fn experience_text(&self) -> String {
        self.experience.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ResumeRecord {
        ResumeRecord {
            skills: ["Rust", "Kubernetes", "Postgres"]
                .into_iter()
                .map(String::from)
                .collect(),
            education: vec!["MIT".to_string(), "Stanford University".to_string()],
            experience: vec!["Acme Corp".to_string()],
            contact: Contact::default(),
        }
    }

    #[test]
    fn test_skills_text_keeps_insertion_order() {
        assert_eq!(record().skills_text(), "Rust Kubernetes Postgres");
    }

    #[test]
    fn test_section_text_preserves_sequence_order() {
        let r = record();
        assert_eq!(r.education_text(), "MIT Stanford University");
        assert_eq!(r.experience_text(), "Acme Corp");
    }

    #[test]
    fn test_empty_sections_join_to_empty_string() {
        let r = ResumeRecord::default();
        assert_eq!(r.skills_text(), "");
        assert_eq!(r.education_text(), "");
        assert_eq!(r.experience_text(), "");
    }

    #[test]
    fn test_contact_omits_missing_fields_when_serialized() {
        let contact = Contact {
            name: Some("Ada Lovelace".to_string()),
            email: None,
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["name"], "Ada Lovelace");
        assert!(json.get("email").is_none());
    }
}

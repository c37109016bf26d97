//! Linguistic annotation client: part-of-speech tags and named entities for a
//! resume's raw text.
//!
//! The screener never tags text itself. All annotation goes through the
//! `Annotator` trait; production uses `HttpAnnotator`, which talks to a
//! spaCy-style annotation service.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Annotation service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Entity '{text}' spans tokens {start}..{end} but the document has {token_count} tokens")]
    InvalidSpan {
        text: String,
        start: usize,
        end: usize,
        token_count: usize,
    },
}

/// A single token with its coarse part-of-speech tag (`PROPN`, `NOUN`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: String,
}

/// A labelled entity span. `start` and `end` are token indices, end exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDoc {
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl AnnotatedDoc {
    /// Rejects entity spans that point outside the token sequence.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        let token_count = self.tokens.len();
        match self
            .entities
            .iter()
            .find(|e| e.start > e.end || e.end > token_count)
        {
            Some(bad) => Err(AnnotationError::InvalidSpan {
                text: bad.text.clone(),
                start: bad.start,
                end: bad.end,
                token_count,
            }),
            None => Ok(()),
        }
    }
}

/// Annotation backend. Carried by the information extractor as
/// `Arc<dyn Annotator>` so tests can swap in a scripted implementation.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<AnnotatedDoc, AnnotationError>;
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

/// Calls the annotation service over HTTP. One request per resume, no retries.
#[derive(Clone)]
pub struct HttpAnnotator {
    client: Client,
    endpoint: String,
}

impl HttpAnnotator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(&self, text: &str) -> Result<AnnotatedDoc, AnnotationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnnotateRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotationError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let doc: AnnotatedDoc = response.json().await?;

        debug!(
            "Annotated {} chars: tokens={}, entities={}",
            text.len(),
            doc.tokens.len(),
            doc.entities.len()
        );

        Ok(doc)
    }
}

//! Deterministic stand-ins for the model seams, shared by unit tests.

use std::io::{Cursor, Write};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;

use crate::extraction::annotator::{AnnotatedDoc, AnnotationError, Annotator, Token};
use crate::matching::embedder::{Embedder, Embedding, EmbeddingError};

/// Bag-of-words embedder: lowercased alphanumeric words hashed into buckets,
/// plus a constant bias component that plays the role of the `[CLS]` token so
/// the empty string still has a non-zero embedding.
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimension: 1 << 16 }
    }
}

impl HashingEmbedder {
    fn bucket(&self, word: &str) -> usize {
        // FNV-1a
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        1 + (hash as usize) % (self.dimension - 1)
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut vector = vec![0.0_f32; self.dimension];
        vector[0] = 1.0;
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[self.bucket(&word.to_lowercase())] += 1.0;
        }
        Ok(vector)
    }
}

/// Tags every whitespace-separated word as a proper noun; no entities.
pub struct WhitespaceAnnotator;

#[async_trait]
impl Annotator for WhitespaceAnnotator {
    async fn annotate(&self, text: &str) -> Result<AnnotatedDoc, AnnotationError> {
        Ok(AnnotatedDoc {
            tokens: text
                .split_whitespace()
                .map(|w| Token {
                    text: w.to_string(),
                    pos: "PROPN".to_string(),
                })
                .collect(),
            entities: vec![],
        })
    }
}

/// Returns the same annotation for any input.
pub struct StaticAnnotator(pub AnnotatedDoc);

#[async_trait]
impl Annotator for StaticAnnotator {
    async fn annotate(&self, _text: &str) -> Result<AnnotatedDoc, AnnotationError> {
        Ok(self.0.clone())
    }
}

/// Always fails as if the annotation service were down.
pub struct FailingAnnotator;

#[async_trait]
impl Annotator for FailingAnnotator {
    async fn annotate(&self, _text: &str) -> Result<AnnotatedDoc, AnnotationError> {
        Err(AnnotationError::Service {
            status: 503,
            message: "annotation service unavailable".to_string(),
        })
    }
}

/// Builds a minimal DOCX container with one `<w:p>` per paragraph.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

//! BERT encoder embeddings on CPU via candle.
//!
//! The embedding of a text is the final-layer hidden state at the `[CLS]`
//! position. Inputs are truncated to `MAX_SEQUENCE_LENGTH` tokens; the
//! tokenizer's post-processor always adds `[CLS]`/`[SEP]`, so the empty string
//! still produces a two-token sequence.

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

use crate::matching::embedder::{Embedder, Embedding, EmbeddingError};

pub const MAX_SEQUENCE_LENGTH: usize = 512;

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Only the field we need beyond what `BertModel::load` consumes.
#[derive(Deserialize)]
struct EncoderShape {
    hidden_size: usize,
}

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    name: String,
}

impl BertEmbedder {
    /// Loads tokenizer, config and memory-mapped safetensors weights from
    /// `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let device = Device::Cpu;

        let config_path = model_dir.join(CONFIG_FILE);
        let raw_config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)
            .with_context(|| format!("Invalid BERT config in {}", config_path.display()))?;
        let shape: EncoderShape = serde_json::from_str(&raw_config)?;

        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load {}", tokenizer_path.display()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(anyhow::Error::msg)?;

        let weights_path = model_dir.join(WEIGHTS_FILE);
        // SAFETY: the weights file is opened read-only and is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb, &config)
            .with_context(|| format!("Failed to load weights from {}", weights_path.display()))?;

        let name = model_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("bert")
            .to_string();

        info!(
            "Loaded encoder '{}' (hidden_size={}, max_len={})",
            name, shape.hidden_size, MAX_SEQUENCE_LENGTH
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: shape.hidden_size,
            name,
        })
    }
}

impl Embedder for BertEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.hidden_size
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        // (batch=1, seq_len, hidden)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let cls = hidden.i((0, 0))?.to_dtype(DType::F32)?.to_vec1::<f32>()?;
        Ok(cls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_nn::VarMap;
    use serde_json::{json, Value};

    use crate::matching::similarity::cosine_similarity;

    const HIDDEN_SIZE: usize = 16;

    fn tiny_config() -> Value {
        json!({
            "vocab_size": 6,
            "hidden_size": HIDDEN_SIZE,
            "num_hidden_layers": 1,
            "num_attention_heads": 2,
            "intermediate_size": 32,
            "hidden_act": "gelu",
            "hidden_dropout_prob": 0.0,
            "max_position_embeddings": MAX_SEQUENCE_LENGTH,
            "type_vocab_size": 2,
            "initializer_range": 0.02,
            "layer_norm_eps": 1e-12,
            "pad_token_id": 0,
            "position_embedding_type": "absolute",
            "use_cache": false,
            "classifier_dropout": null,
            "model_type": "bert"
        })
    }

    /// Word-level vocabulary with a `[CLS] $A [SEP]` template, serialized the
    /// way `Tokenizer::from_file` expects.
    fn tiny_tokenizer() -> Value {
        json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {"type": "Whitespace"},
            "post_processor": {
                "type": "TemplateProcessing",
                "single": [
                    {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                    {"Sequence": {"id": "A", "type_id": 0}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
                ],
                "pair": [
                    {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                    {"Sequence": {"id": "A", "type_id": 0}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 0}},
                    {"Sequence": {"id": "B", "type_id": 1}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 1}}
                ],
                "special_tokens": {
                    "[CLS]": {"id": "[CLS]", "ids": [2], "tokens": ["[CLS]"]},
                    "[SEP]": {"id": "[SEP]", "ids": [3], "tokens": ["[SEP]"]}
                }
            },
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {"[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3, "python": 4, "rust": 5},
                "unk_token": "[UNK]"
            }
        })
    }

    /// Writes config, tokenizer and randomly initialised weights for a
    /// one-layer encoder into a fresh directory.
    fn tiny_model_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let config = tiny_config();
        std::fs::write(dir.path().join(CONFIG_FILE), config.to_string()).unwrap();
        std::fs::write(dir.path().join(TOKENIZER_FILE), tiny_tokenizer().to_string()).unwrap();

        let bert_config: BertConfig = serde_json::from_value(config).unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DTYPE, &Device::Cpu);
        BertModel::load(vb, &bert_config).unwrap();
        varmap.save(dir.path().join(WEIGHTS_FILE)).unwrap();

        dir
    }

    #[test]
    fn test_load_reads_hidden_size_from_config() {
        let dir = tiny_model_dir();
        let embedder = BertEmbedder::load(dir.path()).unwrap();
        assert_eq!(embedder.dimension(), HIDDEN_SIZE);
    }

    #[test]
    fn test_empty_text_still_embeds() {
        let dir = tiny_model_dir();
        let embedder = BertEmbedder::load(dir.path()).unwrap();

        let embedding = embedder.embed("").unwrap();
        assert_eq!(embedding.len(), HIDDEN_SIZE);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_long_input_is_truncated_to_max_sequence_length() {
        let dir = tiny_model_dir();
        let embedder = BertEmbedder::load(dir.path()).unwrap();

        // 1200 words; only the first 510 fit alongside [CLS] and [SEP].
        let long = "python rust ".repeat(600);
        let embedding = embedder.embed(&long).unwrap();
        assert_eq!(embedding.len(), HIDDEN_SIZE);
        assert!((cosine_similarity(&embedding, &embedding) - 1.0).abs() < 1e-6);

        let kept = "python rust ".repeat(255);
        let truncated = embedder.embed(&kept).unwrap();
        assert!((cosine_similarity(&embedding, &truncated) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_weights_fail_to_load() {
        let dir = tiny_model_dir();
        std::fs::remove_file(dir.path().join(WEIGHTS_FILE)).unwrap();
        assert!(BertEmbedder::load(dir.path()).is_err());
    }
}

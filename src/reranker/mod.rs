//! Cross-encoder reranking.
//!
//! A pairwise (query, passage) relevance scorer. Construction is expensive
//! (loads a BERT cross-encoder), so the orchestrator builds it lazily and at
//! most once. Without a configured model the scorer runs a deterministic
//! lexical placeholder, which the tests rely on.

pub mod bert;
pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::{MAX_SEQ_LEN, ModelVariant, RerankerConfig};
pub use error::RerankerError;

use candle_core::{DType, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::utils::load_tokenizer_with_truncation;

use bert::BertRelevanceModel;

pub struct CrossEncoderReranker {
    device: candle_core::Device,
    config: RerankerConfig,
    model: Option<BertRelevanceModel>,
    tokenizer: Option<Tokenizer>,
    quantized: bool,
}

impl std::fmt::Debug for CrossEncoderReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoderReranker")
            .field("device", &format!("{:?}", self.device))
            .field("variant", &self.config.variant)
            .field("model_loaded", &self.model.is_some())
            .field("quantized", &self.quantized)
            .finish()
    }
}

impl CrossEncoderReranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");

        let Some(model_dir) = config.resolved_model_dir() else {
            info!("No reranker model configured, operating in stub mode");
            return Ok(Self {
                device,
                config,
                model: None,
                tokenizer: None,
                quantized: false,
            });
        };

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_dir.join(required).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {} in {}", required, model_dir.display()),
                });
            }
        }

        info!(
            model_dir = %model_dir.display(),
            variant = ?config.variant,
            quantize = config.quantize,
            "Loading reranker model"
        );

        let (model, quantized) = if config.quantize {
            match BertRelevanceModel::load_with_dtype(&model_dir, &device, DType::F16) {
                Ok(model) => {
                    info!("Reranker weights quantized to f16");
                    (model, true)
                }
                Err(e) => {
                    warn!(error = %e, "Quantization not supported, loading full precision");
                    let model =
                        BertRelevanceModel::load_with_dtype(&model_dir, &device, DType::F32)
                            .map_err(|e| RerankerError::ModelLoadFailed {
                                reason: format!("Failed to load cross-encoder: {}", e),
                            })?;
                    (model, false)
                }
            }
        } else {
            let model = BertRelevanceModel::load_with_dtype(&model_dir, &device, DType::F32)
                .map_err(|e| RerankerError::ModelLoadFailed {
                    reason: format!("Failed to load cross-encoder: {}", e),
                })?;
            (model, false)
        };

        let tokenizer =
            load_tokenizer_with_truncation(&model_dir, MAX_SEQ_LEN).map_err(|e| {
                RerankerError::ModelLoadFailed {
                    reason: format!("Failed to load tokenizer: {}", e),
                }
            })?;

        info!(quantized, "Reranker model loaded successfully");

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
            quantized,
        })
    }

    /// Loads a stub reranker (lexical placeholder scorer).
    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    /// Scores one (query, passage) pair. Higher is more relevant.
    pub fn score(&self, query: &str, passage: &str) -> Result<f32, RerankerError> {
        if let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) {
            let tokens = tokenizer.encode((query, passage), true).map_err(|e| {
                RerankerError::TokenizationFailed {
                    reason: e.to_string(),
                }
            })?;

            let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
            let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
            let attention_mask =
                Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

            let logits = model
                .forward(&token_ids, &type_ids, Some(&attention_mask))
                .map_err(|e| RerankerError::InferenceFailed {
                    reason: e.to_string(),
                })?;

            let score = logits.flatten_all()?.to_vec1::<f32>()?[0];
            return Ok(score);
        }

        Ok(self.lexical_score(query, passage))
    }

    /// Scores a batch of passages against one query, preserving input order.
    pub fn score_pairs(&self, query: &str, passages: &[String]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            query_len = query.len(),
            num_passages = passages.len(),
            model_loaded = self.model.is_some(),
            "Scoring query-passage pairs"
        );

        passages
            .iter()
            .map(|passage| self.score(query, passage))
            .collect()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn is_quantized(&self) -> bool {
        self.quantized
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }

    /// Deterministic fallback scorer: blend of query-token recall and Jaccard
    /// overlap, squashed to (0, 1). Language-neutral (no stop-word list), so
    /// it behaves the same on Vietnamese and English text.
    fn lexical_score(&self, query: &str, passage: &str) -> f32 {
        use std::collections::HashSet;

        let query_lower = query.to_lowercase();
        let query_words: HashSet<&str> = query_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1)
            .collect();

        let passage_lower = passage.to_lowercase();
        let passage_words: HashSet<&str> = passage_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1)
            .collect();

        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words.intersection(&passage_words).count();
        let recall = matches as f32 / query_words.len() as f32;

        let union = query_words.union(&passage_words).count();
        let jaccard = if union > 0 {
            matches as f32 / union as f32
        } else {
            0.0
        };

        let blended = 0.7 * recall + 0.3 * jaccard;

        (1.0 / (1.0 + (-6.0 * (blended - 0.5)).exp())).clamp(0.0, 1.0)
    }
}

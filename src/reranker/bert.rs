use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

struct BertForRelevanceImpl {
    bert: BertModel,
    classifier: Linear,
}

impl BertForRelevanceImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self { bert, classifier })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        let logits = self.classifier.forward(&cls_token)?;
        // Half-precision weights produce f16 logits; callers read f32.
        logits.to_dtype(DType::F32)
    }
}

/// Cross-encoder relevance head: BERT encoder plus a single-logit classifier
/// over the `[CLS]` token.
#[derive(Clone)]
pub struct BertRelevanceModel(std::sync::Arc<BertForRelevanceImpl>);

impl BertRelevanceModel {
    /// Loads the model from a directory with weights cast to `dtype`.
    ///
    /// `DType::F16` is the opportunistic quantized load; `DType::F32` the
    /// full-precision one.
    pub fn load_with_dtype<P: AsRef<Path>>(
        model_dir: P,
        device: &Device,
        dtype: DType,
    ) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, device)? };

        let model = BertForRelevanceImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Returns the relevance logits, shape `[batch, 1]`, always f32.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// BERT-family sentence encoder with masked mean pooling.
///
/// Loads a Hugging Face export directory (`config.json` + `model.safetensors`)
/// and produces one pooled hidden-state vector per input sequence.
#[derive(Clone)]
pub struct BertEncoder(std::sync::Arc<BertEncoderImpl>);

struct BertEncoderImpl {
    bert: BertModel,
    hidden_size: usize,
}

impl BertEncoderImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
        })
    }

    fn encode(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        // Masked mean pooling over the sequence dimension.
        // hidden: [batch, seq, hidden]; mask: [batch, seq]
        let mask = attention_mask
            .to_dtype(DType::F32)?
            .unsqueeze(2)?
            .broadcast_as(hidden.shape())?;
        let summed = hidden.mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::INFINITY)?;
        summed.div(&counts)
    }
}

impl BertEncoder {
    /// Loads the encoder from a model directory onto `device`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertEncoderImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Returns the pooled embedding, shape `[batch, hidden]`.
    pub fn encode(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0.encode(input_ids, token_type_ids, attention_mask)
    }

    /// Returns the model's hidden size (= embedding dimension).
    pub fn hidden_size(&self) -> usize {
        self.0.hidden_size
    }
}
